//! Dashboard aggregates

use serde::{Deserialize, Serialize};

/// Row counts of the main tables
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub product_count: i64,
    pub supplier_count: i64,
    pub purchase_order_count: i64,
    pub warehouse_count: i64,
}

/// Chart series of total stock per product name
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockChart {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}

impl StockChart {
    pub fn push(&mut self, label: String, value: i64) {
        self.labels.push(label);
        self.data.push(value);
    }
}
