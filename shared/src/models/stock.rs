//! Stock ledger models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, ProductId, WarehouseId};

/// Quantity on hand of one product in one warehouse.
///
/// At most one row exists per (product, warehouse) pair. The quantity is not
/// floored at zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stock {
    pub stock_id: i64,
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
}

/// Stock row joined with product and warehouse names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockView {
    pub stock_id: i64,
    pub product_id: ProductId,
    pub product_name: String,
    pub warehouse_id: WarehouseId,
    pub warehouse_name: String,
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
}

/// Input for setting the absolute quantity of a (product, warehouse) pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdjustStockInput {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    /// Target quantity on hand, not a delta
    pub quantity: i32,
}

/// Product and quantity of an order line, as consumed by a receipt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineQuantity {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Stock level of one product after a receipt credited it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceivedLine {
    pub product_id: ProductId,
    pub quantity_received: i32,
    pub quantity_on_hand: i32,
}

/// Outcome of receiving a purchase order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub warehouse_id: WarehouseId,
    pub lines: Vec<ReceivedLine>,
}

impl OrderReceipt {
    /// Total units credited by the receipt
    pub fn total_received(&self) -> i64 {
        self.lines
            .iter()
            .map(|line| i64::from(line.quantity_received))
            .sum()
    }
}
