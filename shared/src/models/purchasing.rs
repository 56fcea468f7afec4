//! Purchase order models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{OrderId, ProductId, SupplierId};

/// Lifecycle status of a purchase order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Ordered,
    Received,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "Ordered",
            OrderStatus::Received => "Received",
        }
    }

    /// Only `Ordered -> Received` exists; there is no way back.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!((self, next), (OrderStatus::Ordered, OrderStatus::Received))
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl std::str::FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ordered" => Ok(OrderStatus::Ordered),
            "Received" => Ok(OrderStatus::Received),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

/// A purchase order header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseOrder {
    pub order_id: OrderId,
    pub supplier_id: SupplierId,
    pub order_date: NaiveDate,
    pub estimated_arrival: Option<NaiveDate>,
    pub total_cost: Option<Decimal>,
    pub status: OrderStatus,
}

/// Purchase order header joined with its supplier name, as listed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseOrderSummary {
    pub order_id: OrderId,
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub order_date: NaiveDate,
    pub estimated_arrival: Option<NaiveDate>,
    pub total_cost: Option<Decimal>,
    pub status: OrderStatus,
}

/// One product/quantity/price entry of a purchase order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub line_id: i64,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    /// Stored as supplied by the caller
    pub subtotal: Decimal,
}

/// Order line joined with its product name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineDetail {
    pub line_id: i64,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Purchase order with all of its lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseOrderWithLines {
    #[serde(flatten)]
    pub order: PurchaseOrderSummary,
    pub lines: Vec<OrderLineDetail>,
}

/// Input for one line of a new purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderLineInput {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Input for creating a purchase order together with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePurchaseOrderInput {
    pub supplier_id: SupplierId,
    pub order_date: NaiveDate,
    pub estimated_arrival: Option<NaiveDate>,
    pub total_cost: Option<Decimal>,
    #[serde(default)]
    pub lines: Vec<CreateOrderLineInput>,
}

/// Response body after creating a purchase order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedPurchaseOrder {
    pub order_id: OrderId,
    pub line_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(OrderStatus::Ordered.can_transition_to(OrderStatus::Received));
        assert!(!OrderStatus::Received.can_transition_to(OrderStatus::Ordered));
        assert!(!OrderStatus::Received.can_transition_to(OrderStatus::Received));
        assert!(!OrderStatus::Ordered.can_transition_to(OrderStatus::Ordered));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Ordered".parse::<OrderStatus>(), Ok(OrderStatus::Ordered));
        assert_eq!("Received".parse::<OrderStatus>(), Ok(OrderStatus::Received));
        assert!("Cancelled".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_json_shape() {
        let json = serde_json::to_string(&OrderStatus::Received).unwrap();
        assert_eq!(json, "\"Received\"");
    }

    #[test]
    fn test_order_with_lines_flattens_header() {
        let order = PurchaseOrderWithLines {
            order: PurchaseOrderSummary {
                order_id: 7,
                supplier_id: 2,
                supplier_name: "Acme".to_string(),
                order_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                estimated_arrival: None,
                total_cost: None,
                status: OrderStatus::Ordered,
            },
            lines: vec![],
        };
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["order_id"], 7);
        assert_eq!(value["status"], "Ordered");
        assert!(value["lines"].as_array().unwrap().is_empty());
    }
}
