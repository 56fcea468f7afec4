//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Identifier of a product row
pub type ProductId = i64;

/// Identifier of a supplier row
pub type SupplierId = i64;

/// Identifier of a warehouse row
pub type WarehouseId = i64;

/// Identifier of a purchase order header
pub type OrderId = i64;

/// Number of orders returned by the dashboard when no limit is given
pub const DEFAULT_RECENT_ORDERS: i64 = 5;

/// Upper bound for the dashboard recent-orders limit
pub const MAX_RECENT_ORDERS: i64 = 100;

/// Query parameters for the recent purchase orders listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentOrdersQuery {
    pub limit: Option<i64>,
}

impl RecentOrdersQuery {
    /// Effective limit, clamped to `1..=MAX_RECENT_ORDERS`
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_RECENT_ORDERS)
            .clamp(1, MAX_RECENT_ORDERS)
    }
}

/// Plain acknowledgement body for mutations that return nothing else
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
