//! HTTP request handlers

pub mod dashboard;
pub mod health;
pub mod products;
pub mod purchase_orders;
pub mod stock;
pub mod suppliers;
pub mod warehouses;

pub use dashboard::*;
pub use health::*;
pub use products::*;
pub use purchase_orders::*;
pub use stock::*;
pub use suppliers::*;
pub use warehouses::*;
