//! Domain models for the Supply Chain Management API

mod catalog;
mod dashboard;
mod purchasing;
mod stock;

pub use catalog::*;
pub use dashboard::*;
pub use purchasing::*;
pub use stock::*;
