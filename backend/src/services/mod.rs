//! Business logic services for the Supply Chain Management API

pub mod dashboard;
pub mod ledger;
pub mod products;
pub mod purchase_orders;
pub mod stock;
pub mod suppliers;
pub mod warehouses;

pub use dashboard::DashboardService;
pub use ledger::LedgerService;
pub use products::ProductService;
pub use purchase_orders::PurchaseOrderService;
pub use stock::StockService;
pub use suppliers::SupplierService;
pub use warehouses::WarehouseService;
