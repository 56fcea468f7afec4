//! Store boundary of the stock ledger
//!
//! The ledger engine only talks to these traits. `PgLedgerStore` is the
//! production implementation; `MemoryLedgerStore` backs tests and local runs
//! without a database.

use async_trait::async_trait;

use shared::{
    AdjustStockInput, CreateOrderLineInput, CreatePurchaseOrderInput, LineQuantity, OrderId,
    OrderStatus, ProductId, PurchaseOrder, Stock, WarehouseId,
};

use crate::error::AppResult;

pub mod memory;
pub mod postgres;
pub mod rows;

pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

/// Handle to a transactional store holding stock and purchase orders
#[async_trait]
pub trait LedgerStore: Send + Sync + 'static {
    type Tx: LedgerTransaction;

    /// Liveness check, run before a transaction is opened
    async fn ping(&self) -> AppResult<()>;

    /// Open a transaction. Dropping it without `commit` rolls it back.
    async fn begin(&self) -> AppResult<Self::Tx>;

    /// Set the absolute quantity of a (product, warehouse) pair in one
    /// statement, creating the row when it does not exist.
    async fn set_stock(&self, input: AdjustStockInput) -> AppResult<Stock>;

    async fn get_stock(
        &self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
    ) -> AppResult<Option<Stock>>;

    async fn get_order(&self, order_id: OrderId) -> AppResult<Option<PurchaseOrder>>;
}

/// Statements available inside one all-or-nothing transaction
#[async_trait]
pub trait LedgerTransaction: Send {
    /// Read the order status, holding a row lock until the transaction ends
    async fn lock_order(&mut self, order_id: OrderId) -> AppResult<Option<OrderStatus>>;

    async fn order_lines(&mut self, order_id: OrderId) -> AppResult<Vec<LineQuantity>>;

    /// Add `delta` to the (product, warehouse) quantity, creating the row when
    /// absent. Returns the resulting quantity on hand.
    async fn increment_stock(
        &mut self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
        delta: i32,
    ) -> AppResult<i32>;

    async fn set_order_status(&mut self, order_id: OrderId, status: OrderStatus) -> AppResult<()>;

    /// Insert an order header with status `Ordered`
    async fn insert_order(&mut self, input: &CreatePurchaseOrderInput) -> AppResult<OrderId>;

    async fn insert_order_line(
        &mut self,
        order_id: OrderId,
        line: &CreateOrderLineInput,
    ) -> AppResult<i64>;

    async fn delete_order_lines(&mut self, order_id: OrderId) -> AppResult<u64>;

    async fn delete_order(&mut self, order_id: OrderId) -> AppResult<u64>;

    async fn commit(self) -> AppResult<()>;

    async fn rollback(self) -> AppResult<()>;
}
