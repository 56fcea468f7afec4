//! In-memory ledger store
//!
//! A transaction holds the store-wide lock from `begin` until it is committed,
//! rolled back or dropped, and works on a private copy of the state. Commit
//! swaps the copy in; anything else discards it. Transactions are therefore
//! serializable and a failed one leaves no trace.
//!
//! Faults can be injected to exercise rollback and connectivity paths.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use shared::{
    AdjustStockInput, CreateOrderLineInput, CreatePurchaseOrderInput, LineQuantity, OrderId,
    OrderLine, OrderStatus, ProductId, PurchaseOrder, Stock, SupplierId, WarehouseId,
};

use super::{LedgerStore, LedgerTransaction};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
struct Faults {
    unreachable: bool,
    fail_increment_for: Option<ProductId>,
    fail_status_update: bool,
    stall_line_reads: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    suppliers: BTreeSet<SupplierId>,
    products: BTreeSet<ProductId>,
    warehouses: BTreeSet<WarehouseId>,
    orders: BTreeMap<OrderId, PurchaseOrder>,
    lines: BTreeMap<i64, OrderLine>,
    stock: BTreeMap<(ProductId, WarehouseId), Stock>,
    next_order_id: i64,
    next_line_id: i64,
    next_stock_id: i64,
    faults: Faults,
}

fn injected(what: &str) -> AppError {
    AppError::DatabaseError(sqlx::Error::Protocol(format!("injected failure: {}", what)))
}

impl MemoryState {
    fn check_stock_refs(&self, product_id: ProductId, warehouse_id: WarehouseId) -> AppResult<()> {
        if !self.products.contains(&product_id) {
            return Err(AppError::ReferentialViolation(
                "stock_product_id_fkey".to_string(),
            ));
        }
        if !self.warehouses.contains(&warehouse_id) {
            return Err(AppError::ReferentialViolation(
                "stock_warehouse_id_fkey".to_string(),
            ));
        }
        Ok(())
    }

    fn upsert_stock(
        &mut self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
        merge: impl FnOnce(i32) -> AppResult<i32>,
        initial: i32,
    ) -> AppResult<Stock> {
        self.check_stock_refs(product_id, warehouse_id)?;
        let now = Utc::now();

        if let Some(row) = self.stock.get_mut(&(product_id, warehouse_id)) {
            row.quantity = merge(row.quantity)?;
            row.updated_at = now;
            return Ok(row.clone());
        }

        self.next_stock_id += 1;
        let row = Stock {
            stock_id: self.next_stock_id,
            product_id,
            warehouse_id,
            quantity: initial,
            updated_at: now,
        };
        self.stock.insert((product_id, warehouse_id), row.clone());
        Ok(row)
    }

    fn insert_order(&mut self, input: &CreatePurchaseOrderInput) -> AppResult<OrderId> {
        if !self.suppliers.contains(&input.supplier_id) {
            return Err(AppError::ReferentialViolation(
                "purchase_orders_supplier_id_fkey".to_string(),
            ));
        }
        self.next_order_id += 1;
        let order_id = self.next_order_id;
        self.orders.insert(
            order_id,
            PurchaseOrder {
                order_id,
                supplier_id: input.supplier_id,
                order_date: input.order_date,
                estimated_arrival: input.estimated_arrival,
                total_cost: input.total_cost,
                status: OrderStatus::Ordered,
            },
        );
        Ok(order_id)
    }

    fn insert_line(&mut self, order_id: OrderId, line: &CreateOrderLineInput) -> AppResult<i64> {
        if !self.orders.contains_key(&order_id) {
            return Err(AppError::ReferentialViolation(
                "order_lines_order_id_fkey".to_string(),
            ));
        }
        if !self.products.contains(&line.product_id) {
            return Err(AppError::ReferentialViolation(
                "order_lines_product_id_fkey".to_string(),
            ));
        }
        self.next_line_id += 1;
        let line_id = self.next_line_id;
        self.lines.insert(
            line_id,
            OrderLine {
                line_id,
                order_id,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
                subtotal: line.subtotal,
            },
        );
        Ok(line_id)
    }
}

/// Ledger store kept entirely in process memory
#[derive(Clone, Default)]
pub struct MemoryLedgerStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_supplier(&self, supplier_id: SupplierId) {
        self.state.lock().await.suppliers.insert(supplier_id);
    }

    pub async fn add_product(&self, product_id: ProductId) {
        self.state.lock().await.products.insert(product_id);
    }

    pub async fn add_warehouse(&self, warehouse_id: WarehouseId) {
        self.state.lock().await.warehouses.insert(warehouse_id);
    }

    /// Create an `Ordered` purchase order with the given (product, quantity)
    /// lines, registering the supplier and products as needed.
    pub async fn seed_order(
        &self,
        supplier_id: SupplierId,
        lines: &[(ProductId, i32)],
    ) -> AppResult<OrderId> {
        let mut state = self.state.lock().await;
        state.suppliers.insert(supplier_id);

        let header = CreatePurchaseOrderInput {
            supplier_id,
            order_date: Utc::now().date_naive(),
            estimated_arrival: None,
            total_cost: None,
            lines: Vec::new(),
        };
        let order_id = state.insert_order(&header)?;

        for &(product_id, quantity) in lines {
            state.products.insert(product_id);
            let line = CreateOrderLineInput {
                product_id,
                quantity,
                unit_price: Default::default(),
                subtotal: Default::default(),
            };
            state.insert_line(order_id, &line)?;
        }
        Ok(order_id)
    }

    pub async fn stock_quantity(
        &self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
    ) -> Option<i32> {
        self.state
            .lock()
            .await
            .stock
            .get(&(product_id, warehouse_id))
            .map(|row| row.quantity)
    }

    pub async fn stock_rows(&self) -> usize {
        self.state.lock().await.stock.len()
    }

    pub async fn order_status(&self, order_id: OrderId) -> Option<OrderStatus> {
        self.state
            .lock()
            .await
            .orders
            .get(&order_id)
            .map(|order| order.status)
    }

    pub async fn line_count(&self, order_id: OrderId) -> usize {
        self.state
            .lock()
            .await
            .lines
            .values()
            .filter(|line| line.order_id == order_id)
            .count()
    }

    pub async fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().await.faults.unreachable = unreachable;
    }

    /// Make every stock increment for `product_id` fail
    pub async fn fail_stock_increment_for(&self, product_id: ProductId) {
        self.state.lock().await.faults.fail_increment_for = Some(product_id);
    }

    pub async fn fail_status_update(&self) {
        self.state.lock().await.faults.fail_status_update = true;
    }

    /// Delay order line reads, holding the transaction open
    pub async fn stall_line_reads(&self, delay: Duration) {
        self.state.lock().await.faults.stall_line_reads = Some(delay);
    }

    pub async fn clear_faults(&self) {
        self.state.lock().await.faults = Faults::default();
    }
}

pub struct MemoryLedgerTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    type Tx = MemoryLedgerTransaction;

    async fn ping(&self) -> AppResult<()> {
        if self.state.lock().await.faults.unreachable {
            return Err(AppError::ConnectivityFailure(
                "memory store marked unreachable".to_string(),
            ));
        }
        Ok(())
    }

    async fn begin(&self) -> AppResult<Self::Tx> {
        let guard = self.state.clone().lock_owned().await;
        if guard.faults.unreachable {
            return Err(AppError::ConnectivityFailure(
                "memory store marked unreachable".to_string(),
            ));
        }
        let staged = guard.clone();
        Ok(MemoryLedgerTransaction { guard, staged })
    }

    async fn set_stock(&self, input: AdjustStockInput) -> AppResult<Stock> {
        let mut state = self.state.lock().await;
        if state.faults.unreachable {
            return Err(AppError::ConnectivityFailure(
                "memory store marked unreachable".to_string(),
            ));
        }
        state.upsert_stock(
            input.product_id,
            input.warehouse_id,
            |_| Ok(input.quantity),
            input.quantity,
        )
    }

    async fn get_stock(
        &self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
    ) -> AppResult<Option<Stock>> {
        Ok(self
            .state
            .lock()
            .await
            .stock
            .get(&(product_id, warehouse_id))
            .cloned())
    }

    async fn get_order(&self, order_id: OrderId) -> AppResult<Option<PurchaseOrder>> {
        Ok(self.state.lock().await.orders.get(&order_id).cloned())
    }
}

#[async_trait]
impl LedgerTransaction for MemoryLedgerTransaction {
    async fn lock_order(&mut self, order_id: OrderId) -> AppResult<Option<OrderStatus>> {
        Ok(self.staged.orders.get(&order_id).map(|order| order.status))
    }

    async fn order_lines(&mut self, order_id: OrderId) -> AppResult<Vec<LineQuantity>> {
        if let Some(delay) = self.staged.faults.stall_line_reads {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .staged
            .lines
            .values()
            .filter(|line| line.order_id == order_id)
            .map(|line| LineQuantity {
                product_id: line.product_id,
                quantity: line.quantity,
            })
            .collect())
    }

    async fn increment_stock(
        &mut self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
        delta: i32,
    ) -> AppResult<i32> {
        if self.staged.faults.fail_increment_for == Some(product_id) {
            return Err(injected("stock increment"));
        }
        let row = self.staged.upsert_stock(
            product_id,
            warehouse_id,
            |current| {
                current
                    .checked_add(delta)
                    .ok_or_else(|| injected("integer out of range"))
            },
            delta,
        )?;
        Ok(row.quantity)
    }

    async fn set_order_status(&mut self, order_id: OrderId, status: OrderStatus) -> AppResult<()> {
        if self.staged.faults.fail_status_update {
            return Err(injected("order status update"));
        }
        if let Some(order) = self.staged.orders.get_mut(&order_id) {
            order.status = status;
        }
        Ok(())
    }

    async fn insert_order(&mut self, input: &CreatePurchaseOrderInput) -> AppResult<OrderId> {
        self.staged.insert_order(input)
    }

    async fn insert_order_line(
        &mut self,
        order_id: OrderId,
        line: &CreateOrderLineInput,
    ) -> AppResult<i64> {
        self.staged.insert_line(order_id, line)
    }

    async fn delete_order_lines(&mut self, order_id: OrderId) -> AppResult<u64> {
        let before = self.staged.lines.len();
        self.staged.lines.retain(|_, line| line.order_id != order_id);
        Ok((before - self.staged.lines.len()) as u64)
    }

    /// Lines of the order go with it, as with `ON DELETE CASCADE`
    async fn delete_order(&mut self, order_id: OrderId) -> AppResult<u64> {
        self.staged.lines.retain(|_, line| line.order_id != order_id);
        Ok(u64::from(self.staged.orders.remove(&order_id).is_some()))
    }

    async fn commit(self) -> AppResult<()> {
        let MemoryLedgerTransaction { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self) -> AppResult<()> {
        Ok(())
    }
}
