//! Stock ledger and purchase order fulfillment
//!
//! Every operation that touches more than one row runs inside a single store
//! transaction bounded by the configured deadline. A transaction that fails or
//! times out is rolled back before the error is returned, so callers never
//! observe partial receipts or half-deleted orders.

use std::future::Future;
use std::time::Duration;

use shared::validation::{subtotal_mismatch, total_cost_mismatch, validate_purchase_order};
use shared::{
    AdjustStockInput, CreatePurchaseOrderInput, CreatedPurchaseOrder, OrderId, OrderReceipt,
    OrderStatus, ProductId, PurchaseOrder, ReceivedLine, Stock, WarehouseId,
};

use crate::config::LedgerConfig;
use crate::error::{AppError, AppResult};
use crate::store::{LedgerStore, LedgerTransaction};

/// Ledger engine over a transactional store
#[derive(Clone)]
pub struct LedgerService<S> {
    store: S,
    default_warehouse_id: WarehouseId,
    transaction_timeout: Duration,
}

impl<S: LedgerStore> LedgerService<S> {
    pub fn new(store: S, default_warehouse_id: WarehouseId, transaction_timeout: Duration) -> Self {
        Self {
            store,
            default_warehouse_id,
            transaction_timeout,
        }
    }

    pub fn from_config(store: S, config: &LedgerConfig) -> Self {
        Self::new(
            store,
            config.default_receiving_warehouse_id,
            config.transaction_timeout(),
        )
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Set the quantity on hand of a (product, warehouse) pair.
    ///
    /// This is an overwrite, not a delta. Negative quantities are accepted.
    pub async fn adjust_stock(&self, input: AdjustStockInput) -> AppResult<Stock> {
        let stock = self.store.set_stock(input).await?;

        tracing::info!(
            product_id = input.product_id,
            warehouse_id = input.warehouse_id,
            quantity = stock.quantity,
            "Stock adjusted"
        );

        Ok(stock)
    }

    pub async fn get_stock(
        &self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
    ) -> AppResult<Stock> {
        self.store
            .get_stock(product_id, warehouse_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Stock".to_string()))
    }

    pub async fn get_order(&self, order_id: OrderId) -> AppResult<PurchaseOrder> {
        self.store
            .get_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))
    }

    /// Credit every line of an `Ordered` purchase order to the default
    /// receiving warehouse and mark it `Received`, all in one transaction.
    pub async fn receive_purchase_order(&self, order_id: OrderId) -> AppResult<OrderReceipt> {
        self.store.ping().await.map_err(|err| match err {
            AppError::ConnectivityFailure(detail) => AppError::ConnectivityFailure(detail),
            other => AppError::ConnectivityFailure(other.to_string()),
        })?;

        let warehouse_id = self.default_warehouse_id;
        let receipt = self
            .bounded("receive purchase order", order_id, async {
                let mut tx = self.store.begin().await?;
                let result = Self::apply_receipt(&mut tx, order_id, warehouse_id).await;
                Self::finish(tx, result).await
            })
            .await?;

        tracing::info!(
            order_id,
            warehouse_id,
            lines = receipt.lines.len(),
            units = receipt.total_received(),
            "Purchase order received"
        );

        Ok(receipt)
    }

    /// Remove a purchase order and all of its lines atomically
    pub async fn delete_purchase_order(&self, order_id: OrderId) -> AppResult<()> {
        let removed_lines = self
            .bounded("delete purchase order", order_id, async {
                let mut tx = self.store.begin().await?;
                let result = Self::remove_order(&mut tx, order_id).await;
                Self::finish(tx, result).await
            })
            .await?;

        tracing::info!(order_id, removed_lines, "Purchase order deleted");
        Ok(())
    }

    /// Insert a purchase order header and its lines atomically.
    ///
    /// Line subtotals and the total cost are stored as supplied.
    pub async fn create_purchase_order(
        &self,
        input: CreatePurchaseOrderInput,
    ) -> AppResult<CreatedPurchaseOrder> {
        validate_purchase_order(&input).map_err(|(line, message)| {
            let field = match line {
                Some(idx) => format!("lines[{}]", idx),
                None => "order".to_string(),
            };
            AppError::validation(field, message)
        })?;

        for (idx, line) in input.lines.iter().enumerate() {
            if subtotal_mismatch(line) {
                tracing::warn!(
                    line = idx,
                    product_id = line.product_id,
                    subtotal = %line.subtotal,
                    "Line subtotal does not match quantity * unit_price; storing as supplied"
                );
            }
        }
        if total_cost_mismatch(&input) {
            tracing::warn!(
                supplier_id = input.supplier_id,
                total_cost = ?input.total_cost,
                "Total cost does not match the sum of line subtotals; storing as supplied"
            );
        }

        let created = self
            .bounded("create purchase order", 0, async {
                let mut tx = self.store.begin().await?;
                let result = Self::insert_order(&mut tx, &input).await;
                Self::finish(tx, result).await
            })
            .await?;

        tracing::info!(
            order_id = created.order_id,
            supplier_id = input.supplier_id,
            lines = created.line_count,
            "Purchase order created"
        );

        Ok(created)
    }

    async fn apply_receipt(
        tx: &mut S::Tx,
        order_id: OrderId,
        warehouse_id: WarehouseId,
    ) -> AppResult<OrderReceipt> {
        let status = tx
            .lock_order(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))?;

        if !status.can_transition_to(OrderStatus::Received) {
            return Err(AppError::Conflict {
                resource: "purchase_order".to_string(),
                message: format!("Purchase order {} is already {}", order_id, status),
            });
        }

        let lines = tx.order_lines(order_id).await?;
        let mut received = Vec::with_capacity(lines.len());
        for line in lines {
            let on_hand = tx
                .increment_stock(line.product_id, warehouse_id, line.quantity)
                .await?;
            received.push(ReceivedLine {
                product_id: line.product_id,
                quantity_received: line.quantity,
                quantity_on_hand: on_hand,
            });
        }

        tx.set_order_status(order_id, OrderStatus::Received).await?;

        Ok(OrderReceipt {
            order_id,
            warehouse_id,
            lines: received,
        })
    }

    async fn remove_order(tx: &mut S::Tx, order_id: OrderId) -> AppResult<u64> {
        if tx.lock_order(order_id).await?.is_none() {
            return Err(AppError::NotFound("Purchase order".to_string()));
        }

        let removed_lines = tx.delete_order_lines(order_id).await?;
        tx.delete_order(order_id).await?;
        Ok(removed_lines)
    }

    async fn insert_order(
        tx: &mut S::Tx,
        input: &CreatePurchaseOrderInput,
    ) -> AppResult<CreatedPurchaseOrder> {
        let order_id = tx.insert_order(input).await?;
        for line in &input.lines {
            tx.insert_order_line(order_id, line).await?;
        }

        Ok(CreatedPurchaseOrder {
            order_id,
            line_count: input.lines.len(),
        })
    }

    /// Commit on success, roll back on failure
    async fn finish<T>(tx: S::Tx, result: AppResult<T>) -> AppResult<T> {
        match result {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    /// Run a transaction body under the configured deadline. The transaction
    /// is dropped, and therefore rolled back, when the deadline passes.
    async fn bounded<T, F>(&self, operation: &'static str, order_id: OrderId, body: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match tokio::time::timeout(self.transaction_timeout, body).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                let err = err.in_transaction();
                tracing::error!(operation, order_id, error = %err, "Transaction rolled back");
                Err(err)
            }
            Err(_) => {
                tracing::error!(
                    operation,
                    order_id,
                    timeout = ?self.transaction_timeout,
                    "Transaction exceeded its deadline"
                );
                Err(AppError::TransactionFailure(format!(
                    "{} exceeded the {:?} deadline",
                    operation, self.transaction_timeout
                )))
            }
        }
    }
}
