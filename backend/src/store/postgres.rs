//! PostgreSQL implementation of the ledger store

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use shared::{
    AdjustStockInput, CreateOrderLineInput, CreatePurchaseOrderInput, LineQuantity, OrderId,
    OrderStatus, ProductId, PurchaseOrder, Stock, WarehouseId,
};

use super::rows::{order_from_row, stock_from_row};
use super::{LedgerStore, LedgerTransaction};
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct PgLedgerStore {
    db: PgPool,
}

impl PgLedgerStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

pub struct PgLedgerTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    type Tx = PgLedgerTransaction;

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn begin(&self) -> AppResult<Self::Tx> {
        let tx = self.db.begin().await?;
        Ok(PgLedgerTransaction { tx })
    }

    async fn set_stock(&self, input: AdjustStockInput) -> AppResult<Stock> {
        let row = sqlx::query(
            r#"
            INSERT INTO stock (product_id, warehouse_id, quantity, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (product_id, warehouse_id)
            DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = now()
            RETURNING stock_id, product_id, warehouse_id, quantity, updated_at
            "#,
        )
        .bind(input.product_id)
        .bind(input.warehouse_id)
        .bind(input.quantity)
        .fetch_one(&self.db)
        .await?;

        Ok(stock_from_row(&row)?)
    }

    async fn get_stock(
        &self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
    ) -> AppResult<Option<Stock>> {
        let row = sqlx::query(
            r#"
            SELECT stock_id, product_id, warehouse_id, quantity, updated_at
            FROM stock
            WHERE product_id = $1 AND warehouse_id = $2
            "#,
        )
        .bind(product_id)
        .bind(warehouse_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.as_ref().map(stock_from_row).transpose()?)
    }

    async fn get_order(&self, order_id: OrderId) -> AppResult<Option<PurchaseOrder>> {
        let row = sqlx::query(
            r#"
            SELECT order_id, supplier_id, order_date, estimated_arrival, total_cost, status
            FROM purchase_orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.as_ref().map(order_from_row).transpose()?)
    }
}

#[async_trait]
impl LedgerTransaction for PgLedgerTransaction {
    async fn lock_order(&mut self, order_id: OrderId) -> AppResult<Option<OrderStatus>> {
        let status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM purchase_orders WHERE order_id = $1 FOR UPDATE",
        )
        .bind(order_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        status
            .map(|raw| {
                raw.parse::<OrderStatus>()
                    .map_err(|e| AppError::Internal(e.to_string()))
            })
            .transpose()
    }

    async fn order_lines(&mut self, order_id: OrderId) -> AppResult<Vec<LineQuantity>> {
        let lines = sqlx::query_as::<_, (ProductId, i32)>(
            "SELECT product_id, quantity FROM order_lines WHERE order_id = $1 ORDER BY line_id",
        )
        .bind(order_id)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(lines
            .into_iter()
            .map(|(product_id, quantity)| LineQuantity {
                product_id,
                quantity,
            })
            .collect())
    }

    async fn increment_stock(
        &mut self,
        product_id: ProductId,
        warehouse_id: WarehouseId,
        delta: i32,
    ) -> AppResult<i32> {
        let quantity = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO stock (product_id, warehouse_id, quantity, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (product_id, warehouse_id)
            DO UPDATE SET quantity = stock.quantity + EXCLUDED.quantity, updated_at = now()
            RETURNING quantity
            "#,
        )
        .bind(product_id)
        .bind(warehouse_id)
        .bind(delta)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(quantity)
    }

    async fn set_order_status(&mut self, order_id: OrderId, status: OrderStatus) -> AppResult<()> {
        sqlx::query("UPDATE purchase_orders SET status = $1 WHERE order_id = $2")
            .bind(status.as_str())
            .bind(order_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn insert_order(&mut self, input: &CreatePurchaseOrderInput) -> AppResult<OrderId> {
        let order_id = sqlx::query_scalar::<_, OrderId>(
            r#"
            INSERT INTO purchase_orders (supplier_id, order_date, estimated_arrival, total_cost, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING order_id
            "#,
        )
        .bind(input.supplier_id)
        .bind(input.order_date)
        .bind(input.estimated_arrival)
        .bind(input.total_cost)
        .bind(OrderStatus::Ordered.as_str())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(order_id)
    }

    async fn insert_order_line(
        &mut self,
        order_id: OrderId,
        line: &CreateOrderLineInput,
    ) -> AppResult<i64> {
        let line_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO order_lines (order_id, product_id, quantity, unit_price, subtotal)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING line_id
            "#,
        )
        .bind(order_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .bind(line.subtotal)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(line_id)
    }

    async fn delete_order_lines(&mut self, order_id: OrderId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM order_lines WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_order(&mut self, order_id: OrderId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM purchase_orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn commit(self) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> AppResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
