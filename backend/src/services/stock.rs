//! Stock listing
//!
//! Writes to stock go through the ledger; this service only reads.

use futures::TryStreamExt;
use sqlx::PgPool;

use shared::{ProductId, StockView};

use crate::error::AppResult;
use crate::store::rows::{skip_undecodable, stock_view_from_row};

#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

impl StockService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// All stock rows with product and warehouse names
    pub async fn list_stock(&self) -> AppResult<Vec<StockView>> {
        let rows = sqlx::query(
            r#"
            SELECT s.stock_id, s.product_id, p.name AS product_name,
                   s.warehouse_id, w.name AS warehouse_name,
                   s.quantity, s.updated_at
            FROM stock s
            JOIN products p ON p.product_id = s.product_id
            JOIN warehouses w ON w.warehouse_id = s.warehouse_id
            ORDER BY p.name, w.name
            "#,
        )
        .fetch(&self.db);

        let stock = skip_undecodable(rows, "stock", stock_view_from_row)
            .try_collect()
            .await?;
        Ok(stock)
    }

    /// Stock of one product across every warehouse
    pub async fn list_product_stock(&self, product_id: ProductId) -> AppResult<Vec<StockView>> {
        let rows = sqlx::query(
            r#"
            SELECT s.stock_id, s.product_id, p.name AS product_name,
                   s.warehouse_id, w.name AS warehouse_name,
                   s.quantity, s.updated_at
            FROM stock s
            JOIN products p ON p.product_id = s.product_id
            JOIN warehouses w ON w.warehouse_id = s.warehouse_id
            WHERE s.product_id = $1
            ORDER BY w.name
            "#,
        )
        .bind(product_id)
        .fetch(&self.db);

        let stock = skip_undecodable(rows, "stock", stock_view_from_row)
            .try_collect()
            .await?;
        Ok(stock)
    }
}
