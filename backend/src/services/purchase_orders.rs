//! Purchase order reads
//!
//! Creation, receipt and deletion are transactional and live in the ledger.

use futures::TryStreamExt;
use sqlx::PgPool;

use shared::{OrderId, PurchaseOrderSummary, PurchaseOrderWithLines};

use crate::error::{AppError, AppResult};
use crate::store::rows::{order_line_detail_from_row, order_summary_from_row, skip_undecodable};

#[derive(Clone)]
pub struct PurchaseOrderService {
    db: PgPool,
}

impl PurchaseOrderService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Orders newest first, with supplier names
    pub async fn list_orders(&self) -> AppResult<Vec<PurchaseOrderSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT po.order_id, po.supplier_id, s.name AS supplier_name, po.order_date,
                   po.estimated_arrival, po.total_cost, po.status
            FROM purchase_orders po
            JOIN suppliers s ON s.supplier_id = po.supplier_id
            ORDER BY po.order_date DESC, po.order_id DESC
            "#,
        )
        .fetch(&self.db);

        let orders = skip_undecodable(rows, "purchase_order", order_summary_from_row)
            .try_collect()
            .await?;
        Ok(orders)
    }

    /// Order header together with its lines
    pub async fn get_order(&self, order_id: OrderId) -> AppResult<PurchaseOrderWithLines> {
        let header = sqlx::query(
            r#"
            SELECT po.order_id, po.supplier_id, s.name AS supplier_name, po.order_date,
                   po.estimated_arrival, po.total_cost, po.status
            FROM purchase_orders po
            JOIN suppliers s ON s.supplier_id = po.supplier_id
            WHERE po.order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))?;

        let order = order_summary_from_row(&header)?;

        let rows = sqlx::query(
            r#"
            SELECT ol.line_id, ol.product_id, p.name AS product_name,
                   ol.quantity, ol.unit_price, ol.subtotal
            FROM order_lines ol
            JOIN products p ON p.product_id = ol.product_id
            WHERE ol.order_id = $1
            ORDER BY ol.line_id
            "#,
        )
        .bind(order_id)
        .fetch(&self.db);

        let lines = skip_undecodable(rows, "order_line", order_line_detail_from_row)
            .try_collect()
            .await?;

        Ok(PurchaseOrderWithLines { order, lines })
    }
}
