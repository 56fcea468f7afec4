//! Dashboard aggregates

use futures::TryStreamExt;
use sqlx::{postgres::PgRow, PgPool, Row};

use shared::{DashboardStats, PurchaseOrderSummary, StockChart};

use crate::error::AppResult;
use crate::store::rows::{order_summary_from_row, skip_undecodable};

#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

fn chart_point_from_row(row: &PgRow) -> Result<(String, i64), sqlx::Error> {
    Ok((row.try_get("product_name")?, row.try_get("total_quantity")?))
}

impl DashboardService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_stats(&self) -> AppResult<DashboardStats> {
        let (product_count, supplier_count, purchase_order_count, warehouse_count) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM products),
                    (SELECT COUNT(*) FROM suppliers),
                    (SELECT COUNT(*) FROM purchase_orders),
                    (SELECT COUNT(*) FROM warehouses)
                "#,
            )
            .fetch_one(&self.db)
            .await?;

        Ok(DashboardStats {
            product_count,
            supplier_count,
            purchase_order_count,
            warehouse_count,
        })
    }

    /// Total quantity on hand per product, largest first
    pub async fn stock_per_product(&self) -> AppResult<StockChart> {
        let rows = sqlx::query(
            r#"
            SELECT p.name AS product_name, COALESCE(SUM(s.quantity), 0)::BIGINT AS total_quantity
            FROM stock s
            JOIN products p ON p.product_id = s.product_id
            GROUP BY p.product_id, p.name
            ORDER BY total_quantity DESC, p.name
            "#,
        )
        .fetch(&self.db);

        let points: Vec<(String, i64)> =
            skip_undecodable(rows, "stock_chart", chart_point_from_row)
                .try_collect()
                .await?;

        let mut chart = StockChart::default();
        for (label, total) in points {
            chart.push(label, total);
        }
        Ok(chart)
    }

    pub async fn recent_orders(&self, limit: i64) -> AppResult<Vec<PurchaseOrderSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT po.order_id, po.supplier_id, s.name AS supplier_name, po.order_date,
                   po.estimated_arrival, po.total_cost, po.status
            FROM purchase_orders po
            JOIN suppliers s ON s.supplier_id = po.supplier_id
            ORDER BY po.order_date DESC, po.order_id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch(&self.db);

        let orders = skip_undecodable(rows, "purchase_order", order_summary_from_row)
            .try_collect()
            .await?;
        Ok(orders)
    }
}
