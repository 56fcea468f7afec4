//! Row decoding for the Postgres tables
//!
//! Bulk list reads decode rows one at a time through [`skip_undecodable`], so a
//! malformed row is logged and dropped instead of failing the whole listing.
//! Write paths decode strictly.

use futures::{future, Stream, StreamExt};
use sqlx::{postgres::PgRow, Row};

use shared::{
    OrderLineDetail, OrderStatus, Product, PurchaseOrder, PurchaseOrderSummary, Stock, StockView,
    Supplier, Warehouse,
};

/// Drop items whose decoding fails, logging each one, and pass everything
/// else through. Errors of the underlying stream are not skipped.
pub fn skip_undecodable<'a, S, R, T, E, D, F>(
    rows: S,
    entity: &'static str,
    mut decode: F,
) -> impl Stream<Item = Result<T, E>> + 'a
where
    S: Stream<Item = Result<R, E>> + 'a,
    F: FnMut(&R) -> Result<T, D> + 'a,
    D: std::fmt::Display,
    R: 'a,
    T: 'a,
    E: 'a,
{
    rows.filter_map(move |row| {
        let item = match row {
            Err(err) => Some(Err(err)),
            Ok(row) => match decode(&row) {
                Ok(value) => Some(Ok(value)),
                Err(err) => {
                    tracing::warn!(entity, error = %err, "Skipping row that failed to decode");
                    None
                }
            },
        };
        future::ready(item)
    })
}

fn status_from_row(row: &PgRow) -> Result<OrderStatus, sqlx::Error> {
    let raw: String = row.try_get("status")?;
    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: "status".to_string(),
        source: Box::new(e),
    })
}

pub fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        product_id: row.try_get("product_id")?,
        sku: row.try_get("sku")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        unit: row.try_get("unit")?,
        sale_price: row.try_get("sale_price")?,
        weight_kg: row.try_get("weight_kg")?,
        image_url: row.try_get("image_url")?,
        supplier_id: row.try_get("supplier_id")?,
    })
}

pub fn supplier_from_row(row: &PgRow) -> Result<Supplier, sqlx::Error> {
    Ok(Supplier {
        supplier_id: row.try_get("supplier_id")?,
        name: row.try_get("name")?,
        address: row.try_get("address")?,
        contact: row.try_get("contact")?,
        contact_person: row.try_get("contact_person")?,
        rating: row.try_get("rating")?,
    })
}

pub fn warehouse_from_row(row: &PgRow) -> Result<Warehouse, sqlx::Error> {
    Ok(Warehouse {
        warehouse_id: row.try_get("warehouse_id")?,
        name: row.try_get("name")?,
        location: row.try_get("location")?,
    })
}

pub fn stock_from_row(row: &PgRow) -> Result<Stock, sqlx::Error> {
    Ok(Stock {
        stock_id: row.try_get("stock_id")?,
        product_id: row.try_get("product_id")?,
        warehouse_id: row.try_get("warehouse_id")?,
        quantity: row.try_get("quantity")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub fn stock_view_from_row(row: &PgRow) -> Result<StockView, sqlx::Error> {
    Ok(StockView {
        stock_id: row.try_get("stock_id")?,
        product_id: row.try_get("product_id")?,
        product_name: row.try_get("product_name")?,
        warehouse_id: row.try_get("warehouse_id")?,
        warehouse_name: row.try_get("warehouse_name")?,
        quantity: row.try_get("quantity")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub fn order_from_row(row: &PgRow) -> Result<PurchaseOrder, sqlx::Error> {
    Ok(PurchaseOrder {
        order_id: row.try_get("order_id")?,
        supplier_id: row.try_get("supplier_id")?,
        order_date: row.try_get("order_date")?,
        estimated_arrival: row.try_get("estimated_arrival")?,
        total_cost: row.try_get("total_cost")?,
        status: status_from_row(row)?,
    })
}

pub fn order_summary_from_row(row: &PgRow) -> Result<PurchaseOrderSummary, sqlx::Error> {
    Ok(PurchaseOrderSummary {
        order_id: row.try_get("order_id")?,
        supplier_id: row.try_get("supplier_id")?,
        supplier_name: row.try_get("supplier_name")?,
        order_date: row.try_get("order_date")?,
        estimated_arrival: row.try_get("estimated_arrival")?,
        total_cost: row.try_get("total_cost")?,
        status: status_from_row(row)?,
    })
}

pub fn order_line_detail_from_row(row: &PgRow) -> Result<OrderLineDetail, sqlx::Error> {
    Ok(OrderLineDetail {
        line_id: row.try_get("line_id")?,
        product_id: row.try_get("product_id")?,
        product_name: row.try_get("product_name")?,
        quantity: row.try_get("quantity")?,
        unit_price: row.try_get("unit_price")?,
        subtotal: row.try_get("subtotal")?,
    })
}
