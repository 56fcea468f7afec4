//! Route definitions for the Supply Chain Management API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/products", product_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/warehouses", warehouse_routes())
        .nest("/purchase-orders", purchase_order_routes())
        .nest("/stock", stock_routes())
        .nest("/dashboard", dashboard_routes())
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:id/stock", get(handlers::get_product_stock))
}

fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
}

fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_warehouses).post(handlers::create_warehouse),
        )
        .route(
            "/:id",
            get(handlers::get_warehouse)
                .put(handlers::update_warehouse)
                .delete(handlers::delete_warehouse),
        )
}

fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchase_orders).post(handlers::create_purchase_order),
        )
        .route(
            "/:id",
            get(handlers::get_purchase_order).delete(handlers::delete_purchase_order),
        )
        .route("/:id/receive", post(handlers::receive_purchase_order))
}

fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_stock))
        .route("/adjust", post(handlers::adjust_stock))
        .route("/:product_id/:warehouse_id", get(handlers::get_stock))
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::get_stats))
        .route("/stock-per-product", get(handlers::get_stock_per_product))
        .route("/recent-orders", get(handlers::get_recent_orders))
}
