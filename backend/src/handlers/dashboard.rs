//! HTTP handlers for the dashboard

use axum::{
    extract::{Query, State},
    Json,
};

use shared::{DashboardStats, PurchaseOrderSummary, RecentOrdersQuery, StockChart};

use crate::error::AppResult;
use crate::services::DashboardService;
use crate::AppState;

pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<DashboardStats>> {
    let service = DashboardService::new(state.db);
    let stats = service.get_stats().await?;
    Ok(Json(stats))
}

pub async fn get_stock_per_product(State(state): State<AppState>) -> AppResult<Json<StockChart>> {
    let service = DashboardService::new(state.db);
    let chart = service.stock_per_product().await?;
    Ok(Json(chart))
}

pub async fn get_recent_orders(
    State(state): State<AppState>,
    Query(query): Query<RecentOrdersQuery>,
) -> AppResult<Json<Vec<PurchaseOrderSummary>>> {
    let service = DashboardService::new(state.db);
    let orders = service.recent_orders(query.effective_limit()).await?;
    Ok(Json(orders))
}
