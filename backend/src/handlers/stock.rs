//! HTTP handlers for stock levels

use axum::{
    extract::{Path, State},
    Json,
};

use shared::{AdjustStockInput, ProductId, Stock, StockView, WarehouseId};

use crate::error::AppResult;
use crate::services::StockService;
use crate::AppState;

pub async fn list_stock(State(state): State<AppState>) -> AppResult<Json<Vec<StockView>>> {
    let service = StockService::new(state.db);
    let stock = service.list_stock().await?;
    Ok(Json(stock))
}

pub async fn get_stock(
    State(state): State<AppState>,
    Path((product_id, warehouse_id)): Path<(ProductId, WarehouseId)>,
) -> AppResult<Json<Stock>> {
    let stock = state.ledger.get_stock(product_id, warehouse_id).await?;
    Ok(Json(stock))
}

/// Set the absolute quantity on hand
pub async fn adjust_stock(
    State(state): State<AppState>,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<Stock>> {
    let stock = state.ledger.adjust_stock(input).await?;
    Ok(Json(stock))
}
