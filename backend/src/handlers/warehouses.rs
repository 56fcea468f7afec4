//! HTTP handlers for warehouses

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use shared::{MessageResponse, Warehouse, WarehouseId, WarehouseInput};

use crate::error::AppResult;
use crate::services::WarehouseService;
use crate::AppState;

pub async fn list_warehouses(State(state): State<AppState>) -> AppResult<Json<Vec<Warehouse>>> {
    let service = WarehouseService::new(state.db);
    let warehouses = service.list_warehouses().await?;
    Ok(Json(warehouses))
}

pub async fn get_warehouse(
    State(state): State<AppState>,
    Path(warehouse_id): Path<WarehouseId>,
) -> AppResult<Json<Warehouse>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service.get_warehouse(warehouse_id).await?;
    Ok(Json(warehouse))
}

pub async fn create_warehouse(
    State(state): State<AppState>,
    Json(input): Json<WarehouseInput>,
) -> AppResult<(StatusCode, Json<Warehouse>)> {
    let service = WarehouseService::new(state.db);
    let warehouse = service.create_warehouse(input).await?;
    Ok((StatusCode::CREATED, Json(warehouse)))
}

pub async fn update_warehouse(
    State(state): State<AppState>,
    Path(warehouse_id): Path<WarehouseId>,
    Json(input): Json<WarehouseInput>,
) -> AppResult<Json<Warehouse>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service.update_warehouse(warehouse_id, input).await?;
    Ok(Json(warehouse))
}

pub async fn delete_warehouse(
    State(state): State<AppState>,
    Path(warehouse_id): Path<WarehouseId>,
) -> AppResult<Json<MessageResponse>> {
    let service = WarehouseService::new(state.db);
    service.delete_warehouse(warehouse_id).await?;
    Ok(Json(MessageResponse::new("Warehouse deleted")))
}
