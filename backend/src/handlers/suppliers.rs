//! HTTP handlers for suppliers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use shared::{MessageResponse, Supplier, SupplierId, SupplierInput};

use crate::error::AppResult;
use crate::services::SupplierService;
use crate::AppState;

pub async fn list_suppliers(State(state): State<AppState>) -> AppResult<Json<Vec<Supplier>>> {
    let service = SupplierService::new(state.db);
    let suppliers = service.list_suppliers().await?;
    Ok(Json(suppliers))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<SupplierId>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.get_supplier(supplier_id).await?;
    Ok(Json(supplier))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    Json(input): Json<SupplierInput>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    let service = SupplierService::new(state.db);
    let supplier = service.create_supplier(input).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn update_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<SupplierId>,
    Json(input): Json<SupplierInput>,
) -> AppResult<Json<Supplier>> {
    let service = SupplierService::new(state.db);
    let supplier = service.update_supplier(supplier_id, input).await?;
    Ok(Json(supplier))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<SupplierId>,
) -> AppResult<Json<MessageResponse>> {
    let service = SupplierService::new(state.db);
    service.delete_supplier(supplier_id).await?;
    Ok(Json(MessageResponse::new("Supplier deleted")))
}
