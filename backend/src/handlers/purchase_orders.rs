//! HTTP handlers for purchase orders

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use shared::{
    CreatePurchaseOrderInput, CreatedPurchaseOrder, MessageResponse, OrderId, OrderReceipt,
    PurchaseOrderSummary, PurchaseOrderWithLines,
};

use crate::error::AppResult;
use crate::services::PurchaseOrderService;
use crate::AppState;

pub async fn list_purchase_orders(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PurchaseOrderSummary>>> {
    let service = PurchaseOrderService::new(state.db);
    let orders = service.list_orders().await?;
    Ok(Json(orders))
}

pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> AppResult<Json<PurchaseOrderWithLines>> {
    let service = PurchaseOrderService::new(state.db);
    let order = service.get_order(order_id).await?;
    Ok(Json(order))
}

/// Create a purchase order with its lines
pub async fn create_purchase_order(
    State(state): State<AppState>,
    Json(input): Json<CreatePurchaseOrderInput>,
) -> AppResult<(StatusCode, Json<CreatedPurchaseOrder>)> {
    let created = state.ledger.create_purchase_order(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Receive a purchase order into the default receiving warehouse
pub async fn receive_purchase_order(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> AppResult<Json<OrderReceipt>> {
    let receipt = state.ledger.receive_purchase_order(order_id).await?;
    Ok(Json(receipt))
}

pub async fn delete_purchase_order(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> AppResult<Json<MessageResponse>> {
    state.ledger.delete_purchase_order(order_id).await?;
    Ok(Json(MessageResponse::new("Purchase order deleted")))
}
