//! HTTP handlers for the product catalog

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use shared::{CreateProductInput, MessageResponse, Product, ProductId, StockView, UpdateProductInput};

use crate::error::AppResult;
use crate::services::{ProductService, StockService};
use crate::AppState;

pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.list_products().await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let service = ProductService::new(state.db);
    let product = service.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.update_product(product_id, input).await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> AppResult<Json<MessageResponse>> {
    let service = ProductService::new(state.db);
    service.delete_product(product_id).await?;
    Ok(Json(MessageResponse::new("Product deleted")))
}

/// Stock of one product in every warehouse
pub async fn get_product_stock(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> AppResult<Json<Vec<StockView>>> {
    let service = StockService::new(state.db);
    let stock = service.list_product_stock(product_id).await?;
    Ok(Json(stock))
}
