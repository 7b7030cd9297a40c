//! Product catalog handlers

use axum::{extract::State, http::StatusCode, Json};
use core_kernel::{ProductId, ProductView};
use domain_product::ProductRequest;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::AppState;

/// Adds a product, answering 201 with its id
pub async fn add_product(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ProductRequest>,
) -> Result<(StatusCode, Json<ProductId>), ApiError> {
    let id = state.products.add_product(&request).await?;
    Ok((StatusCode::CREATED, Json(id)))
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>, ApiError> {
    Ok(Json(state.products.list_products().await?))
}

pub async fn products_by_type(
    State(state): State<AppState>,
    ApiPath(product_type): ApiPath<String>,
) -> Result<Json<Vec<ProductView>>, ApiError> {
    Ok(Json(state.products.products_by_type(&product_type).await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ProductView>, ApiError> {
    Ok(Json(state.products.get_product(ProductId::new(id)).await?))
}

pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<ProductRequest>,
) -> Result<StatusCode, ApiError> {
    state.products.update_product(ProductId::new(id), &request).await?;
    Ok(StatusCode::OK)
}

pub async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.products.delete_product(ProductId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Answers 200 if the product exists, active or not
pub async fn validate_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.products.validate_product(ProductId::new(id)).await?;
    Ok(StatusCode::OK)
}
