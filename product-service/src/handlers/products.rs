use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use serde_json::Value;
use service_core::error::AppError;

use crate::dtos::{
    item_from_document, CreateProductResponse, ListProductsParams, ListProductsResponse,
};
use crate::models::{Product, PRODUCT_COLLECTION};
use crate::services::{record_product_created, record_products_listed};
use crate::startup::AppState;

/// Validate an untyped body into a [`Product`] and persist it.
///
/// Every failure, including store failures, is reported as 400 with the raw message.
#[tracing::instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreateProductResponse>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;

    let product = Product::parse(body).map_err(|e| AppError::BadRequest(e.into()))?;

    if !product.has_known_category() {
        tracing::debug!(category = %product.category, "Product uses an unlisted category");
    }

    let id = state
        .store
        .insert(PRODUCT_COLLECTION, &product)
        .await
        .map_err(|e| AppError::BadRequest(e.into()))?;

    tracing::info!(
        product_id = %id,
        title = %product.title,
        category = %product.category,
        "Product created"
    );
    record_product_created(if product.has_known_category() {
        product.category.as_str()
    } else {
        "other"
    });

    Ok(Json(CreateProductResponse::created(id.to_hex())))
}

/// List products, optionally restricted to one category.
#[tracing::instrument(skip_all)]
pub async fn list_products(
    State(state): State<AppState>,
    params: Result<Query<ListProductsParams>, QueryRejection>,
) -> Result<Json<ListProductsResponse>, AppError> {
    let Query(params) =
        params.map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;

    let documents = state
        .store
        .query(PRODUCT_COLLECTION, params.filter(), params.limit())
        .await
        .map_err(|e| AppError::InternalError(e.into()))?;

    tracing::debug!(
        category = ?params.category,
        limit = params.limit(),
        count = documents.len(),
        "Products listed"
    );
    record_products_listed(documents.len());

    let items = documents.into_iter().map(item_from_document).collect();
    Ok(Json(ListProductsResponse { items }))
}
