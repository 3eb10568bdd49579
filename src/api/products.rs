// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Product CRUD endpoints. Every route here sits behind the authorization
//! gate and receives the caller through [`Auth`].

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::{Product, ProductId, ProductInput},
    state::AppState,
    storage::{classify_lookup, classify_mutation, classify_query},
};

const RESOURCE: &str = "Product";

fn validated(payload: Result<Json<ProductInput>, JsonRejection>) -> Result<ProductInput, ApiError> {
    let Json(input) = payload?;
    input.validate().map_err(ApiError::unprocessable)?;
    Ok(input)
}

#[utoipa::path(
    get,
    path = "/v1/products",
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = [Product]),
        (status = 401, body = ErrorBody)
    )
)]
pub async fn list_products(
    Auth(_identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = classify_query(state.store.list())
        .map_err(|e| ApiError::from_classified(e, RESOURCE))?;
    Ok(Json(products))
}

#[utoipa::path(
    post,
    path = "/v1/products",
    request_body = ProductInput,
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = Product),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 422, body = ErrorBody)
    )
)]
pub async fn create_product(
    Auth(identity): Auth,
    State(state): State<AppState>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let input = validated(payload)?;
    let product = classify_query(state.store.insert(&input, identity.subject_id()))
        .map_err(|e| ApiError::from_classified(e, RESOURCE))?;

    tracing::info!(
        product_id = product.id,
        creator_id = identity.subject_id(),
        "Created product"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/v1/products/{id}",
    params(("id" = i64, Path, description = "Product identifier")),
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Product),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_product(
    Auth(_identity): Auth,
    State(state): State<AppState>,
    id: Result<Path<ProductId>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    let product = classify_lookup(state.store.get(id))
        .map_err(|e| ApiError::from_classified(e, RESOURCE))?;
    Ok(Json(product))
}

#[utoipa::path(
    put,
    path = "/v1/products/{id}",
    params(("id" = i64, Path, description = "Product identifier")),
    request_body = ProductInput,
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Product),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 422, body = ErrorBody)
    )
)]
pub async fn update_product(
    Auth(identity): Auth,
    State(state): State<AppState>,
    id: Result<Path<ProductId>, PathRejection>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(id) = id?;
    let input = validated(payload)?;

    classify_mutation(state.store.update(id, &input))
        .map_err(|e| ApiError::from_classified(e, RESOURCE))?;
    let product = classify_lookup(state.store.get(id))
        .map_err(|e| ApiError::from_classified(e, RESOURCE))?;

    tracing::info!(product_id = id, subject_id = identity.subject_id(), "Updated product");
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/v1/products/{id}",
    params(("id" = i64, Path, description = "Product identifier")),
    tag = "Products",
    security(("bearer_auth" = [])),
    responses(
        (status = 204),
        (status = 400, body = ErrorBody),
        (status = 401, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn delete_product(
    Auth(identity): Auth,
    State(state): State<AppState>,
    id: Result<Path<ProductId>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    classify_mutation(state.store.delete(id))
        .map_err(|e| ApiError::from_classified(e, RESOURCE))?;

    tracing::info!(product_id = id, subject_id = identity.subject_id(), "Deleted product");
    Ok(StatusCode::NO_CONTENT)
}
