// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::middleware::require_auth,
    config::DEFAULT_REQUEST_TIMEOUT_SECS,
    error::ErrorBody,
    models::{LoginRequest, LoginResponse, Product, ProductInput},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod products;

/// Router with the default request timeout.
pub fn router(state: AppState) -> Router {
    router_with_timeout(state, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
}

pub fn router_with_timeout(state: AppState, request_timeout: Duration) -> Router {
    // Only product routes go through the gate. `route_layer` keeps unknown
    // paths answering 404 instead of 401.
    let product_routes = Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let v1_routes = Router::new()
        .route("/login", post(auth::login))
        .merge(product_routes);

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Adds the bearer token scheme referenced by the product endpoints.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::builder()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .description(Some("HS256 token issued by POST /v1/login."))
                .build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Catalog API",
        description = "Token-gated product catalog."
    ),
    paths(
        auth::login,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Product,
            ProductInput,
            LoginRequest,
            LoginResponse,
            ErrorBody,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "Auth", description = "Token issuance"),
        (name = "Products", description = "Product catalog management"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::{to_bytes, Body},
        http::{header::AUTHORIZATION, header::CONTENT_TYPE, Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    use crate::auth::{SubjectId, TokenIssuer};
    use crate::models::{Product, ProductId, ProductInput};
    use crate::state::test_support::test_secret;
    use crate::storage::{ProductStore, StoreError, StoreResult};

    /// Store whose every call fails as if the backend were unreachable.
    pub(crate) struct FailingStore;

    fn unreachable_backend<T>() -> StoreResult<T> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    impl ProductStore for FailingStore {
        fn insert(&self, _input: &ProductInput, _creator_id: SubjectId) -> StoreResult<Product> {
            unreachable_backend()
        }
        fn list(&self) -> StoreResult<Vec<Product>> {
            unreachable_backend()
        }
        fn get(&self, _id: ProductId) -> StoreResult<Product> {
            unreachable_backend()
        }
        fn update(&self, _id: ProductId, _input: &ProductInput) -> StoreResult<u64> {
            unreachable_backend()
        }
        fn delete(&self, _id: ProductId) -> StoreResult<u64> {
            unreachable_backend()
        }
        fn ping(&self) -> StoreResult<()> {
            unreachable_backend()
        }
    }

    /// `Authorization` header value for a freshly issued token.
    pub(crate) fn bearer_for(subject_id: SubjectId, role: &str) -> String {
        let token = TokenIssuer::new(&test_secret())
            .issue(subject_id, role)
            .unwrap();
        format!("Bearer {}", token.as_str())
    }

    /// Drive one request through the router and decode the JSON body
    /// (`Null` when empty).
    pub(crate) async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        auth: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}
