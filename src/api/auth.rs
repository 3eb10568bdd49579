// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::{
    auth::AuthError,
    error::{ApiError, ErrorBody},
    models::{LoginRequest, LoginResponse},
    state::AppState,
};

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/v1/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, body = LoginResponse),
        (status = 400, description = "Malformed request", body = ErrorBody),
        (status = 401, description = "Credentials rejected", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("username and password are required"));
    }

    let Some(principal) = state
        .credentials
        .authenticate(&request.username, &request.password)
    else {
        tracing::info!(username = %request.username, "Login rejected");
        return Err(ApiError::unauthorized());
    };

    let token = state
        .issuer
        .issue(principal.subject_id, &principal.role)
        .map_err(|err: AuthError| {
            tracing::error!(reason = err.error_code(), error = %err, "Token issuance failed");
            ApiError::internal()
        })?;

    tracing::info!(subject_id = principal.subject_id, "Issued token");
    Ok(Json(LoginResponse {
        token: token.into_inner(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::{CredentialVerifier, Principal};
    use crate::state::test_support::test_state;
    use axum::http::StatusCode;

    struct RejectAll;

    impl CredentialVerifier for RejectAll {
        fn authenticate(&self, _username: &str, _password: &str) -> Option<Principal> {
            None
        }
    }

    fn login_request(username: &str, password: &str) -> Result<Json<LoginRequest>, JsonRejection> {
        Ok(Json(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }))
    }

    #[tokio::test]
    async fn login_issues_verifiable_token_for_demo_principal() {
        let state = test_state();
        let Json(response) = login(State(state.clone()), login_request("alice", "pw"))
            .await
            .unwrap();

        let claims = state.verifier.verify(&response.token).unwrap();
        assert_eq!(claims.subject_id(), 1);
        assert_eq!(claims.role(), "admin");
    }

    #[tokio::test]
    async fn empty_fields_are_bad_request() {
        let err = login(State(test_state()), login_request("", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejected_credentials_are_unauthorized() {
        let state = test_state().with_credentials(Arc::new(RejectAll));
        let err = login(State(state), login_request("alice", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Unauthorized");
    }
}
