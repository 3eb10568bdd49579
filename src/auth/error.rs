// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Authentication error type.
///
/// Every credential problem maps to the same `401` response; the variant is
/// only visible in server-side logs through [`AuthError::error_code`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is required")]
    MissingAuthHeader,
    /// Header present but not `Bearer <token>`
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    /// Token cannot be parsed
    #[error("Token is malformed")]
    MalformedToken,
    /// Token signature does not match the trusted secret
    #[error("Token signature is invalid")]
    InvalidSignature,
    /// Token is authentic but past its expiry
    #[error("Token has expired")]
    TokenExpired,
    /// Token payload does not have the expected claim shape
    #[error("Token claims do not match the expected shape")]
    ClaimsTypeMismatch,
    /// Signing a new token failed
    #[error("Failed to sign token: {0}")]
    SigningFailure(String),
    /// Refused to issue a token without a role
    #[error("Cannot issue a token with an empty role")]
    EmptyRole,
    /// Handler asked for an identity the gate never bound
    #[error("No identity bound to this request")]
    IdentityAbsent,
    /// Gate tried to bind a second identity to one request
    #[error("An identity is already bound to this request")]
    IdentityAlreadyBound,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::ClaimsTypeMismatch => "claims_type_mismatch",
            AuthError::SigningFailure(_) => "signing_failure",
            AuthError::EmptyRole => "empty_role",
            AuthError::IdentityAbsent => "identity_absent",
            AuthError::IdentityAlreadyBound => "identity_already_bound",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::ClaimsTypeMismatch => StatusCode::UNAUTHORIZED,
            AuthError::SigningFailure(_)
            | AuthError::EmptyRole
            | AuthError::IdentityAbsent
            | AuthError::IdentityAlreadyBound => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == StatusCode::UNAUTHORIZED
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if self.is_unauthorized() {
            let mut response = ApiError::unauthorized().into_response();
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            response
        } else {
            ApiError::internal().into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(error: AuthError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_auth_returns_401_with_challenge() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");
    }

    #[tokio::test]
    async fn verification_failures_are_indistinguishable_externally() {
        let expected = body_of(AuthError::MalformedToken).await;
        for error in [
            AuthError::MissingAuthHeader,
            AuthError::InvalidAuthHeader,
            AuthError::InvalidSignature,
            AuthError::TokenExpired,
            AuthError::ClaimsTypeMismatch,
        ] {
            assert_eq!(body_of(error).await, expected);
        }
        assert_eq!(expected.0, StatusCode::UNAUTHORIZED);
        assert_eq!(expected.1["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn internal_failures_do_not_leak_detail() {
        let (status, body) =
            body_of(AuthError::SigningFailure("InvalidKeyFormat".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("InvalidKeyFormat"));
    }

    #[test]
    fn error_codes_distinguish_expired_from_malformed() {
        assert_ne!(
            AuthError::TokenExpired.error_code(),
            AuthError::MalformedToken.error_code()
        );
        assert_eq!(AuthError::TokenExpired.error_code(), "token_expired");
    }
}
