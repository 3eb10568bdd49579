// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated identity.
//!
//! Use the `Auth` extractor in handlers mounted behind the authorization
//! gate:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity.subject_id() is the verified principal
//! }
//! ```
//!
//! The extractor never looks at headers itself. If the gate did not run for
//! a route, extraction fails with [`AuthError::IdentityAbsent`], which is a
//! wiring bug and surfaces as a 500.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::context::{self, RequestIdentity};
use super::AuthError;

/// Extractor for the identity bound by the authorization gate.
pub struct Auth(pub RequestIdentity);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match context::resolve(&parts.extensions) {
            Ok(identity) => Ok(Auth(identity.clone())),
            Err(err) => {
                tracing::error!(
                    path = %parts.uri.path(),
                    reason = err.error_code(),
                    "Handler reached without a bound identity; route is missing the auth gate"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;

    fn empty_parts() -> Parts {
        Request::builder()
            .uri("/test")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn auth_extractor_reads_bound_identity() {
        let mut parts = empty_parts();
        context::bind(&mut parts.extensions, RequestIdentity::for_tests(123, "admin")).unwrap();

        let Auth(identity) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(identity.subject_id(), 123);
    }

    #[tokio::test]
    async fn auth_extractor_without_gate_is_internal_error() {
        let mut parts = empty_parts();

        let result = Auth::from_request_parts(&mut parts, &()).await;
        let err = match result {
            Err(err) => err,
            Ok(_) => panic!("extraction must fail without a bound identity"),
        };
        assert!(matches!(err, AuthError::IdentityAbsent));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
