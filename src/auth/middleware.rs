// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization gate for Axum.
//!
//! Mounted with `route_layer` in front of every protected route:
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/products", get(list_products))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth))
//! ```
//!
//! Per request the gate moves through
//! `NoCredential -> CredentialPresent -> Verified -> IdentityBound`, or stops
//! at `Rejected`. A rejected request never reaches the handler and never has
//! an identity bound. Binding happens synchronously after verification, so a
//! request dropped earlier leaves nothing behind.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::context::{self, RequestIdentity};
use super::token::VerifyToken;
use super::AuthError;
use crate::state::AppState;

/// Literal scheme prefix, including the separating space. Case-sensitive.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Strip the bearer scheme from an `Authorization` header value.
///
/// Rejects anything that does not start with [`BEARER_PREFIX`] exactly,
/// including values shorter than the prefix and a prefix with no token.
pub fn bearer_token(header_value: &str) -> Result<&str, AuthError> {
    match header_value.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::InvalidAuthHeader),
    }
}

/// Run extraction and verification for one request's headers.
pub fn authorize<V>(headers: &HeaderMap, verifier: &V) -> Result<RequestIdentity, AuthError>
where
    V: VerifyToken + ?Sized,
{
    let header_value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = bearer_token(header_value)?;
    let claims = verifier.verify(token)?;

    Ok(RequestIdentity::from(claims))
}

/// Authentication middleware function.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let identity = match authorize(request.headers(), state.verifier.as_ref()) {
        Ok(identity) => identity,
        Err(err) => {
            tracing::info!(
                reason = err.error_code(),
                method = %request.method(),
                path = %request.uri().path(),
                "Request rejected by authorization gate"
            );
            return err.into_response();
        }
    };

    if let Err(err) = context::bind(request.extensions_mut(), identity) {
        tracing::error!(
            reason = err.error_code(),
            path = %request.uri().path(),
            "Failed to bind request identity"
        );
        return err.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::auth::{Auth, TokenIssuer, VerifiedClaims};
    use crate::state::test_support::{test_secret, test_state};
    use axum::{
        body::{to_bytes, Body},
        http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Json, Router,
    };
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    /// Verifier double that counts invocations and always rejects.
    #[derive(Default)]
    struct CountingVerifier {
        calls: AtomicUsize,
    }

    impl VerifyToken for CountingVerifier {
        fn verify(&self, _token: &str) -> Result<VerifiedClaims, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AuthError::InvalidSignature)
        }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    /// Router with one protected route that records whether it ran and
    /// echoes the resolved subject.
    fn protected_app(reached: Arc<AtomicBool>) -> Router {
        let state = test_state();
        Router::new()
            .route(
                "/whoami",
                get(move |Auth(identity): Auth| {
                    let reached = reached.clone();
                    async move {
                        reached.store(true, Ordering::SeqCst);
                        Json(serde_json::json!({ "subject_id": identity.subject_id() }))
                    }
                }),
            )
            .route_layer(from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    fn request(auth: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn bearer_token_strips_exact_prefix() {
        assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
    }

    #[test]
    fn bearer_token_rejects_wrong_or_short_values() {
        for value in ["", "B", "Bearer", "Bearer ", "bearer abc", "BEARER abc", "Basic abc", "Bearerabc"] {
            assert!(
                matches!(bearer_token(value), Err(AuthError::InvalidAuthHeader)),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn missing_header_is_rejected_and_nothing_is_bound() {
        let verifier = CountingVerifier::default();
        let request = axum::http::Request::builder().body(()).unwrap();

        let result = authorize(request.headers(), &verifier);
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
        assert!(matches!(
            context::resolve(request.extensions()),
            Err(AuthError::IdentityAbsent)
        ));
    }

    #[test]
    fn wrong_scheme_never_reaches_verifier() {
        let verifier = CountingVerifier::default();

        let result = authorize(&headers_with("Basic abc"), &verifier);
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn bearer_token_is_passed_to_verifier() {
        let verifier = CountingVerifier::default();

        let result = authorize(&headers_with("Bearer whatever"), &verifier);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn non_ascii_header_is_invalid() {
        let verifier = CountingVerifier::default();
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );

        assert!(matches!(
            authorize(&headers, &verifier),
            Err(AuthError::InvalidAuthHeader)
        ));
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_token_binds_subject_for_handler() {
        let reached = Arc::new(AtomicBool::new(false));
        let token = TokenIssuer::new(&test_secret()).issue(123, "admin").unwrap();

        let response = protected_app(reached.clone())
            .oneshot(request(Some(&format!("Bearer {}", token.as_str()))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(reached.load(Ordering::SeqCst));
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["subject_id"], 123);
    }

    #[tokio::test]
    async fn missing_header_short_circuits_handler() {
        let reached = Arc::new(AtomicBool::new(false));

        let response = protected_app(reached.clone())
            .oneshot(request(None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[WWW_AUTHENTICATE], "Bearer");
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn expired_token_short_circuits_handler() {
        let reached = Arc::new(AtomicBool::new(false));
        let issued = Utc::now() - Duration::hours(1) - Duration::seconds(1);
        let token = TokenIssuer::new(&test_secret())
            .issue_at(123, "admin", issued)
            .unwrap();

        let response = protected_app(reached.clone())
            .oneshot(request(Some(&format!("Bearer {}", token.as_str()))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(!reached.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn rejection_body_does_not_reveal_reason() {
        let expired = TokenIssuer::new(&test_secret())
            .issue_at(1, "admin", Utc::now() - Duration::hours(3))
            .unwrap();

        let mut bodies = Vec::new();
        for auth in [
            None,
            Some("Basic abc".to_string()),
            Some("Bearer not-a-token".to_string()),
            Some(format!("Bearer {}", expired.as_str())),
        ] {
            let response = protected_app(Arc::new(AtomicBool::new(false)))
                .oneshot(request(auth.as_deref()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            bodies.push(to_bytes(response.into_body(), usize::MAX).await.unwrap());
        }

        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    }
}
