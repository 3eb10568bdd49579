// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{CredentialVerifier, DemoCredentials, TokenIssuer, TokenVerifier};
use crate::config::JwtSecret;
use crate::storage::ProductStore;

/// Shared, immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub issuer: Arc<TokenIssuer>,
    pub verifier: Arc<TokenVerifier>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl AppState {
    /// Build state with both token halves keyed from `secret` and the demo
    /// credential check.
    pub fn new(store: Arc<dyn ProductStore>, secret: &JwtSecret) -> Self {
        Self {
            store,
            issuer: Arc::new(TokenIssuer::new(secret)),
            verifier: Arc::new(TokenVerifier::new(secret)),
            credentials: Arc::new(DemoCredentials::default()),
        }
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialVerifier>) -> Self {
        self.credentials = credentials;
        self
    }
}
