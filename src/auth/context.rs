// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request identity carrier.
//!
//! The identity lives in the request's own `Extensions`, keyed by its Rust
//! type, so it is dropped with the request and cannot be read from any other
//! request. Only [`RequestIdentity`] values can be stored under that key,
//! which rules out a wrongly-typed value at compile time.

use axum::http::Extensions;

use super::claims::{SubjectId, VerifiedClaims};
use super::AuthError;

/// Identity of the principal behind the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    subject_id: SubjectId,
    role: String,
}

impl RequestIdentity {
    pub fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    #[cfg(test)]
    pub(crate) fn for_tests(subject_id: SubjectId, role: &str) -> Self {
        Self {
            subject_id,
            role: role.to_string(),
        }
    }
}

impl From<VerifiedClaims> for RequestIdentity {
    fn from(claims: VerifiedClaims) -> Self {
        Self {
            subject_id: claims.subject_id(),
            role: claims.role().to_string(),
        }
    }
}

/// Attach `identity` to the request scope. Binding twice is an error.
pub fn bind(extensions: &mut Extensions, identity: RequestIdentity) -> Result<(), AuthError> {
    if extensions.get::<RequestIdentity>().is_some() {
        return Err(AuthError::IdentityAlreadyBound);
    }
    extensions.insert(identity);
    Ok(())
}

/// Read the identity bound by the authorization gate.
pub fn resolve(extensions: &Extensions) -> Result<&RequestIdentity, AuthError> {
    extensions
        .get::<RequestIdentity>()
        .ok_or(AuthError::IdentityAbsent)
}
