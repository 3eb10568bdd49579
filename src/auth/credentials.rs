// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Username/password check performed by the login endpoint before a token
//! is issued.

use super::claims::SubjectId;

/// Principal established by a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject_id: SubjectId,
    pub role: String,
}

/// Verifies login credentials. Returns `None` for rejected credentials.
pub trait CredentialVerifier: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> Option<Principal>;
}

/// Development verifier: accepts any non-empty pair and maps it to a fixed
/// principal. Not suitable for production use.
#[derive(Debug, Clone)]
pub struct DemoCredentials {
    principal: Principal,
}

impl DemoCredentials {
    pub fn new(subject_id: SubjectId, role: impl Into<String>) -> Self {
        Self {
            principal: Principal {
                subject_id,
                role: role.into(),
            },
        }
    }
}

impl Default for DemoCredentials {
    fn default() -> Self {
        Self::new(1, "admin")
    }
}

impl CredentialVerifier for DemoCredentials {
    fn authenticate(&self, username: &str, password: &str) -> Option<Principal> {
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(self.principal.clone())
    }
}
