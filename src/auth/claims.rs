// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and their verified form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of an authenticated principal.
pub type SubjectId = i64;

/// Claims as carried on the wire.
///
/// Only the token module builds or decodes this type. Everything outside
/// `auth` sees [`VerifiedClaims`], which cannot be constructed without a
/// successful signature check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Claims {
    /// Principal identifier (owner of created resources)
    #[serde(rename = "user_id")]
    pub subject_id: SubjectId,

    /// Coarse role tag
    pub role: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

impl Claims {
    /// Shape checks serde cannot express.
    pub(crate) fn is_well_formed(&self) -> bool {
        !self.role.trim().is_empty() && self.exp > self.iat
    }
}

/// Claims that passed signature, expiry and shape verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    claims: Claims,
}

impl VerifiedClaims {
    pub(in crate::auth) fn from_verified(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn subject_id(&self) -> SubjectId {
        self.claims.subject_id
    }

    pub fn role(&self) -> &str {
        &self.claims.role
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.claims.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.claims.exp, 0)
    }
}
