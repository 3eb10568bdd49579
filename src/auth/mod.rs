// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the catalog API.
//!
//! ## Auth Flow
//!
//! 1. Client posts credentials to `/v1/login`
//! 2. A [`CredentialVerifier`] establishes the principal and the
//!    [`TokenIssuer`] signs an HS256 token valid for one hour
//! 3. Client sends `Authorization: Bearer <token>` on protected routes
//! 4. The gate ([`middleware::require_auth`]):
//!    - Verifies structure, signature, claim shape and expiry
//!    - Binds a [`RequestIdentity`] to the request scope
//! 5. Handlers read the identity through the [`Auth`] extractor
//!
//! ## Security
//!
//! - The signing secret is loaded once at startup and zeroized on drop
//! - Every authentication failure yields the same `401` body
//! - Tokens and secrets are never logged

pub mod claims;
pub mod context;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod token;

pub use claims::{SubjectId, VerifiedClaims};
pub use context::{bind, resolve, RequestIdentity};
pub use credentials::{CredentialVerifier, DemoCredentials, Principal};
pub use error::AuthError;
pub use extractor::Auth;
pub use token::{Token, TokenIssuer, TokenVerifier, VerifyToken, TOKEN_LIFETIME_SECS};
