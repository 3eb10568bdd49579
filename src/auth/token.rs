// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token issuance and verification.
//!
//! Both halves are built from the same [`JwtSecret`] at startup and are
//! immutable afterwards, so they can be shared across requests behind an
//! `Arc` without locking. Neither performs I/O.
//!
//! ## Verification order
//!
//! 1. Structure: three segments, header and payload decode as base64url,
//!    header parses as a JWT header. Failure is [`AuthError::MalformedToken`].
//! 2. Signature: HMAC-SHA256 over `header.payload`, compared in constant time
//!    by the `hmac` backend of `jsonwebtoken`. Failure (including an
//!    undecodable signature segment or a foreign `alg`) is
//!    [`AuthError::InvalidSignature`].
//! 3. Claims shape: [`AuthError::ClaimsTypeMismatch`].
//! 4. Expiry: `exp` must be strictly in the future, no leeway.
//!    Failure is [`AuthError::TokenExpired`].

use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::Serialize;

use super::claims::{Claims, SubjectId, VerifiedClaims};
use super::AuthError;
use crate::config::JwtSecret;

/// Lifetime of every issued token.
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Signed bearer token.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Turns an already-authenticated principal into a signed token.
pub struct TokenIssuer {
    key: EncodingKey,
    header: Header,
}

impl TokenIssuer {
    pub fn new(secret: &JwtSecret) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            header: Header::new(ALGORITHM),
        }
    }

    /// Issue a token valid from now for [`TOKEN_LIFETIME_SECS`].
    pub fn issue(&self, subject_id: SubjectId, role: &str) -> Result<Token, AuthError> {
        self.issue_at(subject_id, role, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject_id: SubjectId,
        role: &str,
        now: DateTime<Utc>,
    ) -> Result<Token, AuthError> {
        if role.trim().is_empty() {
            return Err(AuthError::EmptyRole);
        }

        let iat = now.timestamp();
        let claims = Claims {
            subject_id,
            role: role.to_string(),
            iat,
            exp: iat + TOKEN_LIFETIME_SECS,
        };

        encode(&self.header, &claims, &self.key)
            .map(Token)
            .map_err(|e| AuthError::SigningFailure(e.to_string()))
    }
}

/// Seam used by the authorization gate, so tests can observe whether
/// verification ran at all.
pub trait VerifyToken {
    fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError>;
}

/// Turns an inbound token into verified claims or a typed rejection.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &JwtSecret) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedClaims, AuthError> {
        check_structure(token)?;

        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                // Header and payload were decoded above, so this is the signature segment.
                ErrorKind::Base64(_) => AuthError::InvalidSignature,
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                    AuthError::ClaimsTypeMismatch
                }
                _ => AuthError::MalformedToken,
            })?
            .claims;

        if !claims.is_well_formed() {
            return Err(AuthError::ClaimsTypeMismatch);
        }
        if claims.exp <= now.timestamp() {
            return Err(AuthError::TokenExpired);
        }

        Ok(VerifiedClaims::from_verified(claims))
    }
}

impl VerifyToken for TokenVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthError> {
        TokenVerifier::verify(self, token)
    }
}

fn check_structure(token: &str) -> Result<(), AuthError> {
    let mut segments = token.split('.');
    let (Some(header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::MalformedToken);
    };

    if header.is_empty() || payload.is_empty() {
        return Err(AuthError::MalformedToken);
    }
    URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AuthError::MalformedToken)?;
    decode_header(token).map_err(|_| AuthError::MalformedToken)?;

    Ok(())
}
