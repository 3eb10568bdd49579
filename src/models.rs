// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and the
//! OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Products**: Catalog entries owned by the subject that created them
//! - **Login**: Credential exchange for a bearer token

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::SubjectId;

// =============================================================================
// Product Models
// =============================================================================

pub type ProductId = i64;

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Product {
    /// Store-assigned identifier, increasing in creation order.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    /// Subject id of the authenticated caller that created the product.
    pub creator_id: SubjectId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied product fields for create and update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub stock: i64,
}

impl ProductInput {
    /// Check field constraints. Returns the first violation as a message.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("price must be a non-negative number".to_string());
        }
        if self.stock < 0 {
            return Err("stock must not be negative".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Login Models
// =============================================================================

#[derive(Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// HS256 bearer token valid for one hour.
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, price: f64, stock: i64) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: String::new(),
            price,
            stock,
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(input("Lamp", 19.5, 3).validate().is_ok());
        assert!(input("Free sample", 0.0, 0).validate().is_ok());
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(input("  ", 1.0, 1).validate().is_err());
        assert!(input("Lamp", -0.01, 1).validate().is_err());
        assert!(input("Lamp", f64::NAN, 1).validate().is_err());
        assert!(input("Lamp", f64::INFINITY, 1).validate().is_err());
        assert!(input("Lamp", 1.0, -1).validate().is_err());
    }

    #[test]
    fn description_defaults_to_empty() {
        let parsed: ProductInput =
            serde_json::from_str(r#"{"name":"Lamp","price":2.5,"stock":1}"#).unwrap();
        assert_eq!(parsed.description, "");
    }

    #[test]
    fn login_request_debug_hides_password() {
        let request = LoginRequest {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{request:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }
}
