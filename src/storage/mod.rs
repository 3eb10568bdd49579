// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Product Storage
//!
//! Persistence collaborator for the catalog. Handlers talk to a
//! [`ProductStore`] trait object and pass every outcome through the
//! classifier in [`classify`] before choosing a response.
//!
//! ## Outcome Shape
//!
//! - Reads by identifier report absence with the [`StoreError::NoRows`]
//!   sentinel
//! - Updates and deletes report the number of affected rows; zero means the
//!   target did not exist
//! - Everything else is an infrastructure failure
//!
//! ## Backends
//!
//! - [`RedbProductStore`]: embedded ACID database file (`catalog.redb`)
//! - [`InMemoryProductStore`]: process-local map for tests and development

pub mod classify;
pub mod database;
pub mod memory;

pub use classify::{classify_lookup, classify_mutation, classify_query, ClassifiedError};
pub use database::RedbProductStore;
pub use memory::InMemoryProductStore;

use crate::auth::SubjectId;
use crate::models::{Product, ProductId, ProductInput};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Read-by-identifier found nothing.
    #[error("no rows in result set")]
    NoRows,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Product persistence operations.
pub trait ProductStore: Send + Sync {
    /// Insert a product owned by `creator_id` and return it with its new id.
    fn insert(&self, input: &ProductInput, creator_id: SubjectId) -> StoreResult<Product>;

    /// All products in ascending id order.
    fn list(&self) -> StoreResult<Vec<Product>>;

    /// Fetch one product, or [`StoreError::NoRows`].
    fn get(&self, id: ProductId) -> StoreResult<Product>;

    /// Overwrite the mutable fields of `id`. Returns rows affected.
    fn update(&self, id: ProductId, input: &ProductInput) -> StoreResult<u64>;

    /// Remove `id`. Returns rows affected.
    fn delete(&self, id: ProductId) -> StoreResult<u64>;

    /// Cheap liveness probe used by the readiness endpoint.
    fn ping(&self) -> StoreResult<()>;
}
