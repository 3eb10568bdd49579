// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Maps raw store outcomes onto the closed set the HTTP layer reacts to.
//!
//! Classification looks only at the shape of the outcome (affected-row
//! count, the [`StoreError::NoRows`] variant), never at error text.

use super::{StoreError, StoreResult};

#[derive(Debug, thiserror::Error)]
pub enum ClassifiedError {
    #[error("not found")]
    NotFound,

    #[error("internal storage failure: {0}")]
    Internal(#[source] StoreError),
}

impl ClassifiedError {
    fn from_store(error: StoreError) -> Self {
        match error {
            StoreError::NoRows => ClassifiedError::NotFound,
            other => ClassifiedError::Internal(other),
        }
    }
}

/// Classify a conditional update or delete.
///
/// Zero affected rows with no error is `NotFound`.
pub fn classify_mutation(outcome: StoreResult<u64>) -> Result<u64, ClassifiedError> {
    match outcome {
        Ok(0) => Err(ClassifiedError::NotFound),
        Ok(rows) => Ok(rows),
        Err(error) => Err(ClassifiedError::from_store(error)),
    }
}

/// Classify a read by identifier.
pub fn classify_lookup<T>(outcome: StoreResult<T>) -> Result<T, ClassifiedError> {
    outcome.map_err(ClassifiedError::from_store)
}

/// Classify an operation where absence is not meaningful (inserts, listing).
pub fn classify_query<T>(outcome: StoreResult<T>) -> Result<T, ClassifiedError> {
    outcome.map_err(ClassifiedError::Internal)
}
