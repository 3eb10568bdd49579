// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded product database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `products`: product id → serialized Product (JSON bytes)
//! - `catalog_meta`: key → value (`next_product_id` sequence)

use std::path::Path;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{ProductStore, StoreError, StoreResult};
use crate::auth::SubjectId;
use crate::models::{Product, ProductId, ProductInput};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: product id → serialized Product (JSON bytes).
const PRODUCTS: TableDefinition<i64, &[u8]> = TableDefinition::new("products");

/// Catalog metadata: key → integer value.
const META: TableDefinition<&str, i64> = TableDefinition::new("catalog_meta");

const NEXT_PRODUCT_ID: &str = "next_product_id";

// =============================================================================
// RedbProductStore
// =============================================================================

pub struct RedbProductStore {
    db: Database,
}

impl RedbProductStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Unavailable(format!("create {}: {e}", parent.display())))?;
        }
        let db = Database::create(path)?;

        // Pre-create tables so read transactions on a fresh file succeed
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PRODUCTS)?;
            let _ = write_txn.open_table(META)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "Opened product database");
        Ok(Self { db })
    }
}

impl ProductStore for RedbProductStore {
    fn insert(&self, input: &ProductInput, creator_id: SubjectId) -> StoreResult<Product> {
        let write_txn = self.db.begin_write()?;
        let product = {
            let mut meta = write_txn.open_table(META)?;
            let id = match meta.get(NEXT_PRODUCT_ID)? {
                Some(value) => value.value(),
                None => 1,
            };
            meta.insert(NEXT_PRODUCT_ID, id + 1)?;

            let now = Utc::now();
            let product = Product {
                id,
                name: input.name.clone(),
                description: input.description.clone(),
                price: input.price,
                stock: input.stock,
                creator_id,
                created_at: now,
                updated_at: now,
            };
            let json = serde_json::to_vec(&product)?;
            let mut products = write_txn.open_table(PRODUCTS)?;
            products.insert(id, json.as_slice())?;
            product
        };
        write_txn.commit()?;
        Ok(product)
    }

    fn list(&self) -> StoreResult<Vec<Product>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS)?;
        let mut products = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            products.push(serde_json::from_slice(value.value())?);
        }
        Ok(products)
    }

    fn get(&self, id: ProductId) -> StoreResult<Product> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PRODUCTS)?;
        match table.get(id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StoreError::NoRows),
        }
    }

    fn update(&self, id: ProductId, input: &ProductInput) -> StoreResult<u64> {
        let write_txn = self.db.begin_write()?;
        let affected = {
            let mut table = write_txn.open_table(PRODUCTS)?;
            let existing = match table.get(id)? {
                Some(value) => Some(serde_json::from_slice::<Product>(value.value())?),
                None => None,
            };
            match existing {
                Some(mut product) => {
                    product.name = input.name.clone();
                    product.description = input.description.clone();
                    product.price = input.price;
                    product.stock = input.stock;
                    product.updated_at = Utc::now();
                    let json = serde_json::to_vec(&product)?;
                    table.insert(id, json.as_slice())?;
                    1
                }
                None => 0,
            }
        };
        write_txn.commit()?;
        Ok(affected)
    }

    fn delete(&self, id: ProductId) -> StoreResult<u64> {
        let write_txn = self.db.begin_write()?;
        let affected = {
            let mut table = write_txn.open_table(PRODUCTS)?;
            let removed = table.remove(id)?.is_some();
            u64::from(removed)
        };
        write_txn.commit()?;
        Ok(affected)
    }

    fn ping(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(PRODUCTS)?;
        Ok(())
    }
}
