// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory product store for tests and local development.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::{ProductStore, StoreError, StoreResult};
use crate::auth::SubjectId;
use crate::models::{Product, ProductId, ProductInput};

#[derive(Default)]
struct Inner {
    products: BTreeMap<ProductId, Product>,
    last_id: ProductId,
}

#[derive(Default)]
pub struct InMemoryProductStore {
    inner: RwLock<Inner>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl ProductStore for InMemoryProductStore {
    fn insert(&self, input: &ProductInput, creator_id: SubjectId) -> StoreResult<Product> {
        let mut inner = self.write()?;
        inner.last_id += 1;
        let now = Utc::now();
        let product = Product {
            id: inner.last_id,
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            stock: input.stock,
            creator_id,
            created_at: now,
            updated_at: now,
        };
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    fn list(&self) -> StoreResult<Vec<Product>> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    fn get(&self, id: ProductId) -> StoreResult<Product> {
        self.read()?
            .products
            .get(&id)
            .cloned()
            .ok_or(StoreError::NoRows)
    }

    fn update(&self, id: ProductId, input: &ProductInput) -> StoreResult<u64> {
        let mut inner = self.write()?;
        let Some(product) = inner.products.get_mut(&id) else {
            return Ok(0);
        };
        product.name = input.name.clone();
        product.description = input.description.clone();
        product.price = input.price;
        product.stock = input.stock;
        product.updated_at = Utc::now();
        Ok(1)
    }

    fn delete(&self, id: ProductId) -> StoreResult<u64> {
        Ok(self.write()?.products.remove(&id).map_or(0, |_| 1))
    }

    fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }
}
