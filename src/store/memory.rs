use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ConfigStore, OrganizationsStore, Resource, Store, StoreError, UsersStore};
use crate::database::models::{Config, Organization, User};

/// In-process store keyed by id. Iteration order is id order, which keeps
/// mapping evaluation stable across calls.
pub struct MemoryStore<T> {
    items: RwLock<BTreeMap<String, T>>,
}

impl<T: Resource> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
        }
    }

    /// Seed the store; records without an id get a generated one
    pub fn with_items(items: impl IntoIterator<Item = T>) -> Self {
        let map = items
            .into_iter()
            .map(|mut item| {
                if item.id().is_empty() {
                    item.set_id(generate_id());
                }
                (item.id().to_string(), item)
            })
            .collect();

        Self {
            items: RwLock::new(map),
        }
    }
}

impl<T: Resource> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl<T: Resource> Store<T> for MemoryStore<T> {
    async fn all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> Result<T, StoreError> {
        self.items
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found::<T>(id))
    }

    async fn add(&self, mut item: T) -> Result<T, StoreError> {
        if item.id().is_empty() {
            item.set_id(generate_id());
        }

        let mut items = self.items.write().await;
        if items.contains_key(item.id()) {
            return Err(StoreError::conflict::<T>(item.id()));
        }
        items.insert(item.id().to_string(), item.clone());
        Ok(item)
    }

    async fn update(&self, item: T) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        match items.get_mut(item.id()) {
            Some(existing) => {
                *existing = item;
                Ok(())
            }
            None => Err(StoreError::not_found::<T>(item.id())),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.items
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found::<T>(id))
    }
}

impl UsersStore for MemoryStore<User> {}

impl OrganizationsStore for MemoryStore<Organization> {}

impl ConfigStore for MemoryStore<Config> {}
