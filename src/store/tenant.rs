use std::sync::Arc;

use async_trait::async_trait;

use super::{Owned, Store, StoreError};

/// Wraps a raw store so every operation is confined to one organization.
///
/// Writes are stamped with the scope organization (overriding whatever the caller
/// supplied). Records owned by another organization answer exactly like records
/// that do not exist.
pub struct TenantScopedStore<T> {
    inner: Arc<dyn Store<T>>,
    organization: String,
}

impl<T: Owned> TenantScopedStore<T> {
    pub fn new(inner: Arc<dyn Store<T>>, organization: impl Into<String>) -> Self {
        Self {
            inner,
            organization: organization.into(),
        }
    }

    fn stamp(&self, item: &mut T) {
        if !item.organization().is_empty() && item.organization() != self.organization {
            tracing::debug!(
                "Overriding {} organization '{}' with scope '{}'",
                T::KIND,
                item.organization(),
                self.organization
            );
        }
        item.set_organization(&self.organization);
    }
}

#[async_trait]
impl<T: Owned> Store<T> for TenantScopedStore<T> {
    async fn all(&self) -> Result<Vec<T>, StoreError> {
        let items = self.inner.all().await?;
        Ok(items
            .into_iter()
            .filter(|item| item.organization() == self.organization)
            .collect())
    }

    async fn get(&self, id: &str) -> Result<T, StoreError> {
        let item = self.inner.get(id).await?;
        if item.organization() != self.organization {
            return Err(StoreError::not_found::<T>(id));
        }
        Ok(item)
    }

    async fn add(&self, mut item: T) -> Result<T, StoreError> {
        self.stamp(&mut item);
        self.inner.add(item).await
    }

    async fn update(&self, mut item: T) -> Result<(), StoreError> {
        // the target must already be visible from this scope
        self.get(item.id()).await?;
        self.stamp(&mut item);
        self.inner.update(item).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.get(id).await?;
        self.inner.delete(id).await
    }
}
