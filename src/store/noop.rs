use async_trait::async_trait;

use super::{ConfigStore, OrganizationsStore, Resource, Store, StoreError, UsersStore};

/// Store handed out when the request carries neither a server, super admin nor
/// organization claim. Reads come back empty, writes are refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpStore;

impl NoOpStore {
    fn deny<T: Resource>(operation: &str) -> StoreError {
        tracing::warn!("Denied {} on {}: request has no organization context", operation, T::KIND);
        StoreError::Unauthorized(format!(
            "cannot {} {} without an organization context",
            operation,
            T::KIND
        ))
    }
}

#[async_trait]
impl<T: Resource> Store<T> for NoOpStore {
    async fn all(&self) -> Result<Vec<T>, StoreError> {
        Ok(Vec::new())
    }

    async fn get(&self, id: &str) -> Result<T, StoreError> {
        Err(StoreError::not_found::<T>(id))
    }

    async fn add(&self, _item: T) -> Result<T, StoreError> {
        Err(Self::deny::<T>("add"))
    }

    async fn update(&self, _item: T) -> Result<(), StoreError> {
        Err(Self::deny::<T>("update"))
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(Self::deny::<T>("delete"))
    }
}

impl UsersStore for NoOpStore {}

impl OrganizationsStore for NoOpStore {}

impl ConfigStore for NoOpStore {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Dashboard, Source};

    #[tokio::test]
    async fn reads_are_empty_and_writes_unauthorized() {
        let store = NoOpStore;

        let sources = Store::<Source>::all(&store).await.unwrap();
        assert!(sources.is_empty());

        let err = Store::<Dashboard>::get(&store, "1").await.unwrap_err();
        assert!(err.is_not_found());

        let err = Store::<Dashboard>::delete(&store, "1").await.unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized(_)));
    }
}
