use std::sync::Arc;

use async_trait::async_trait;

use super::{OrganizationsStore, Store, StoreError};
use crate::database::models::Organization;

/// Organizations as seen by a member of a single organization: only their own,
/// editable but never created or deleted from here.
pub struct OrganizationScopedOrganizations {
    inner: Arc<dyn OrganizationsStore>,
    organization: String,
}

impl OrganizationScopedOrganizations {
    pub fn new(inner: Arc<dyn OrganizationsStore>, organization: impl Into<String>) -> Self {
        Self {
            inner,
            organization: organization.into(),
        }
    }
}

#[async_trait]
impl Store<Organization> for OrganizationScopedOrganizations {
    async fn all(&self) -> Result<Vec<Organization>, StoreError> {
        match self.inner.get(&self.organization).await {
            Ok(org) => Ok(vec![org]),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn get(&self, id: &str) -> Result<Organization, StoreError> {
        if id != self.organization {
            return Err(StoreError::not_found::<Organization>(id));
        }
        self.inner.get(id).await
    }

    async fn add(&self, _item: Organization) -> Result<Organization, StoreError> {
        Err(StoreError::Unauthorized(
            "organizations can only be created by a super admin".to_string(),
        ))
    }

    async fn update(&self, item: Organization) -> Result<(), StoreError> {
        if item.id != self.organization {
            return Err(StoreError::not_found::<Organization>(item.id));
        }
        self.inner.update(item).await
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Unauthorized(
            "organizations can only be deleted by a super admin".to_string(),
        ))
    }
}

#[async_trait]
impl OrganizationsStore for OrganizationScopedOrganizations {
    async fn default_organization(&self) -> Result<Organization, StoreError> {
        self.inner.default_organization().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::RoleName;
    use crate::store::MemoryStore;

    fn scoped() -> OrganizationScopedOrganizations {
        let raw = MemoryStore::with_items([
            Organization::default_organization(),
            Organization::new("org-a", "A", RoleName::Viewer),
            Organization::new("org-b", "B", RoleName::Editor),
        ]);
        OrganizationScopedOrganizations::new(Arc::new(raw), "org-a")
    }

    #[tokio::test]
    async fn sees_only_its_own_organization() {
        let store = scoped();

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "org-a");
        assert!(store.get("org-b").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn cannot_create_or_delete() {
        let store = scoped();

        let err = store
            .add(Organization::new("org-c", "C", RoleName::Member))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized(_)));
        assert!(matches!(
            store.delete("org-a").await.unwrap_err(),
            StoreError::Unauthorized(_)
        ));
    }

    #[tokio::test]
    async fn default_organization_is_delegated() {
        let store = scoped();
        assert!(store.default_organization().await.unwrap().is_default());
    }
}
