use std::sync::Arc;

use async_trait::async_trait;

use super::{Store, StoreError, UsersStore};
use crate::database::models::{Role, User};

/// Users as seen from inside one organization.
///
/// Membership is expressed through roles rather than an owner field: a user is
/// visible only while it holds a role in the scope organization, and every user
/// handed back carries that single role. Deleting removes the membership, not the
/// identity.
pub struct OrganizationScopedUsers {
    inner: Arc<dyn UsersStore>,
    organization: String,
}

impl OrganizationScopedUsers {
    pub fn new(inner: Arc<dyn UsersStore>, organization: impl Into<String>) -> Self {
        Self {
            inner,
            organization: organization.into(),
        }
    }

    fn scoped(&self, user: User) -> Option<User> {
        let role = user.role_in(&self.organization)?.clone();
        Some(User {
            roles: vec![role],
            ..user
        })
    }

    /// The single role a submission may carry inside this scope
    fn scope_role(&self, user: &User) -> Result<Role, StoreError> {
        if let Some(foreign) = user.roles.iter().find(|r| r.organization != self.organization) {
            return Err(StoreError::Validation(format!(
                "role for organization '{}' cannot be assigned from organization '{}'",
                foreign.organization, self.organization
            )));
        }
        user.role_in(&self.organization).cloned().ok_or_else(|| {
            StoreError::Validation(format!(
                "user must have a role in organization '{}'",
                self.organization
            ))
        })
    }

    async fn visible(&self, id: &str) -> Result<User, StoreError> {
        let user = self.inner.get(id).await?;
        if !user.has_role_in(&self.organization) {
            return Err(StoreError::not_found::<User>(id));
        }
        Ok(user)
    }
}

fn replace_role(roles: &mut Vec<Role>, role: Role) {
    roles.retain(|r| r.organization != role.organization);
    roles.push(role);
}

#[async_trait]
impl Store<User> for OrganizationScopedUsers {
    async fn all(&self) -> Result<Vec<User>, StoreError> {
        let users = self.inner.all().await?;
        Ok(users.into_iter().filter_map(|u| self.scoped(u)).collect())
    }

    async fn get(&self, id: &str) -> Result<User, StoreError> {
        let user = self.visible(id).await?;
        self.scoped(user).ok_or_else(|| StoreError::not_found::<User>(id))
    }

    async fn add(&self, user: User) -> Result<User, StoreError> {
        let role = self.scope_role(&user)?;

        match self.inner.find(&user.name, &user.provider, &user.scheme).await {
            Ok(mut existing) => {
                if existing.has_role_in(&self.organization) {
                    return Err(StoreError::conflict::<User>(existing.id));
                }
                tracing::debug!(
                    "Adding existing user '{}' to organization '{}'",
                    existing.name,
                    self.organization
                );
                replace_role(&mut existing.roles, role);
                self.inner.update(existing.clone()).await?;
                self.scoped(existing)
                    .ok_or_else(|| StoreError::Backend("membership was not persisted".to_string()))
            }
            Err(e) if e.is_not_found() => {
                let created = self
                    .inner
                    .add(User {
                        roles: vec![role],
                        ..user
                    })
                    .await?;
                self.scoped(created)
                    .ok_or_else(|| StoreError::Backend("membership was not persisted".to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn update(&self, user: User) -> Result<(), StoreError> {
        let role = self.scope_role(&user)?;
        let mut current = self.visible(&user.id).await?;

        replace_role(&mut current.roles, role);
        current.super_admin = user.super_admin;
        self.inner.update(current).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut current = self.visible(id).await?;
        current.roles.retain(|r| r.organization != self.organization);
        self.inner.update(current).await
    }
}

#[async_trait]
impl UsersStore for OrganizationScopedUsers {
    async fn find(&self, name: &str, provider: &str, scheme: &str) -> Result<User, StoreError> {
        let user = self.inner.find(name, provider, scheme).await?;
        let id = user.id.clone();
        self.scoped(user).ok_or_else(|| StoreError::not_found::<User>(id))
    }
}
