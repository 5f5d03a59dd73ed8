use serde::{Deserialize, Serialize};

use crate::auth::{AuthContext, RoleGuard, RoleRequest};
use crate::database::models::{User, OAUTH2_SCHEME};
use crate::store::{Store, StoreError, StoreFacade, UsersStore};

use super::ServiceError;

/// New user as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSubmission {
    pub name: String,
    pub provider: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default)]
    pub super_admin: bool,
    #[serde(default)]
    pub roles: Vec<RoleRequest>,
}

fn default_scheme() -> String {
    OAUTH2_SCHEME.to_string()
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub roles: Option<Vec<RoleRequest>>,
    pub super_admin: Option<bool>,
}

/// User writes, always validated by [`RoleGuard`] before they reach a store
#[derive(Clone)]
pub struct UserService {
    facade: StoreFacade,
    guard: RoleGuard,
}

impl UserService {
    pub fn new(facade: StoreFacade, guard: RoleGuard) -> Self {
        Self { facade, guard }
    }

    pub async fn create(&self, ctx: &AuthContext, submission: UserSubmission) -> Result<User, ServiceError> {
        if submission.name.is_empty() || submission.provider.is_empty() {
            return Err(ServiceError::Invalid("name and provider are required".to_string()));
        }

        let roles = self
            .guard
            .validate_role_submission(ctx, None, &submission.roles, submission.super_admin)
            .await?;

        let users = self.facade.users(ctx);
        match users
            .find(&submission.name, &submission.provider, &submission.scheme)
            .await
        {
            Ok(existing) => return Err(StoreError::conflict::<User>(existing.id).into()),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }

        let created = users
            .add(User {
                id: String::new(),
                name: submission.name,
                provider: submission.provider,
                scheme: submission.scheme,
                super_admin: submission.super_admin,
                roles,
            })
            .await?;

        tracing::info!("Created user '{}' ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn update(&self, ctx: &AuthContext, id: &str, patch: UserPatch) -> Result<User, ServiceError> {
        let users = self.facade.users(ctx);
        let current = users.get(id).await?;

        let requested = match patch.roles {
            Some(roles) => roles,
            None => current.roles.iter().map(RoleRequest::from).collect(),
        };
        let super_admin = patch.super_admin.unwrap_or(current.super_admin);

        let roles = self
            .guard
            .validate_role_submission(ctx, Some(&current), &requested, super_admin)
            .await?;

        users
            .update(User {
                roles,
                super_admin,
                ..current
            })
            .await?;

        Ok(users.get(id).await?)
    }
}
