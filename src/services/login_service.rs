use crate::auth::{AuthContext, Principal, PrincipalRoleMapper};
use crate::database::models::{Config, Role, User, OAUTH2_SCHEME};
use crate::store::{ConfigStore, OrganizationsStore, Store, StoreError, StoreFacade, UsersStore};

use super::ServiceError;

/// Turns an authenticated principal into a stored user and its request context
#[derive(Clone)]
pub struct LoginService {
    facade: StoreFacade,
    mapper: PrincipalRoleMapper,
}

impl LoginService {
    pub fn new(facade: StoreFacade, mapper: PrincipalRoleMapper) -> Self {
        Self { facade, mapper }
    }

    /// Find the user behind `principal`, creating it from the mapping rules on
    /// first login.
    pub async fn provision(&self, principal: &Principal) -> Result<(User, AuthContext), ServiceError> {
        let server = AuthContext::server();
        let users = self.facade.users(&server);

        let user = match users
            .find(&principal.subject, &principal.issuer, OAUTH2_SCHEME)
            .await
        {
            Ok(mut user) => {
                if !user.super_admin && self.mapper.map_to_super_admin(principal) {
                    tracing::info!("Promoting '{}' to super admin by group mapping", user.name);
                    user.super_admin = true;
                    users.update(user.clone()).await?;
                }
                user
            }
            Err(e) if e.is_not_found() => self.create_user(principal).await?,
            Err(e) => return Err(e.into()),
        };

        let ctx = Self::context_for(&user, Some(&principal.organization))?;
        Ok((user, ctx))
    }

    async fn create_user(&self, principal: &Principal) -> Result<User, ServiceError> {
        let server = AuthContext::server();

        let roles = self.mapper.map_to_roles(principal).await?;
        let super_admin =
            self.mapper.map_to_super_admin(principal) || self.super_admin_new_users().await?;

        if roles.is_empty() && !super_admin {
            tracing::warn!(
                "No mapping admits '{}' from '{}'",
                principal.subject,
                principal.issuer
            );
            return Err(StoreError::Unauthorized(format!(
                "no organization mapping admits '{}'",
                principal.subject
            ))
            .into());
        }

        let roles = if roles.is_empty() {
            let default_org = self.facade.organizations(&server).default_organization().await?;
            vec![Role::new(default_org.id, default_org.default_role)]
        } else {
            roles
        };

        let created = self
            .facade
            .users(&server)
            .add(User {
                id: String::new(),
                name: principal.subject.clone(),
                provider: principal.issuer.clone(),
                scheme: OAUTH2_SCHEME.to_string(),
                super_admin,
                roles,
            })
            .await?;

        tracing::info!(
            "Created user '{}' with {} role(s), super admin: {}",
            created.name,
            created.roles.len(),
            created.super_admin
        );
        Ok(created)
    }

    async fn super_admin_new_users(&self) -> Result<bool, StoreError> {
        match self.facade.config(&AuthContext::server()).config().await {
            Ok(config) => Ok(config.auth.super_admin_new_users),
            Err(e) if e.is_not_found() => Ok(Config::default().auth.super_admin_new_users),
            Err(e) => Err(e),
        }
    }

    /// Context for `user` acting in `requested`, or in their first organization
    /// when no organization is requested. Super admins may act in any organization.
    pub fn context_for(user: &User, requested: Option<&str>) -> Result<AuthContext, ServiceError> {
        let organization = match requested.filter(|org| !org.is_empty()) {
            Some(org) if user.super_admin || user.has_role_in(org) => Some(org.to_string()),
            Some(org) => {
                return Err(ServiceError::Forbidden(format!(
                    "user '{}' is not a member of organization '{}'",
                    user.name, org
                )))
            }
            None => user.roles.first().map(|r| r.organization.clone()),
        };

        Ok(AuthContext::for_user(user.clone(), organization))
    }
}
