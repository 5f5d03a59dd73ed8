use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AuthContext;
use crate::database::models::{Role, RoleName, UnknownRole, User};
use crate::store::{OrganizationsStore, StoreError};

/// A role as submitted by a client, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRequest {
    #[serde(default)]
    pub organization: String,
    pub name: String,
}

impl RoleRequest {
    pub fn new(organization: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            name: name.into(),
        }
    }
}

impl From<&Role> for RoleRequest {
    fn from(role: &Role) -> Self {
        Self::new(role.organization.clone(), role.name.as_str())
    }
}

#[derive(Debug, Error)]
pub enum RoleGuardError {
    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),

    #[error("role must name an organization")]
    MissingOrganization,

    #[error("duplicate organization '{0}' in role list")]
    DuplicateOrganization(String),

    #[error("organization '{0}' does not exist")]
    UnknownOrganization(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("users cannot remove their own super admin status")]
    SelfDemotion,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Validates role and SuperAdmin submissions before any user write reaches a store
#[derive(Clone)]
pub struct RoleGuard {
    organizations: Arc<dyn OrganizationsStore>,
}

impl RoleGuard {
    /// `organizations` should be unscoped so any live organization can be checked
    pub fn new(organizations: Arc<dyn OrganizationsStore>) -> Self {
        Self { organizations }
    }

    /// Returns the roles to persist, with wildcards resolved to each organization's
    /// default role. `target` is `None` when creating a user.
    pub async fn validate_role_submission(
        &self,
        caller: &AuthContext,
        target: Option<&User>,
        roles: &[RoleRequest],
        super_admin: bool,
    ) -> Result<Vec<Role>, RoleGuardError> {
        let mut seen = HashSet::new();
        for role in roles {
            if role.organization.is_empty() {
                return Err(RoleGuardError::MissingOrganization);
            }
            if !seen.insert(role.organization.as_str()) {
                return Err(RoleGuardError::DuplicateOrganization(role.organization.clone()));
            }
        }

        let parsed = roles
            .iter()
            .map(|r| Ok((r.organization.as_str(), r.name.parse::<RoleName>()?)))
            .collect::<Result<Vec<_>, RoleGuardError>>()?;

        self.check_super_admin(caller, target, super_admin)?;
        Self::check_role_authority(caller, &parsed)?;

        let mut resolved = Vec::with_capacity(parsed.len());
        for (organization, name) in parsed {
            let org = match self.organizations.get(organization).await {
                Ok(org) => org,
                Err(e) if e.is_not_found() => {
                    return Err(RoleGuardError::UnknownOrganization(organization.to_string()))
                }
                Err(e) => return Err(e.into()),
            };

            let name = match name {
                RoleName::Wildcard => org.default_role,
                explicit => explicit,
            };
            resolved.push(Role::new(org.id, name));
        }

        Ok(resolved)
    }

    /// Outside server calls and super admins, roles may only be granted in the
    /// caller's current organization, and only by an admin of it. Foreign
    /// organizations are refused before any lookup so their existence never leaks.
    fn check_role_authority(
        caller: &AuthContext,
        roles: &[(&str, RoleName)],
    ) -> Result<(), RoleGuardError> {
        if caller.is_server_call() || caller.is_super_admin() || roles.is_empty() {
            return Ok(());
        }

        let current = caller.organization_id().unwrap_or_default();
        for (organization, _) in roles {
            if *organization != current {
                return Err(RoleGuardError::Unauthorized(format!(
                    "cannot assign roles in organization '{}' from organization '{}'",
                    organization, current
                )));
            }
        }

        let is_admin = caller
            .user()
            .and_then(|u| u.role_in(current))
            .map(|r| r.name == RoleName::Admin)
            .unwrap_or(false);
        if !is_admin {
            tracing::warn!(
                "Rejected role assignment in '{}' by non admin '{}'",
                current,
                caller.user().map(|u| u.name.as_str()).unwrap_or("anonymous")
            );
            return Err(RoleGuardError::Unauthorized(format!(
                "only admins of organization '{}' may assign its roles",
                current
            )));
        }

        Ok(())
    }

    fn check_super_admin(
        &self,
        caller: &AuthContext,
        target: Option<&User>,
        submitted: bool,
    ) -> Result<(), RoleGuardError> {
        let current = target.map(|t| t.super_admin).unwrap_or(false);
        if submitted == current {
            return Ok(());
        }

        if !caller.is_super_admin() {
            tracing::warn!(
                "Rejected super admin change by non super admin '{}'",
                caller.user().map(|u| u.name.as_str()).unwrap_or("anonymous")
            );
            return Err(RoleGuardError::Unauthorized(
                "only super admins may change super admin status".to_string(),
            ));
        }

        let is_self = match (caller.user(), target) {
            (Some(me), Some(them)) => me.id == them.id,
            _ => false,
        };
        if is_self && current && !submitted {
            return Err(RoleGuardError::SelfDemotion);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Organization;
    use crate::store::MemoryStore;
    use crate::testing::{member, super_admin};

    fn guard() -> RoleGuard {
        RoleGuard::new(Arc::new(MemoryStore::with_items([
            Organization::new("1", "One", RoleName::Viewer),
            Organization::new("org2", "Two", RoleName::Member),
        ])))
    }

    fn admin_ctx() -> AuthContext {
        AuthContext::for_user(super_admin("u1", "ada"), Some("1".to_string()))
    }

    #[tokio::test]
    async fn duplicate_organizations_are_rejected() {
        let roles = [RoleRequest::new("1", "admin"), RoleRequest::new("1", "viewer")];
        let err = guard()
            .validate_role_submission(&admin_ctx(), None, &roles, false)
            .await
            .unwrap_err();

        assert!(matches!(err, RoleGuardError::DuplicateOrganization(ref org) if org == "1"));
    }

    #[tokio::test]
    async fn duplicate_reported_even_with_bad_role_names() {
        let roles = [RoleRequest::new("1", "owner"), RoleRequest::new("1", "root")];
        let err = guard()
            .validate_role_submission(&admin_ctx(), None, &roles, false)
            .await
            .unwrap_err();

        assert!(matches!(err, RoleGuardError::DuplicateOrganization(_)));
    }

    #[tokio::test]
    async fn unknown_role_names_the_value() {
        let roles = [RoleRequest::new("1", "owner")];
        let err = guard()
            .validate_role_submission(&admin_ctx(), None, &roles, false)
            .await
            .unwrap_err();

        assert!(matches!(err, RoleGuardError::UnknownRole(_)));
        assert!(err.to_string().contains("owner"));
    }

    #[tokio::test]
    async fn wildcard_resolves_to_default_role() {
        let roles = [RoleRequest::new("org2", "*"), RoleRequest::new("1", "editor")];
        let resolved = guard()
            .validate_role_submission(&admin_ctx(), None, &roles, false)
            .await
            .unwrap();

        assert_eq!(
            resolved,
            vec![Role::new("org2", RoleName::Member), Role::new("1", RoleName::Editor)]
        );
    }

    #[tokio::test]
    async fn unknown_organization_is_rejected() {
        let roles = [RoleRequest::new("missing", "viewer")];
        let err = guard()
            .validate_role_submission(&admin_ctx(), None, &roles, false)
            .await
            .unwrap_err();

        assert!(matches!(err, RoleGuardError::UnknownOrganization(ref org) if org == "missing"));
    }

    #[tokio::test]
    async fn only_super_admins_change_the_flag() {
        let grace = member("u2", "grace", &[("1", RoleName::Admin)]);
        let ctx = AuthContext::for_user(grace.clone(), Some("1".to_string()));
        let roles = [RoleRequest::new("1", "admin")];

        let err = guard()
            .validate_role_submission(&ctx, None, &roles, true)
            .await
            .unwrap_err();
        assert!(matches!(err, RoleGuardError::Unauthorized(_)));

        // leaving the flag untouched is fine
        let target = member("u3", "linus", &[("1", RoleName::Viewer)]);
        assert!(guard()
            .validate_role_submission(&ctx, Some(&target), &roles, false)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn viewer_cannot_promote_self() {
        let grace = member("u2", "grace", &[("1", RoleName::Viewer)]);
        let ctx = AuthContext::for_user(grace.clone(), Some("1".to_string()));
        let roles = [RoleRequest::new("1", "admin")];

        let err = guard()
            .validate_role_submission(&ctx, Some(&grace), &roles, false)
            .await
            .unwrap_err();
        assert!(matches!(err, RoleGuardError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn member_cannot_create_admins() {
        let grace = member("u2", "grace", &[("1", RoleName::Member)]);
        let ctx = AuthContext::for_user(grace, Some("1".to_string()));

        let err = guard()
            .validate_role_submission(&ctx, None, &[RoleRequest::new("1", "admin")], false)
            .await
            .unwrap_err();
        assert!(matches!(err, RoleGuardError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn foreign_organizations_are_refused_before_lookup() {
        let grace = member("u2", "grace", &[("1", RoleName::Admin)]);
        let ctx = AuthContext::for_user(grace, Some("1".to_string()));

        // an existing and a missing foreign organization fail the same way
        for org in ["org2", "missing"] {
            let err = guard()
                .validate_role_submission(&ctx, None, &[RoleRequest::new(org, "viewer")], false)
                .await
                .unwrap_err();
            assert!(matches!(err, RoleGuardError::Unauthorized(_)), "{}", org);
        }
    }

    #[tokio::test]
    async fn server_calls_skip_role_authority() {
        let roles = [RoleRequest::new("org2", "admin")];
        assert!(guard()
            .validate_role_submission(&AuthContext::server(), None, &roles, false)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn super_admin_cannot_demote_self() {
        let ada = super_admin("u1", "ada");
        let ctx = AuthContext::for_user(ada.clone(), Some("1".to_string()));

        let err = guard()
            .validate_role_submission(&ctx, Some(&ada), &[], false)
            .await
            .unwrap_err();
        assert!(matches!(err, RoleGuardError::SelfDemotion));

        // demoting someone else is allowed
        let other = super_admin("u9", "hopper");
        assert!(guard()
            .validate_role_submission(&ctx, Some(&other), &[], false)
            .await
            .is_ok());
    }
}
