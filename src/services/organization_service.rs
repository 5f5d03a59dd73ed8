use crate::auth::AuthContext;
use crate::database::models::{Organization, Role, RoleName, User};
use crate::store::{Store, StoreFacade};

use super::ServiceError;

/// Organization lifecycle: creation seeds the creator as admin, deletion strips
/// the organization from every user and mapping.
#[derive(Clone)]
pub struct OrganizationService {
    facade: StoreFacade,
}

impl OrganizationService {
    pub fn new(facade: StoreFacade) -> Self {
        Self { facade }
    }

    pub async fn create(&self, ctx: &AuthContext, org: Organization) -> Result<Organization, ServiceError> {
        if org.name.trim().is_empty() {
            return Err(ServiceError::Invalid("organization name is required".to_string()));
        }
        if org.default_role == RoleName::Wildcard {
            return Err(ServiceError::Invalid(
                "an organization's default role cannot be '*'".to_string(),
            ));
        }

        let created = self.facade.organizations(ctx).add(org).await?;
        tracing::info!("Created organization '{}' ({})", created.name, created.id);

        // The first membership is written from a context scoped to the new
        // organization so it goes through the same tenant store as any other add.
        if let Some(creator) = ctx.user() {
            let scoped = ctx.scoped_to(created.id.clone());
            self.facade
                .users(&scoped)
                .add(User {
                    roles: vec![Role::new(created.id.clone(), RoleName::Admin)],
                    ..creator.clone()
                })
                .await?;
        }

        Ok(created)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: &str) -> Result<(), ServiceError> {
        let organizations = self.facade.organizations(ctx);
        let org = organizations.get(id).await?;
        if org.is_default() {
            return Err(ServiceError::Invalid(
                "the default organization cannot be deleted".to_string(),
            ));
        }

        organizations.delete(id).await?;

        let server = AuthContext::server();
        let users = self.facade.users(&server);
        for mut user in users.all().await? {
            if user.has_role_in(id) {
                user.roles.retain(|r| r.organization != id);
                users.update(user).await?;
            }
        }

        let mappings = self.facade.mappings(&server);
        for mapping in mappings.all().await? {
            if mapping.organization == id {
                mappings.delete(&mapping.id).await?;
            }
        }

        tracing::info!("Deleted organization '{}' ({})", org.name, org.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Mapping;
    use crate::store::StoreError;
    use crate::testing::{fixture_stores, member, super_admin};

    fn setup() -> (StoreFacade, OrganizationService) {
        let facade = StoreFacade::new(fixture_stores());
        (facade.clone(), OrganizationService::new(facade))
    }

    #[tokio::test]
    async fn creator_becomes_admin_of_new_organization() {
        let (facade, service) = setup();
        let ctx = AuthContext::for_user(super_admin("u1", "ada"), Some("default".to_string()));

        let created = service
            .create(&ctx, Organization::new("", "Ops", RoleName::Viewer))
            .await
            .unwrap();
        assert!(!created.id.is_empty());

        let ada = facade.users(&AuthContext::server()).get("u1").await.unwrap();
        assert_eq!(ada.role_in(&created.id).unwrap().name, RoleName::Admin);
        assert!(ada.has_role_in("default"));
    }

    #[tokio::test]
    async fn members_cannot_create_organizations() {
        let (_, service) = setup();
        let grace = member("u2", "grace", &[("org-b", RoleName::Admin)]);
        let ctx = AuthContext::for_user(grace, Some("org-b".to_string()));

        let err = service
            .create(&ctx, Organization::new("", "Mine", RoleName::Member))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Store(StoreError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn delete_strips_roles_and_mappings() {
        let (facade, service) = setup();
        let server = AuthContext::server();
        facade.mappings(&server).add(Mapping::wildcard("org-b")).await.unwrap();

        let ctx = AuthContext::for_user(super_admin("u1", "ada"), Some("default".to_string()));
        service.delete(&ctx, "org-b").await.unwrap();

        let grace = facade.users(&server).get("u2").await.unwrap();
        assert!(grace.roles.is_empty());
        assert!(facade.mappings(&server).all().await.unwrap().is_empty());
        assert!(facade.organizations(&server).get("org-b").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn default_organization_is_protected() {
        let (_, service) = setup();
        let err = service.delete(&AuthContext::server(), "default").await.unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(_)));
    }
}
