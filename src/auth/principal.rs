use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::database::models::{Mapping, Role, MAPPING_WILDCARD, OAUTH2_SCHEME};
use crate::store::{OrganizationsStore, Store, StoreError};

/// The only issuer allowed to grant SuperAdmin through group membership
pub const SUPER_ADMIN_ISSUER: &str = "auth0";

/// An authenticated external identity, built per login from token claims
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub subject: String,
    pub issuer: String,
    #[serde(default)]
    pub organization: String,
    /// Comma-joined identity-provider groups
    #[serde(default)]
    pub group: String,
}

impl Principal {
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.group.split(',').filter(|g| !g.is_empty())
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups().any(|g| g == group)
    }
}

/// Whether `mapping` grants anything to `principal`
pub fn apply_mapping(mapping: &Mapping, principal: &Principal) -> bool {
    let provider_matches =
        mapping.provider == MAPPING_WILDCARD || mapping.provider == principal.issuer;
    let scheme_matches = mapping.scheme == MAPPING_WILDCARD || mapping.scheme == OAUTH2_SCHEME;
    if !provider_matches || !scheme_matches {
        return false;
    }

    mapping.provider_organization == MAPPING_WILDCARD
        || principal.in_group(&mapping.provider_organization)
}

/// Turns an external principal into organization roles using the stored mapping rules.
///
/// Both stores should be the raw (server-context) ones: mapping runs before the
/// caller has any claims of its own.
#[derive(Clone)]
pub struct PrincipalRoleMapper {
    mappings: Arc<dyn Store<Mapping>>,
    organizations: Arc<dyn OrganizationsStore>,
    super_admin_group: Option<String>,
}

impl PrincipalRoleMapper {
    pub fn new(
        mappings: Arc<dyn Store<Mapping>>,
        organizations: Arc<dyn OrganizationsStore>,
        super_admin_group: Option<String>,
    ) -> Self {
        Self {
            mappings,
            organizations,
            super_admin_group: super_admin_group.filter(|g| !g.trim().is_empty()),
        }
    }

    /// One role per organization, taken from the first applying rule in store order
    pub async fn map_to_roles(&self, principal: &Principal) -> Result<Vec<Role>, StoreError> {
        let mappings = self.mappings.all().await?;

        let mut seen = HashSet::new();
        let mut roles = Vec::new();

        for mapping in mappings {
            if seen.contains(&mapping.organization) || !apply_mapping(&mapping, principal) {
                continue;
            }

            let org = match self.organizations.get(&mapping.organization).await {
                Ok(org) => org,
                Err(e) if e.is_not_found() => {
                    tracing::warn!(
                        "Mapping '{}' targets missing organization '{}'",
                        mapping.id,
                        mapping.organization
                    );
                    continue;
                }
                Err(e) => return Err(e),
            };

            seen.insert(org.id.clone());
            roles.push(Role::new(org.id, org.default_role));
        }

        tracing::debug!(
            "Mapped principal '{}' from '{}' to {} role(s)",
            principal.subject,
            principal.issuer,
            roles.len()
        );
        Ok(roles)
    }

    pub fn map_to_super_admin(&self, principal: &Principal) -> bool {
        if principal.issuer != SUPER_ADMIN_ISSUER {
            return false;
        }
        match &self.super_admin_group {
            Some(group) => principal.in_group(group),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Organization, RoleName};
    use crate::store::MemoryStore;

    fn principal(issuer: &str, group: &str) -> Principal {
        Principal {
            subject: "ada@example.com".to_string(),
            issuer: issuer.to_string(),
            organization: String::new(),
            group: group.to_string(),
        }
    }

    fn mapping(id: &str, org: &str, provider: &str, provider_org: &str) -> Mapping {
        Mapping {
            id: id.to_string(),
            organization: org.to_string(),
            provider: provider.to_string(),
            scheme: MAPPING_WILDCARD.to_string(),
            provider_organization: provider_org.to_string(),
        }
    }

    fn mapper(mappings: Vec<Mapping>, group: Option<&str>) -> PrincipalRoleMapper {
        let orgs = MemoryStore::with_items([
            Organization::new("org1", "One", RoleName::Viewer),
            Organization::new("org2", "Two", RoleName::Editor),
        ]);
        PrincipalRoleMapper::new(
            Arc::new(MemoryStore::with_items(mappings)),
            Arc::new(orgs),
            group.map(str::to_string),
        )
    }

    #[test]
    fn mapping_matches_provider_scheme_and_group() {
        let p = principal("github", "eng,ops");

        assert!(apply_mapping(&Mapping::wildcard("org1"), &p));
        assert!(apply_mapping(&mapping("1", "org1", "github", "ops"), &p));
        assert!(!apply_mapping(&mapping("1", "org1", "google", "*"), &p));
        assert!(!apply_mapping(&mapping("1", "org1", "github", "sales"), &p));

        // groups are compared exactly after splitting
        let spaced = principal("github", "eng, ops");
        assert!(!apply_mapping(&mapping("1", "org1", "github", "ops"), &spaced));

        let mut ldap = Mapping::wildcard("org1");
        ldap.scheme = "ldap".to_string();
        assert!(!apply_mapping(&ldap, &p));
    }

    #[tokio::test]
    async fn wildcard_mapping_yields_default_role() {
        let mapper = mapper(vec![Mapping::wildcard("org1")], None);
        let roles = mapper.map_to_roles(&principal("google", "")).await.unwrap();

        assert_eq!(roles, vec![Role::new("org1", RoleName::Viewer)]);
    }

    #[tokio::test]
    async fn first_applying_rule_per_organization_wins() {
        let mapper = mapper(
            vec![
                mapping("a", "org1", "github", "eng"),
                mapping("b", "org1", "*", "*"),
                mapping("c", "org2", "github", "*"),
            ],
            None,
        );
        let roles = mapper.map_to_roles(&principal("github", "eng")).await.unwrap();

        assert_eq!(
            roles,
            vec![Role::new("org1", RoleName::Viewer), Role::new("org2", RoleName::Editor)]
        );
    }

    #[tokio::test]
    async fn vanished_organization_is_skipped() {
        let mapper = mapper(
            vec![mapping("a", "gone", "*", "*"), mapping("b", "org2", "*", "*")],
            None,
        );
        let roles = mapper.map_to_roles(&principal("github", "")).await.unwrap();

        assert_eq!(roles, vec![Role::new("org2", RoleName::Editor)]);
    }

    #[test]
    fn super_admin_requires_auth0_and_group() {
        let mapper = mapper(Vec::new(), Some("admins"));

        assert!(mapper.map_to_super_admin(&principal("auth0", "eng,admins")));
        assert!(!mapper.map_to_super_admin(&principal("github", "admins")));
        assert!(!mapper.map_to_super_admin(&principal("auth0", "eng")));
    }

    #[test]
    fn empty_super_admin_group_never_matches() {
        let mapper = mapper(Vec::new(), Some(""));
        assert!(!mapper.map_to_super_admin(&principal("auth0", "")));
    }
}
