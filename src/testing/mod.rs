//! Fixtures shared by unit tests

use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::database::models::{
    Config, Dashboard, Organization, Role, RoleName, Source, User, OAUTH2_SCHEME,
};
use crate::resolver::assemble;
use crate::store::{DataStores, MemoryStore, PrimaryStores};

pub fn member(id: &str, name: &str, roles: &[(&str, RoleName)]) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        provider: "github".to_string(),
        scheme: OAUTH2_SCHEME.to_string(),
        super_admin: false,
        roles: roles
            .iter()
            .map(|(org, role)| Role::new(*org, *role))
            .collect(),
    }
}

pub fn super_admin(id: &str, name: &str) -> User {
    User {
        super_admin: true,
        ..member(id, name, &[("default", RoleName::Admin)])
    }
}

pub fn source(id: &str, organization: &str) -> Source {
    Source {
        id: id.to_string(),
        name: format!("influx-{}", id),
        kind: "influx".to_string(),
        username: String::new(),
        password: String::new(),
        url: "http://localhost:8086".to_string(),
        insecure_skip_verify: false,
        default: false,
        telegraf: "telegraf".to_string(),
        organization: organization.to_string(),
    }
}

pub fn dashboard(id: &str, organization: &str) -> Dashboard {
    Dashboard {
        id: id.to_string(),
        name: format!("dashboard {}", id),
        cells: Vec::new(),
        templates: Vec::new(),
        organization: organization.to_string(),
    }
}

/// Three organizations, sources and dashboards split across org-a and org-b,
/// one super admin and one regular member.
pub fn fixture_primary() -> PrimaryStores {
    PrimaryStores {
        sources: Arc::new(MemoryStore::with_items([
            source("1", "org-a"),
            source("2", "org-b"),
            source("3", "org-b"),
        ])),
        dashboards: Arc::new(MemoryStore::with_items([
            dashboard("1", "org-a"),
            dashboard("2", "org-b"),
        ])),
        users: Arc::new(MemoryStore::with_items([
            super_admin("u1", "ada"),
            member("u2", "grace", &[("org-b", RoleName::Editor)]),
        ])),
        organizations: Arc::new(MemoryStore::with_items([
            Organization::default_organization(),
            Organization::new("org-a", "Org A", RoleName::Viewer),
            Organization::new("org-b", "Org B", RoleName::Editor),
        ])),
        config: Arc::new(MemoryStore::with_items([Config::default()])),
        ..PrimaryStores::in_memory()
    }
}

pub fn fixture_stores() -> DataStores {
    assemble(&ResolverConfig::default(), fixture_primary()).unwrap()
}
