use std::sync::Arc;

use super::{
    ConfigStore, MemoryStore, NoOpStore, OrganizationScopedOrganizations, OrganizationScopedUsers,
    OrganizationsStore, Owned, Store, TenantScopedStore, UsersStore,
};
use crate::auth::{AuthContext, ResourceClass, StoreScope};
use crate::database::models::{
    Config, ConfigTemplate, Dashboard, Layout, Mapping, Organization, Protoboard, Server, Source,
    User,
};

/// Raw stores backed by the primary database
#[derive(Clone)]
pub struct PrimaryStores {
    pub sources: Arc<dyn Store<Source>>,
    pub servers: Arc<dyn Store<Server>>,
    pub users: Arc<dyn UsersStore>,
    pub dashboards: Arc<dyn Store<Dashboard>>,
    pub organizations: Arc<dyn Store<Organization>>,
    pub config: Arc<dyn ConfigStore>,
    pub mappings: Arc<dyn Store<Mapping>>,
    pub layouts: Arc<dyn Store<Layout>>,
}

impl PrimaryStores {
    /// Everything in process memory; used by `--memory` and by tests
    pub fn in_memory() -> Self {
        Self {
            sources: Arc::new(MemoryStore::<Source>::new()),
            servers: Arc::new(MemoryStore::<Server>::new()),
            users: Arc::new(MemoryStore::<User>::new()),
            dashboards: Arc::new(MemoryStore::<Dashboard>::new()),
            organizations: Arc::new(MemoryStore::<Organization>::new()),
            config: Arc::new(MemoryStore::<Config>::new()),
            mappings: Arc::new(MemoryStore::<Mapping>::new()),
            layouts: Arc::new(MemoryStore::<Layout>::new()),
        }
    }
}

/// Unscoped stores after resolver assembly. Multi-provider resources are layered
/// resolvers; users, config and mappings come straight from the primary database.
#[derive(Clone)]
pub struct DataStores {
    pub sources: Arc<dyn Store<Source>>,
    pub servers: Arc<dyn Store<Server>>,
    pub users: Arc<dyn UsersStore>,
    pub dashboards: Arc<dyn Store<Dashboard>>,
    pub organizations: Arc<dyn OrganizationsStore>,
    pub config: Arc<dyn ConfigStore>,
    pub mappings: Arc<dyn Store<Mapping>>,
    pub layouts: Arc<dyn Store<Layout>>,
    pub protoboards: Arc<dyn Store<Protoboard>>,
    pub config_templates: Arc<dyn Store<ConfigTemplate>>,
}

/// Hands each request the store variant its claims allow.
///
/// Selection performs no I/O: the returned store is either the raw one, a wrapper
/// scoped to the caller's organization, or [`NoOpStore`].
#[derive(Clone)]
pub struct StoreFacade {
    stores: DataStores,
}

impl StoreFacade {
    pub fn new(stores: DataStores) -> Self {
        Self { stores }
    }

    pub fn sources(&self, ctx: &AuthContext) -> Arc<dyn Store<Source>> {
        owned(ctx, &self.stores.sources)
    }

    /// Kapacitor servers
    pub fn servers(&self, ctx: &AuthContext) -> Arc<dyn Store<Server>> {
        owned(ctx, &self.stores.servers)
    }

    pub fn dashboards(&self, ctx: &AuthContext) -> Arc<dyn Store<Dashboard>> {
        owned(ctx, &self.stores.dashboards)
    }

    pub fn users(&self, ctx: &AuthContext) -> Arc<dyn UsersStore> {
        match StoreScope::resolve(ctx, ResourceClass::TenantScoped) {
            StoreScope::Server | StoreScope::SuperAdmin => self.stores.users.clone(),
            StoreScope::Tenant(org) => {
                Arc::new(OrganizationScopedUsers::new(self.stores.users.clone(), org))
            }
            StoreScope::Denied => Arc::new(NoOpStore),
        }
    }

    pub fn organizations(&self, ctx: &AuthContext) -> Arc<dyn OrganizationsStore> {
        match StoreScope::resolve(ctx, ResourceClass::Global) {
            StoreScope::Server | StoreScope::SuperAdmin => self.stores.organizations.clone(),
            StoreScope::Tenant(org) => Arc::new(OrganizationScopedOrganizations::new(
                self.stores.organizations.clone(),
                org,
            )),
            StoreScope::Denied => Arc::new(NoOpStore),
        }
    }

    pub fn config(&self, ctx: &AuthContext) -> Arc<dyn ConfigStore> {
        match StoreScope::resolve(ctx, ResourceClass::Global) {
            StoreScope::Server | StoreScope::SuperAdmin => self.stores.config.clone(),
            StoreScope::Tenant(_) | StoreScope::Denied => Arc::new(NoOpStore),
        }
    }

    pub fn mappings(&self, ctx: &AuthContext) -> Arc<dyn Store<Mapping>> {
        match StoreScope::resolve(ctx, ResourceClass::Global) {
            StoreScope::Server | StoreScope::SuperAdmin => self.stores.mappings.clone(),
            StoreScope::Tenant(_) | StoreScope::Denied => Arc::new(NoOpStore),
        }
    }

    /// Global catalog; not scoped by claims
    pub fn layouts(&self) -> Arc<dyn Store<Layout>> {
        self.stores.layouts.clone()
    }

    /// Global catalog; not scoped by claims
    pub fn protoboards(&self) -> Arc<dyn Store<Protoboard>> {
        self.stores.protoboards.clone()
    }

    /// Global catalog; not scoped by claims
    pub fn config_templates(&self) -> Arc<dyn Store<ConfigTemplate>> {
        self.stores.config_templates.clone()
    }
}

fn owned<T: Owned>(ctx: &AuthContext, raw: &Arc<dyn Store<T>>) -> Arc<dyn Store<T>> {
    let scope = StoreScope::resolve(ctx, ResourceClass::TenantScoped);
    tracing::debug!("Resolved {} store scope: {:?}", T::KIND, scope);

    match scope {
        StoreScope::Server | StoreScope::SuperAdmin => raw.clone(),
        StoreScope::Tenant(org) => Arc::new(TenantScopedStore::new(raw.clone(), org)),
        StoreScope::Denied => Arc::new(NoOpStore),
    }
}
