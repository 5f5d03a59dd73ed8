// Resource stores and the request-scoped variants handed out by the facade.
//
// Every backing implementation (memory, postgres, filesystem, compiled defaults,
// layered resolvers, tenant wrappers, no-op) speaks the same `Store<T>` trait so
// the facade can swap one for another per request.

pub mod facade;
pub mod memory;
pub mod noop;
pub mod organizations;
pub mod tenant;
pub mod users;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::database::models::{Config, Organization, User, CONFIG_ID, DEFAULT_ORGANIZATION_ID};

pub use facade::{DataStores, PrimaryStores, StoreFacade};
pub use memory::MemoryStore;
pub use noop::NoOpStore;
pub use organizations::OrganizationScopedOrganizations;
pub use tenant::TenantScopedStore;
pub use users::OrganizationScopedUsers;

/// A record that can live in a store
pub trait Resource: Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Storage kind, used as the postgres partition key and in error messages
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);
}

/// A record that belongs to exactly one organization
pub trait Owned: Resource {
    fn organization(&self) -> &str;

    fn set_organization(&mut self, organization: &str);
}

/// Store errors. NotFound is deliberately the only answer for records hidden by
/// tenant scoping.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{catalog} unavailable: {reason}")]
    ProviderUnavailable { catalog: String, reason: String },

    #[error("{kind} already exists: {id}")]
    Conflict { kind: &'static str, id: String },

    #[error("operation not supported: {0}")]
    Unsupported(String),

    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found<T: Resource>(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            kind: T::KIND,
            id: id.into(),
        }
    }

    pub fn conflict<T: Resource>(id: impl Into<String>) -> Self {
        StoreError::Conflict {
            kind: T::KIND,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// CRUD over one resource kind
#[async_trait]
pub trait Store<T: Resource>: Send + Sync {
    async fn all(&self) -> Result<Vec<T>, StoreError>;

    async fn get(&self, id: &str) -> Result<T, StoreError>;

    /// Persist a new record, generating an id when none is set
    async fn add(&self, item: T) -> Result<T, StoreError>;

    async fn update(&self, item: T) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UsersStore: Store<User> {
    /// Look a user up by external identity
    async fn find(&self, name: &str, provider: &str, scheme: &str) -> Result<User, StoreError> {
        self.all()
            .await?
            .into_iter()
            .find(|u| u.name == name && u.provider == provider && u.scheme == scheme)
            .ok_or_else(|| StoreError::not_found::<User>(format!("{}/{}/{}", provider, scheme, name)))
    }
}

#[async_trait]
pub trait OrganizationsStore: Store<Organization> {
    async fn default_organization(&self) -> Result<Organization, StoreError> {
        self.get(DEFAULT_ORGANIZATION_ID).await
    }

    /// Ensure the default organization exists, returning it
    async fn create_default(&self) -> Result<Organization, StoreError> {
        match self.get(DEFAULT_ORGANIZATION_ID).await {
            Ok(org) => Ok(org),
            Err(e) if e.is_not_found() => self.add(Organization::default_organization()).await,
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
pub trait ConfigStore: Store<Config> {
    async fn config(&self) -> Result<Config, StoreError> {
        self.get(CONFIG_ID).await
    }

    /// Ensure a config record exists, returning the stored one
    async fn initialize(&self) -> Result<Config, StoreError> {
        match self.get(CONFIG_ID).await {
            Ok(config) => Ok(config),
            Err(e) if e.is_not_found() => self.add(Config::default()).await,
            Err(e) => Err(e),
        }
    }
}
