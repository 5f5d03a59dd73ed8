// Layered resolution of logical resources across an ordered chain of providers
// (primary database, filesystem overlay, compiled-in defaults).

pub mod builders;
pub mod canned;
pub mod filesystem;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;

use crate::database::models::Organization;
use crate::store::{OrganizationsStore, Resource, Store, StoreError};

pub use builders::{
    assemble, ConfigTemplatesBuilder, DashboardsBuilder, KapacitorsBuilder, LayoutsBuilder,
    OrganizationsBuilder, ProtoboardsBuilder, SourcesBuilder,
};
pub use canned::StaticStore;
pub use filesystem::FileStore;

/// Errors raised while assembling provider chains at start-up
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid canned {kind} '{name}': {source}")]
    InvalidCanned {
        kind: &'static str,
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {kind} url '{url}': {source}")]
    InvalidUrl {
        kind: &'static str,
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// One named provider in a chain
pub struct Layer<T> {
    name: String,
    store: Arc<dyn Store<T>>,
}

impl<T> Layer<T> {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered provider chain, highest priority first. Built once and read-only
/// afterwards, so it is shared across requests without locking.
pub struct LayeredResolver<T> {
    catalog: String,
    layers: Vec<Layer<T>>,
}

impl<T: Resource> LayeredResolver<T> {
    pub fn new(catalog: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            layers: Vec::new(),
        }
    }

    /// Append a provider below the ones already present
    pub fn with_layer(mut self, name: impl Into<String>, store: Arc<dyn Store<T>>) -> Self {
        self.layers.push(Layer {
            name: name.into(),
            store,
        });
        self
    }

    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    pub fn layers(&self) -> &[Layer<T>] {
        &self.layers
    }

    fn unavailable(&self, reason: String) -> StoreError {
        StoreError::ProviderUnavailable {
            catalog: self.catalog.clone(),
            reason,
        }
    }
}

/// Errors that mean "this provider cannot answer, ask the next one"
fn falls_through(err: &StoreError) -> bool {
    matches!(
        err,
        StoreError::NotFound { .. }
            | StoreError::Unsupported(_)
            | StoreError::Backend(_)
            | StoreError::ProviderUnavailable { .. }
    )
}

#[async_trait]
impl<T: Resource> Store<T> for LayeredResolver<T> {
    /// Union of every reachable provider. On id collision the higher-priority
    /// provider's record is kept. Fails only if no provider answered at all.
    async fn all(&self) -> Result<Vec<T>, StoreError> {
        let results = join_all(self.layers.iter().map(|layer| layer.store.all())).await;

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        let mut reachable = false;
        let mut last_error = None;

        for (layer, result) in self.layers.iter().zip(results) {
            match result {
                Ok(items) => {
                    reachable = true;
                    for item in items {
                        if seen.insert(item.id().to_string()) {
                            merged.push(item);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Provider '{}' failed listing {}: {}",
                        layer.name,
                        self.catalog,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        if !reachable {
            let reason = last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no providers configured".to_string());
            return Err(self.unavailable(reason));
        }

        Ok(merged)
    }

    async fn get(&self, id: &str) -> Result<T, StoreError> {
        for layer in &self.layers {
            match layer.store.get(id).await {
                Ok(item) => return Ok(item),
                Err(e) if e.is_not_found() => continue,
                Err(e) => {
                    tracing::warn!(
                        "Provider '{}' failed fetching {} '{}': {}",
                        layer.name,
                        T::KIND,
                        id,
                        e
                    );
                }
            }
        }
        Err(StoreError::not_found::<T>(id))
    }

    async fn add(&self, item: T) -> Result<T, StoreError> {
        let mut last_error = self.unavailable("no providers configured".to_string());
        for layer in &self.layers {
            match layer.store.add(item.clone()).await {
                Ok(added) => return Ok(added),
                Err(e) if falls_through(&e) => {
                    tracing::debug!("Provider '{}' did not accept {}: {}", layer.name, T::KIND, e);
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error)
    }

    async fn update(&self, item: T) -> Result<(), StoreError> {
        let mut last_error = StoreError::not_found::<T>(item.id());
        for layer in &self.layers {
            match layer.store.update(item.clone()).await {
                Ok(()) => return Ok(()),
                Err(e) if falls_through(&e) => {
                    tracing::debug!("Provider '{}' did not update {}: {}", layer.name, T::KIND, e);
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut last_error = StoreError::not_found::<T>(id);
        for layer in &self.layers {
            match layer.store.delete(id).await {
                Ok(()) => return Ok(()),
                Err(e) if falls_through(&e) => {
                    tracing::debug!("Provider '{}' did not delete {}: {}", layer.name, T::KIND, e);
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error)
    }
}

impl OrganizationsStore for LayeredResolver<Organization> {}
