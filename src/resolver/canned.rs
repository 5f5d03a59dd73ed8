use async_trait::async_trait;

use super::BuildError;
use crate::database::models::{ConfigTemplate, Layout, Protoboard};
use crate::store::{Resource, Store, StoreError};

/// Fixed, read-only set of records. Used for compiled-in catalogs and for
/// defaults synthesized from start-up flags.
pub struct StaticStore<T> {
    label: String,
    items: Vec<T>,
}

impl<T: Resource> StaticStore<T> {
    pub fn new(label: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            label: label.into(),
            items,
        }
    }

    fn read_only(&self) -> StoreError {
        StoreError::Unsupported(format!("{} are read-only", self.label))
    }
}

#[async_trait]
impl<T: Resource> Store<T> for StaticStore<T> {
    async fn all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.items.clone())
    }

    async fn get(&self, id: &str) -> Result<T, StoreError> {
        self.items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found::<T>(id))
    }

    async fn add(&self, _item: T) -> Result<T, StoreError> {
        Err(self.read_only())
    }

    async fn update(&self, _item: T) -> Result<(), StoreError> {
        Err(self.read_only())
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(self.read_only())
    }
}

const LAYOUTS: &[(&str, &str)] = &[
    ("cpu", include_str!("../../canned/layouts/cpu.json")),
    ("mem", include_str!("../../canned/layouts/mem.json")),
    ("disk", include_str!("../../canned/layouts/disk.json")),
];

const PROTOBOARDS: &[(&str, &str)] = &[
    ("system", include_str!("../../canned/protoboards/system.json")),
    ("influxdb", include_str!("../../canned/protoboards/influxdb.json")),
];

const TEMPLATES: &[(&str, &str)] = &[
    ("telegraf-system", include_str!("../../canned/templates/telegraf-system.json")),
    ("telegraf-docker", include_str!("../../canned/templates/telegraf-docker.json")),
];

fn parse<T: Resource>(
    kind: &'static str,
    docs: &[(&'static str, &'static str)],
) -> Result<Vec<T>, BuildError> {
    docs.iter()
        .map(|&(name, raw)| {
            serde_json::from_str(raw).map_err(|source| BuildError::InvalidCanned {
                kind,
                name,
                source,
            })
        })
        .collect()
}

/// Layouts shipped with the binary
pub fn layouts() -> Result<StaticStore<Layout>, BuildError> {
    Ok(StaticStore::new("canned layouts", parse("layout", LAYOUTS)?))
}

/// Protoboards shipped with the binary
pub fn protoboards() -> Result<StaticStore<Protoboard>, BuildError> {
    Ok(StaticStore::new("canned protoboards", parse("protoboard", PROTOBOARDS)?))
}

/// Collector config templates shipped with the binary
pub fn config_templates() -> Result<StaticStore<ConfigTemplate>, BuildError> {
    Ok(StaticStore::new("canned config templates", parse("config template", TEMPLATES)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn compiled_catalogs_parse() {
        assert_eq!(layouts().unwrap().all().await.unwrap().len(), LAYOUTS.len());
        assert_eq!(protoboards().unwrap().all().await.unwrap().len(), PROTOBOARDS.len());
        assert_eq!(config_templates().unwrap().all().await.unwrap().len(), TEMPLATES.len());
    }

    #[tokio::test]
    async fn canned_ids_are_unique_and_lookups_work() {
        let layouts = layouts().unwrap();
        let all = layouts.all().await.unwrap();
        let mut ids: Vec<_> = all.iter().map(|l| l.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), all.len());

        let first = &all[0];
        assert_eq!(&layouts.get(&first.id).await.unwrap(), first);
    }

    #[tokio::test]
    async fn writes_are_unsupported() {
        let layouts = layouts().unwrap();
        let first = layouts.all().await.unwrap().remove(0);

        assert!(matches!(
            layouts.update(first).await.unwrap_err(),
            StoreError::Unsupported(_)
        ));
    }
}
