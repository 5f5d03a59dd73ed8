use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::store::memory::generate_id;
use crate::store::{Resource, Store, StoreError};

/// Directory of JSON documents, one record per `<id>.<extension>` file.
///
/// Operators drop files in to add dashboards, sources or layouts without going
/// through the API. Unreadable files are logged and skipped so one bad file never
/// hides the rest of the directory.
pub struct FileStore<T> {
    dir: PathBuf,
    extension: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Resource> FileStore<T> {
    /// `extension` is given without the leading dot
    pub fn new(dir: impl Into<PathBuf>, extension: &'static str) -> Self {
        Self {
            dir: dir.into(),
            extension,
            _marker: PhantomData,
        }
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
            return Err(StoreError::Validation(format!("invalid {} id '{}'", T::KIND, id)));
        }
        Ok(self.dir.join(format!("{}.{}", id, self.extension)))
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some(self.extension)
    }

    async fn read_one(&self, path: &Path) -> Option<T> {
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Skipping unreadable {} file {}: {}", T::KIND, path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(item) if item.id().is_empty() => {
                tracing::warn!("Skipping {} file {}: missing id", T::KIND, path.display());
                None
            }
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("Skipping invalid {} file {}: {}", T::KIND, path.display(), e);
                None
            }
        }
    }

    async fn load(&self) -> Result<Vec<(PathBuf, T)>, StoreError> {
        let mut entries = fs::read_dir(&self.dir).await.map_err(|e| {
            StoreError::Backend(format!("cannot read directory {}: {}", self.dir.display(), e))
        })?;

        let mut items = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            let path = entry.path();
            if !self.matches_extension(&path) {
                continue;
            }
            if let Some(item) = self.read_one(&path).await {
                items.push((path, item));
            }
        }

        items.sort_by(|a, b| a.1.id().cmp(b.1.id()));
        Ok(items)
    }

    /// Files are matched by the id inside them, not by file name
    async fn locate(&self, id: &str) -> Result<(PathBuf, T), StoreError> {
        self.load()
            .await?
            .into_iter()
            .find(|(_, item)| item.id() == id)
            .ok_or_else(|| StoreError::not_found::<T>(id))
    }

    async fn write(&self, path: &Path, item: &T) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(item)
            .map_err(|e| StoreError::Backend(format!("cannot encode {}: {}", T::KIND, e)))?;
        fs::write(path, body).await.map_err(|e| {
            StoreError::Backend(format!("cannot write {}: {}", path.display(), e))
        })
    }
}

#[async_trait]
impl<T: Resource> Store<T> for FileStore<T> {
    async fn all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.load().await?.into_iter().map(|(_, item)| item).collect())
    }

    async fn get(&self, id: &str) -> Result<T, StoreError> {
        self.locate(id).await.map(|(_, item)| item)
    }

    async fn add(&self, mut item: T) -> Result<T, StoreError> {
        if item.id().is_empty() {
            item.set_id(generate_id());
        }
        let path = self.path_for(item.id())?;

        match self.locate(item.id()).await {
            Ok(_) => return Err(StoreError::conflict::<T>(item.id())),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        self.write(&path, &item).await?;
        tracing::info!("Wrote {} '{}' to {}", T::KIND, item.id(), path.display());
        Ok(item)
    }

    async fn update(&self, item: T) -> Result<(), StoreError> {
        let (path, _) = self.locate(item.id()).await?;
        self.write(&path, &item).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let (path, _) = self.locate(id).await?;
        fs::remove_file(&path).await.map_err(|e| {
            StoreError::Backend(format!("cannot remove {}: {}", path.display(), e))
        })
    }
}
