use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::DatabaseError;
use crate::database::models::{
    Config, Dashboard, Layout, Mapping, Organization, Server, Source, User,
};
use crate::store::memory::generate_id;
use crate::store::{ConfigStore, PrimaryStores, Resource, Store, StoreError, UsersStore};

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// One resource kind stored as JSONB rows in the shared `resources` table
pub struct PgStore<T> {
    pool: PgPool,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Resource> PgStore<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }

    fn encode(item: &T) -> Result<(Value, String), DatabaseError> {
        let body = serde_json::to_value(item)?;
        let organization = organization_of(&body);
        Ok((body, organization))
    }

    fn decode(body: Value) -> Result<T, DatabaseError> {
        Ok(serde_json::from_value(body)?)
    }
}

/// Owner column value; empty for global resources
fn organization_of(body: &Value) -> String {
    body.get("organization")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl<T: Resource> Store<T> for PgStore<T> {
    async fn all(&self) -> Result<Vec<T>, StoreError> {
        let rows: Vec<Value> =
            sqlx::query_scalar("SELECT body FROM resources WHERE kind = $1 ORDER BY id")
                .bind(T::KIND)
                .fetch_all(&self.pool)
                .await
                .map_err(DatabaseError::from)?;

        let mut items = Vec::with_capacity(rows.len());
        for body in rows {
            items.push(Self::decode(body)?);
        }
        Ok(items)
    }

    async fn get(&self, id: &str) -> Result<T, StoreError> {
        let row: Option<Value> =
            sqlx::query_scalar("SELECT body FROM resources WHERE kind = $1 AND id = $2")
                .bind(T::KIND)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(DatabaseError::from)?;

        match row {
            Some(body) => Ok(Self::decode(body)?),
            None => Err(StoreError::not_found::<T>(id)),
        }
    }

    async fn add(&self, mut item: T) -> Result<T, StoreError> {
        if item.id().is_empty() {
            item.set_id(generate_id());
        }
        let (body, organization) = Self::encode(&item)?;

        let result = sqlx::query(
            "INSERT INTO resources (kind, id, organization, body) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (kind, id) DO NOTHING",
        )
        .bind(T::KIND)
        .bind(item.id())
        .bind(organization)
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::conflict::<T>(item.id()));
        }
        Ok(item)
    }

    async fn update(&self, item: T) -> Result<(), StoreError> {
        let (body, organization) = Self::encode(&item)?;

        let result = sqlx::query(
            "UPDATE resources SET body = $3, organization = $4, updated_at = now() \
             WHERE kind = $1 AND id = $2",
        )
        .bind(T::KIND)
        .bind(item.id())
        .bind(body)
        .bind(organization)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found::<T>(item.id()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM resources WHERE kind = $1 AND id = $2")
            .bind(T::KIND)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found::<T>(id));
        }
        Ok(())
    }
}

impl UsersStore for PgStore<User> {}

impl ConfigStore for PgStore<Config> {}

impl PrimaryStores {
    /// Every primary store backed by the given pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            sources: Arc::new(PgStore::<Source>::new(pool.clone())),
            servers: Arc::new(PgStore::<Server>::new(pool.clone())),
            users: Arc::new(PgStore::<User>::new(pool.clone())),
            dashboards: Arc::new(PgStore::<Dashboard>::new(pool.clone())),
            organizations: Arc::new(PgStore::<Organization>::new(pool.clone())),
            config: Arc::new(PgStore::<Config>::new(pool.clone())),
            mappings: Arc::new(PgStore::<Mapping>::new(pool.clone())),
            layouts: Arc::new(PgStore::<Layout>::new(pool)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn owner_column_follows_body() {
        assert_eq!(organization_of(&json!({ "id": "1", "organization": "org-a" })), "org-a");
        assert_eq!(organization_of(&json!({ "id": "1" })), "");
    }

    #[test]
    fn database_errors_become_backend_errors() {
        let err: StoreError = DatabaseError::InvalidDatabaseUrl.into();
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
