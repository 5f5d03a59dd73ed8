use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Identity-provider group whose members become super admins on first login
    pub super_admin_group: Option<String>,
}

/// Where the non-database providers of each layered resolver live
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Extra `.json` layouts on disk
    pub canned_path: Option<PathBuf>,
    /// `.dashboard`, `.src`, `.kap` and `.org` files
    pub resources_path: Option<PathBuf>,
    pub protoboards_path: Option<PathBuf>,
    pub templates_path: Option<PathBuf>,
    /// Default time-series source synthesized from start-up flags
    pub influxdb: Option<ConnectionConfig>,
    /// Default Kapacitor synthesized from start-up flags
    pub kapacitor: Option<ConnectionConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        Self::for_environment(environment).with_env_overrides()
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup; unparseable values keep the preset
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("DATABASE_NAME") {
            self.database.name = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(v) = lookup("API_PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Some(v) = lookup("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Some(v) = lookup("SECURITY_SUPER_ADMIN_GROUP") {
            self.security.super_admin_group = non_empty(v);
        }

        // Resolver overrides
        if let Some(v) = lookup("RESOLVER_CANNED_PATH") {
            self.resolver.canned_path = non_empty(v).map(PathBuf::from);
        }
        if let Some(v) = lookup("RESOLVER_RESOURCES_PATH") {
            self.resolver.resources_path = non_empty(v).map(PathBuf::from);
        }
        if let Some(v) = lookup("RESOLVER_PROTOBOARDS_PATH") {
            self.resolver.protoboards_path = non_empty(v).map(PathBuf::from);
        }
        if let Some(v) = lookup("RESOLVER_TEMPLATES_PATH") {
            self.resolver.templates_path = non_empty(v).map(PathBuf::from);
        }
        if let Some(url) = lookup("INFLUXDB_URL").and_then(non_empty) {
            self.resolver.influxdb = Some(ConnectionConfig {
                url,
                username: lookup("INFLUXDB_USERNAME").unwrap_or_default(),
                password: lookup("INFLUXDB_PASSWORD").unwrap_or_default(),
            });
        }
        if let Some(url) = lookup("KAPACITOR_URL").and_then(non_empty) {
            self.resolver.kapacitor = Some(ConnectionConfig {
                url,
                username: lookup("KAPACITOR_USERNAME").unwrap_or_default(),
                password: lookup("KAPACITOR_PASSWORD").unwrap_or_default(),
            });
        }

        self
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "postgres://localhost:5432".to_string(),
                name: "vigil_development".to_string(),
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                port: 8888,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: "development-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                super_admin_group: None,
            },
            resolver: ResolverConfig {
                canned_path: Some(PathBuf::from("canned")),
                resources_path: Some(PathBuf::from("resources")),
                ..ResolverConfig::default()
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: "postgres://localhost:5432".to_string(),
                name: "vigil_staging".to_string(),
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                port: 8888,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                super_admin_group: None,
            },
            resolver: ResolverConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: "postgres://localhost:5432".to_string(),
                name: "vigil".to_string(),
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                port: 8888,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                super_admin_group: None,
            },
            resolver: ResolverConfig::default(),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.port, 8888);
        assert!(config.resolver.canned_path.is_some());
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.is_production());
        assert!(config.security.jwt_secret.is_empty());
        assert!(config.resolver.resources_path.is_none());
    }

    #[test]
    fn overrides_replace_presets() {
        let config = AppConfig::development().with_overrides(lookup(&[
            ("API_PORT", "9000"),
            ("DATABASE_MAX_CONNECTIONS", "not-a-number"),
            ("SECURITY_SUPER_ADMIN_GROUP", "ops"),
            ("RESOLVER_CANNED_PATH", ""),
            ("INFLUXDB_URL", "http://influx:8086"),
            ("INFLUXDB_USERNAME", "reader"),
        ]));

        assert_eq!(config.api.port, 9000);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.security.super_admin_group.as_deref(), Some("ops"));
        assert!(config.resolver.canned_path.is_none());

        let influx = config.resolver.influxdb.unwrap();
        assert_eq!(influx.url, "http://influx:8086");
        assert_eq!(influx.username, "reader");
        assert!(influx.password.is_empty());
        assert!(config.resolver.kapacitor.is_none());
    }

    #[test]
    fn blank_super_admin_group_is_unset() {
        let config = AppConfig::development()
            .with_overrides(lookup(&[("SECURITY_SUPER_ADMIN_GROUP", "  ")]));
        assert!(config.security.super_admin_group.is_none());
    }
}
