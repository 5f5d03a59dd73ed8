use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use super::canned;
use super::{BuildError, FileStore, LayeredResolver, StaticStore};
use crate::config::{ConnectionConfig, ResolverConfig};
use crate::database::models::{
    ConfigTemplate, Dashboard, Layout, Organization, Protoboard, Server, Source,
    DEFAULT_ORGANIZATION_ID,
};
use crate::store::{DataStores, PrimaryStores, Resource, Store};

/// Id of the source and Kapacitor synthesized from start-up flags
pub const FLAGS_RESOURCE_ID: &str = "flags";

fn with_directory<T: Resource>(
    resolver: LayeredResolver<T>,
    dir: Option<&PathBuf>,
    extension: &'static str,
) -> LayeredResolver<T> {
    match dir {
        Some(dir) => {
            tracing::debug!(
                "Adding filesystem provider for {} at {}",
                resolver.catalog(),
                dir.display()
            );
            resolver.with_layer("filesystem", Arc::new(FileStore::<T>::new(dir, extension)))
        }
        None => resolver,
    }
}

fn validated_url(kind: &'static str, raw: &str) -> Result<Url, BuildError> {
    Url::parse(raw).map_err(|source| BuildError::InvalidUrl {
        kind,
        url: raw.to_string(),
        source,
    })
}

/// Layouts: database, then `.json` files, then the compiled-in set
#[derive(Debug, Clone, Default)]
pub struct LayoutsBuilder {
    pub canned_path: Option<PathBuf>,
}

impl LayoutsBuilder {
    pub fn build(self, primary: Arc<dyn Store<Layout>>) -> Result<LayeredResolver<Layout>, BuildError> {
        let resolver = LayeredResolver::new("layouts").with_layer("database", primary);
        let resolver = with_directory(resolver, self.canned_path.as_ref(), "json");
        Ok(resolver.with_layer("compiled", Arc::new(canned::layouts()?)))
    }
}

/// Dashboards: database, then `.dashboard` files
#[derive(Debug, Clone, Default)]
pub struct DashboardsBuilder {
    pub resources_path: Option<PathBuf>,
}

impl DashboardsBuilder {
    pub fn build(
        self,
        primary: Arc<dyn Store<Dashboard>>,
    ) -> Result<LayeredResolver<Dashboard>, BuildError> {
        let resolver = LayeredResolver::new("dashboards").with_layer("database", primary);
        Ok(with_directory(resolver, self.resources_path.as_ref(), "dashboard"))
    }
}

/// Sources: database, then `.src` files, then the source named by start-up flags
#[derive(Debug, Clone, Default)]
pub struct SourcesBuilder {
    pub resources_path: Option<PathBuf>,
    pub influxdb: Option<ConnectionConfig>,
}

impl SourcesBuilder {
    pub fn build(self, primary: Arc<dyn Store<Source>>) -> Result<LayeredResolver<Source>, BuildError> {
        let resolver = LayeredResolver::new("sources").with_layer("database", primary);
        let resolver = with_directory(resolver, self.resources_path.as_ref(), "src");

        let defaults = match &self.influxdb {
            Some(conn) => {
                let url = validated_url("source", &conn.url)?;
                vec![Source {
                    id: FLAGS_RESOURCE_ID.to_string(),
                    name: url.host_str().unwrap_or("influxdb").to_string(),
                    kind: "influx".to_string(),
                    username: conn.username.clone(),
                    password: conn.password.clone(),
                    url: conn.url.clone(),
                    insecure_skip_verify: false,
                    default: true,
                    telegraf: "telegraf".to_string(),
                    organization: DEFAULT_ORGANIZATION_ID.to_string(),
                }]
            }
            None => Vec::new(),
        };

        Ok(resolver.with_layer("flags", Arc::new(StaticStore::new("flag sources", defaults))))
    }
}

/// Kapacitors: database, then `.kap` files, then the server named by start-up flags
#[derive(Debug, Clone, Default)]
pub struct KapacitorsBuilder {
    pub resources_path: Option<PathBuf>,
    pub kapacitor: Option<ConnectionConfig>,
    /// Attach the flag server to the flag source when both are configured
    pub attach_to_flag_source: bool,
}

impl KapacitorsBuilder {
    pub fn build(self, primary: Arc<dyn Store<Server>>) -> Result<LayeredResolver<Server>, BuildError> {
        let resolver = LayeredResolver::new("kapacitors").with_layer("database", primary);
        let resolver = with_directory(resolver, self.resources_path.as_ref(), "kap");

        let defaults = match &self.kapacitor {
            Some(conn) => {
                validated_url("kapacitor", &conn.url)?;
                let source_id = if self.attach_to_flag_source {
                    FLAGS_RESOURCE_ID.to_string()
                } else {
                    String::new()
                };
                vec![Server {
                    id: FLAGS_RESOURCE_ID.to_string(),
                    source_id,
                    name: "Kapacitor".to_string(),
                    username: conn.username.clone(),
                    password: conn.password.clone(),
                    url: conn.url.clone(),
                    insecure_skip_verify: false,
                    active: true,
                    organization: DEFAULT_ORGANIZATION_ID.to_string(),
                }]
            }
            None => Vec::new(),
        };

        Ok(resolver.with_layer("flags", Arc::new(StaticStore::new("flag kapacitors", defaults))))
    }
}

/// Organizations: database, then `.org` files
#[derive(Debug, Clone, Default)]
pub struct OrganizationsBuilder {
    pub resources_path: Option<PathBuf>,
}

impl OrganizationsBuilder {
    pub fn build(
        self,
        primary: Arc<dyn Store<Organization>>,
    ) -> Result<LayeredResolver<Organization>, BuildError> {
        let resolver = LayeredResolver::new("organizations").with_layer("database", primary);
        Ok(with_directory(resolver, self.resources_path.as_ref(), "org"))
    }
}

/// Protoboards have no database table: `.json` files, then the compiled-in set
#[derive(Debug, Clone, Default)]
pub struct ProtoboardsBuilder {
    pub path: Option<PathBuf>,
}

impl ProtoboardsBuilder {
    pub fn build(self) -> Result<LayeredResolver<Protoboard>, BuildError> {
        let resolver = with_directory(LayeredResolver::new("protoboards"), self.path.as_ref(), "json");
        Ok(resolver.with_layer("compiled", Arc::new(canned::protoboards()?)))
    }
}

/// Config templates: `.template` files, then the compiled-in set
#[derive(Debug, Clone, Default)]
pub struct ConfigTemplatesBuilder {
    pub path: Option<PathBuf>,
}

impl ConfigTemplatesBuilder {
    pub fn build(self) -> Result<LayeredResolver<ConfigTemplate>, BuildError> {
        let resolver = with_directory(
            LayeredResolver::new("config templates"),
            self.path.as_ref(),
            "template",
        );
        Ok(resolver.with_layer("compiled", Arc::new(canned::config_templates()?)))
    }
}

/// Wrap the primary stores in their resolver chains. Users, config and mappings
/// have a single authoritative provider and pass through untouched.
pub fn assemble(config: &ResolverConfig, primary: PrimaryStores) -> Result<DataStores, BuildError> {
    let sources = SourcesBuilder {
        resources_path: config.resources_path.clone(),
        influxdb: config.influxdb.clone(),
    }
    .build(primary.sources)?;

    let servers = KapacitorsBuilder {
        resources_path: config.resources_path.clone(),
        kapacitor: config.kapacitor.clone(),
        attach_to_flag_source: config.influxdb.is_some(),
    }
    .build(primary.servers)?;

    let dashboards = DashboardsBuilder {
        resources_path: config.resources_path.clone(),
    }
    .build(primary.dashboards)?;

    let organizations = OrganizationsBuilder {
        resources_path: config.resources_path.clone(),
    }
    .build(primary.organizations)?;

    let layouts = LayoutsBuilder {
        canned_path: config.canned_path.clone(),
    }
    .build(primary.layouts)?;

    let protoboards = ProtoboardsBuilder {
        path: config.protoboards_path.clone(),
    }
    .build()?;

    let config_templates = ConfigTemplatesBuilder {
        path: config.templates_path.clone(),
    }
    .build()?;

    tracing::info!(
        "Assembled resolvers: {} source, {} kapacitor, {} dashboard, {} organization, {} layout providers",
        sources.layers().len(),
        servers.layers().len(),
        dashboards.layers().len(),
        organizations.layers().len(),
        layouts.layers().len()
    );

    Ok(DataStores {
        sources: Arc::new(sources),
        servers: Arc::new(servers),
        users: primary.users,
        dashboards: Arc::new(dashboards),
        organizations: Arc::new(organizations),
        config: primary.config,
        mappings: primary.mappings,
        layouts: Arc::new(layouts),
        protoboards: Arc::new(protoboards),
        config_templates: Arc::new(config_templates),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::RoleName;
    use crate::store::{MemoryStore, OrganizationsStore};
    use tempfile::TempDir;

    fn influx(url: &str) -> ConnectionConfig {
        ConnectionConfig {
            url: url.to_string(),
            username: "reader".to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn layouts_fall_back_to_compiled_set() {
        let resolver = LayoutsBuilder::default()
            .build(Arc::new(MemoryStore::<Layout>::new()))
            .unwrap();

        let names: Vec<_> = resolver.layers().iter().map(|l| l.name().to_string()).collect();
        assert_eq!(names, vec!["database", "compiled"]);
        assert!(!resolver.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sources_include_flag_default() {
        let resolver = SourcesBuilder {
            resources_path: None,
            influxdb: Some(influx("http://influx.local:8086")),
        }
        .build(Arc::new(MemoryStore::<Source>::new()))
        .unwrap();

        let source = resolver.get(FLAGS_RESOURCE_ID).await.unwrap();
        assert!(source.default);
        assert_eq!(source.organization, DEFAULT_ORGANIZATION_ID);
        assert_eq!(source.name, "influx.local");
    }

    #[test]
    fn invalid_flag_url_fails_the_build() {
        let err = SourcesBuilder {
            resources_path: None,
            influxdb: Some(influx("not a url")),
        }
        .build(Arc::new(MemoryStore::<Source>::new()))
        .err()
        .unwrap();

        assert!(matches!(err, BuildError::InvalidUrl { kind: "source", .. }));
    }

    #[tokio::test]
    async fn kapacitor_attaches_to_flag_source() {
        let resolver = KapacitorsBuilder {
            resources_path: None,
            kapacitor: Some(influx("http://kapacitor.local:9092")),
            attach_to_flag_source: true,
        }
        .build(Arc::new(MemoryStore::<Server>::new()))
        .unwrap();

        let server = resolver.get(FLAGS_RESOURCE_ID).await.unwrap();
        assert_eq!(server.source_id, FLAGS_RESOURCE_ID);
        assert!(server.active);
    }

    #[tokio::test]
    async fn organizations_read_org_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("ops.org"),
            serde_json::to_string(&Organization::new("ops", "Ops", RoleName::Viewer)).unwrap(),
        )
        .unwrap();

        let primary = MemoryStore::with_items([Organization::default_organization()]);
        let resolver = OrganizationsBuilder {
            resources_path: Some(dir.path().to_path_buf()),
        }
        .build(Arc::new(primary))
        .unwrap();

        assert_eq!(resolver.get("ops").await.unwrap().default_role, RoleName::Viewer);
        assert!(resolver.default_organization().await.unwrap().is_default());
    }

    #[tokio::test]
    async fn assemble_wires_every_catalog() {
        let dir = TempDir::new().unwrap();
        let config = ResolverConfig {
            resources_path: Some(dir.path().to_path_buf()),
            ..ResolverConfig::default()
        };

        let stores = assemble(&config, PrimaryStores::in_memory()).unwrap();

        assert!(stores.dashboards.all().await.unwrap().is_empty());
        assert!(stores.sources.all().await.unwrap().is_empty());
        assert!(!stores.layouts.all().await.unwrap().is_empty());
        assert!(!stores.protoboards.all().await.unwrap().is_empty());
        assert!(!stores.config_templates.all().await.unwrap().is_empty());

        let org = stores.organizations.create_default().await.unwrap();
        assert!(org.is_default());
    }
}
