#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use vigil_api_rust::app::{router, AppState};
use vigil_api_rust::auth::{generate_jwt, Claims, Principal};
use vigil_api_rust::config::{AppConfig, Environment, ResolverConfig};
use vigil_api_rust::database::models::{
    Config, Organization, Role, RoleName, Source, User, OAUTH2_SCHEME,
};
use vigil_api_rust::resolver::assemble;
use vigil_api_rust::store::{DataStores, MemoryStore, PrimaryStores};

pub const JWT_SECRET: &str = "integration-test-secret";

/// In-process server over seeded in-memory stores
pub struct TestApp {
    pub router: Router,
    pub stores: DataStores,
}

impl TestApp {
    pub fn spawn() -> Self {
        let config = test_config();
        let stores = assemble(&config.resolver, seeded_primary()).expect("assemble stores");
        let state = AppState::new(config, stores.clone(), None);

        Self {
            router: router(state),
            stores,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self.router.clone().oneshot(request).await.expect("router call");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };

        (status, json)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::for_environment(Environment::Development);
    config.security.jwt_secret = JWT_SECRET.to_string();
    config.api.enable_request_logging = false;
    config.resolver = ResolverConfig::default();
    config
}

/// Session token for `subject` logged in through `issuer`, acting in `organization`
pub fn token(subject: &str, issuer: &str, organization: &str) -> String {
    let principal = Principal {
        subject: subject.to_string(),
        issuer: issuer.to_string(),
        organization: organization.to_string(),
        group: String::new(),
    };
    generate_jwt(&Claims::new(&principal, 1), JWT_SECRET).expect("sign token")
}

pub fn data(body: &Value) -> &Value {
    &body["data"]
}

pub fn ids(body: &Value) -> Vec<String> {
    let mut ids: Vec<String> = data(body)
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|item| item["id"].as_str().map(str::to_string))
        .collect();
    ids.sort();
    ids
}

fn user(id: &str, name: &str, super_admin: bool, roles: &[(&str, RoleName)]) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        provider: "github".to_string(),
        scheme: OAUTH2_SCHEME.to_string(),
        super_admin,
        roles: roles.iter().map(|(org, role)| Role::new(*org, *role)).collect(),
    }
}

fn source(id: &str, organization: &str) -> Source {
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

/// ada is a super admin, grace edits org-b, linus administers org-a
fn seeded_primary() -> PrimaryStores {
    PrimaryStores {
        sources: Arc::new(MemoryStore::with_items([
            source("1", "org-a"),
            source("2", "org-b"),
            source("3", "org-b"),
        ])),
        users: Arc::new(MemoryStore::with_items([
            user("u1", "ada", true, &[("default", RoleName::Admin)]),
            user("u2", "grace", false, &[("org-b", RoleName::Editor)]),
            user("u3", "linus", false, &[("org-a", RoleName::Admin)]),
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
