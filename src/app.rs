use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{PrincipalRoleMapper, RoleGuard};
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{LoginService, OrganizationService, UserService};
use crate::store::{DataStores, StoreFacade};

/// Everything a handler needs, cloned per request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub facade: StoreFacade,
    pub login: LoginService,
    pub organizations: OrganizationService,
    pub users: UserService,
    pub database: Option<DatabaseManager>,
}

impl AppState {
    pub fn new(config: AppConfig, stores: DataStores, database: Option<DatabaseManager>) -> Self {
        let mapper = PrincipalRoleMapper::new(
            stores.mappings.clone(),
            stores.organizations.clone(),
            config.security.super_admin_group.clone(),
        );
        let guard = RoleGuard::new(stores.organizations.clone());
        let facade = StoreFacade::new(stores);

        Self {
            config: Arc::new(config),
            login: LoginService::new(facade.clone(), mapper),
            organizations: OrganizationService::new(facade.clone()),
            users: UserService::new(facade.clone(), guard),
            facade,
            database,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/me", get(protected::me::me))
        .route(
            "/api/organizations",
            get(protected::organizations::list).post(protected::organizations::create),
        )
        .route("/api/organizations/:id", delete(protected::organizations::remove))
        .route(
            "/api/users",
            get(protected::users::list).post(protected::users::create),
        )
        .route("/api/users/:id", patch(protected::users::update))
        .route(
            "/api/mappings",
            get(protected::mappings::list).post(protected::mappings::create),
        )
        .route("/api/sources", get(protected::resources::sources))
        .route("/api/kapacitors", get(protected::resources::kapacitors))
        .route("/api/dashboards", get(protected::resources::dashboards))
        .route("/api/layouts", get(protected::resources::layouts))
        .route("/api/protoboards", get(protected::resources::protoboards))
        .route("/api/config-templates", get(protected::resources::config_templates))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut app = Router::new()
        .route("/health", get(public::health))
        .merge(api)
        .layer(CorsLayer::permissive());

    if state.config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}
