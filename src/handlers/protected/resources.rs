use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::auth::AuthContext;
use crate::database::models::{ConfigTemplate, Dashboard, Layout, Protoboard, Server, Source};
use crate::middleware::{ApiResponse, ApiResult};
use crate::store::Store;

/// GET /api/sources - Sources of the caller's current organization
pub async fn sources(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Vec<Source>> {
    Ok(ApiResponse::success(state.facade.sources(&ctx).all().await?))
}

/// GET /api/kapacitors
pub async fn kapacitors(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Vec<Server>> {
    Ok(ApiResponse::success(state.facade.servers(&ctx).all().await?))
}

/// GET /api/dashboards
pub async fn dashboards(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Vec<Dashboard>> {
    Ok(ApiResponse::success(state.facade.dashboards(&ctx).all().await?))
}

/// GET /api/layouts - Global catalog
pub async fn layouts(State(state): State<AppState>) -> ApiResult<Vec<Layout>> {
    Ok(ApiResponse::success(state.facade.layouts().all().await?))
}

/// GET /api/protoboards - Global catalog
pub async fn protoboards(State(state): State<AppState>) -> ApiResult<Vec<Protoboard>> {
    Ok(ApiResponse::success(state.facade.protoboards().all().await?))
}

/// GET /api/config-templates - Global catalog
pub async fn config_templates(State(state): State<AppState>) -> ApiResult<Vec<ConfigTemplate>> {
    Ok(ApiResponse::success(state.facade.config_templates().all().await?))
}
