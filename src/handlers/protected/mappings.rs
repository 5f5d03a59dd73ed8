use axum::{extract::State, Extension, Json};

use crate::app::AppState;
use crate::auth::AuthContext;
use crate::database::models::Mapping;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::store::Store;

/// GET /api/mappings - Super admins only; everyone else sees an empty list
pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Vec<Mapping>> {
    let mappings = state.facade.mappings(&ctx).all().await?;
    Ok(ApiResponse::success(mappings))
}

/// POST /api/mappings
pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(mapping): Json<Mapping>,
) -> ApiResult<Mapping> {
    if mapping.organization.is_empty() {
        return Err(ApiError::validation_error("mapping must name an organization"));
    }

    // the target organization must exist, looked up with the caller's own claims
    state
        .facade
        .organizations(&ctx)
        .get(&mapping.organization)
        .await?;

    let created = state.facade.mappings(&ctx).add(mapping).await?;
    Ok(ApiResponse::created(created))
}
