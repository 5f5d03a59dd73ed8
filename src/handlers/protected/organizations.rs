use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::AuthContext;
use crate::database::models::Organization;
use crate::middleware::{ApiResponse, ApiResult};
use crate::store::Store;

/// GET /api/organizations - Every organization for super admins, otherwise the caller's own
pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Vec<Organization>> {
    let orgs = state.facade.organizations(&ctx).all().await?;
    Ok(ApiResponse::success(orgs))
}

/// POST /api/organizations - Create an organization; the caller becomes its admin
pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(org): Json<Organization>,
) -> ApiResult<Organization> {
    let created = state.organizations.create(&ctx, org).await?;
    Ok(ApiResponse::created(created))
}

/// DELETE /api/organizations/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.organizations.delete(&ctx, &id).await?;
    Ok(ApiResponse::<()>::no_content())
}
