use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::AuthContext;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{UserPatch, UserSubmission};
use crate::store::Store;

/// GET /api/users - Members of the caller's current organization
pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Vec<User>> {
    let users = state.facade.users(&ctx).all().await?;
    Ok(ApiResponse::success(users))
}

/// POST /api/users
///
/// Expected Input:
/// ```json
/// { "name": "linus", "provider": "github", "roles": [{ "organization": "org-b", "name": "*" }] }
/// ```
pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(submission): Json<UserSubmission>,
) -> ApiResult<User> {
    let created = state.users.create(&ctx, submission).await?;
    Ok(ApiResponse::created(created))
}

/// PATCH /api/users/:id - Change roles and/or super admin status
pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> ApiResult<User> {
    let updated = state.users.update(&ctx, &id, patch).await?;
    Ok(ApiResponse::success(updated))
}
