use axum::{extract::State, Extension};
use serde::Serialize;

use crate::app::AppState;
use crate::auth::Principal;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: User,
    pub current_organization: Option<String>,
}

/// GET /api/me - Current user, provisioned from mapping rules on first call
pub async fn me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<MeResponse> {
    let (user, ctx) = state.login.provision(&principal).await?;

    Ok(ApiResponse::success(MeResponse {
        current_organization: ctx.organization_id().map(str::to_string),
        user,
    }))
}
