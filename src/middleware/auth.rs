use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::{validate_jwt, AuthContext};
use crate::database::models::OAUTH2_SCHEME;
use crate::error::ApiError;
use crate::services::LoginService;
use crate::store::UsersStore;

/// JWT authentication middleware.
///
/// Validates the bearer token, then injects the token's [`Principal`](crate::auth::Principal)
/// and the caller's [`AuthContext`] into request extensions. A principal with no
/// stored user yet gets an anonymous context, so every store it touches fails
/// closed until it goes through `/api/me`.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&token, &state.config.security.jwt_secret)?;
    let principal = claims.principal();

    let users = state.facade.users(&AuthContext::server());
    let ctx = match users
        .find(&principal.subject, &principal.issuer, OAUTH2_SCHEME)
        .await
    {
        Ok(user) => LoginService::context_for(&user, Some(&principal.organization))?,
        Err(e) if e.is_not_found() => {
            tracing::debug!("No stored user for '{}' yet", principal.subject);
            AuthContext::anonymous()
        }
        Err(e) => return Err(e.into()),
    };

    request.extensions_mut().insert(principal);
    request.extensions_mut().insert(ctx);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
