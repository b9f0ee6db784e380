use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::{
    ApiError, ApiJson, ApiResponse, AppState, AuthenticationRequest, RegisterRequest, UserDto,
};
use crate::entities::users::Role;
use crate::services::AuthenticationResponse;

/// Identity of the bearer of a verified token, inserted into request
/// extensions by [`auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub role: Role,
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware: requires `Authorization: Bearer <token>`.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = state.auth_service().verify_token(token).map_err(|e| {
        tracing::debug!("Token rejected: {e}");
        ApiError::from(e)
    })?;

    tracing::Span::current().record("user_id", claims.user_id);

    request.extensions_mut().insert(CurrentUser {
        id: claims.user_id,
        email: claims.sub,
        username: claims.username,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Rejects callers that do not hold the Admin role. Must run after
/// [`auth_middleware`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    if let Err(e) = authorize(&[user.role], Role::Admin) {
        tracing::warn!(user_id = user.id, role = %user.role, "Admin access denied");
        return Err(e);
    }

    Ok(next.run(request).await)
}

/// Allows the request when `required` is among the caller's roles.
pub fn authorize(caller_roles: &[Role], required: Role) -> Result<(), ApiError> {
    if caller_roles.contains(&required) {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!("{required} role required")))
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/auth/register
/// Creates a Technicien account and returns a token for it
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthenticationResponse>>, ApiError> {
    let response = state
        .auth_service()
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(response)))
}

/// POST /api/v1/auth/authenticate
/// Exchanges email and password for a token
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<AuthenticationRequest>,
) -> Result<Json<ApiResponse<AuthenticationResponse>>, ApiError> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let response = state
        .auth_service()
        .authenticate(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::success(response)))
}

/// GET /api/v1/auth/me
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    let user = state.auth_service().current_user(user.id).await?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}
