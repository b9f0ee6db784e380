//! Administrative endpoints under `/api/v1/admin`.
//!
//! Every route here sits behind [`super::auth::auth_middleware`] and
//! [`super::auth::require_admin`], so handler bodies only run for Admin callers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info};

use super::validation::validate_user_id;
use super::{
    ApiError, ApiJson, ApiResponse, AppState, MatriculeDto, MatriculeRequest, MessageResponse,
    UpdateUserRequest, UserDto,
};
use crate::services::MatriculeParts;

/// Adds a matricule to the registry.
///
/// # Endpoint
/// `POST /api/v1/admin/add-matricule`
///
/// # Errors
/// 400 if any of `series`, `location`, `registrationNumber` is missing or
/// empty; 500 if the record cannot be stored.
pub async fn add_matricule(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<MatriculeRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let parts = MatriculeParts {
        series: payload.series,
        location: payload.location,
        registration_number: payload.registration_number,
    };

    state.matricule_service().add_matricule(&parts).await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Matricule added successfully",
    ))))
}

/// `GET /api/v1/admin/matricules`
pub async fn list_matricules(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<MatriculeDto>>>, ApiError> {
    let matricules = state
        .matricule_service()
        .list_matricules()
        .await?
        .into_iter()
        .map(MatriculeDto::from)
        .collect();

    Ok(Json(ApiResponse::success(matricules)))
}

/// `GET /api/v1/admin/allusers`
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state
        .store()
        .list_users()
        .await?
        .into_iter()
        .map(UserDto::from)
        .collect();

    Ok(Json(ApiResponse::success(users)))
}

/// `GET /api/v1/admin/{id}`
///
/// An unknown id is not an error: the response carries `data: null`.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Option<UserDto>>>, ApiError> {
    let id = validate_user_id(id)?;
    let user = state.store().get_user(id).await?.map(UserDto::from);

    Ok(Json(ApiResponse::success(user)))
}

/// `DELETE /api/v1/admin/{id}`
///
/// Idempotent: deleting an unknown id also returns 200.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let id = validate_user_id(id)?;

    if state.store().delete_user(id).await? {
        info!(user_id = id, "User deleted");
    } else {
        debug!(user_id = id, "Delete requested for unknown user");
    }

    Ok(StatusCode::OK)
}

/// `PUT /api/v1/admin/update-user/{userId}`
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let user_id = validate_user_id(user_id)?;

    state
        .auth_service()
        .update_user(user_id, &payload.username, &payload.email)
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "User updated successfully",
    ))))
}
