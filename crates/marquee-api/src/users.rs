use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use marquee_types::api::{CreateUserRequest, MessageResponse, UpdateUserRequest};

use crate::auth::hash_password;
use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, with_db};

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation("Username and password are required".into()));
    }

    let password_hash = hash_password(&req.password)?;
    with_db(&state, move |db| {
        db.create_user(req.username.trim(), &req.name, &password_hash, req.is_admin)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully!")),
    ))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = with_db(&state, |db| db.list_users()).await?;
    Ok(Json(users))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(old_username): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.new_username.trim().is_empty() {
        return Err(ApiError::Validation("New username is required".into()));
    }

    let password_hash = req.password.as_deref().map(hash_password).transpose()?;
    let target = old_username.clone();
    let updated = with_db(&state, move |db| {
        db.update_user(
            &target,
            req.new_username.trim(),
            &req.name,
            password_hash.as_deref(),
            req.is_admin,
        )
    })
    .await?;

    if updated == 0 {
        return Err(ApiError::NotFound(format!("User not found: {old_username}")));
    }
    Ok(Json(MessageResponse::new("User updated successfully!")))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let target = username.clone();
    let deleted = with_db(&state, move |db| db.delete_user(&target)).await?;

    if deleted == 0 {
        return Err(ApiError::NotFound(format!("User not found: {username}")));
    }
    Ok(Json(MessageResponse::new("User deleted successfully!")))
}
