use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State, response::IntoResponse};
use tracing::info;

use marquee_db::Database;
use marquee_types::api::{Claims, LoginRequest, LoginResponse, MessageResponse};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, with_db};

pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Unexpected(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

/// Create the configured admin account if no user of that name exists.
/// Returns whether a user was created.
pub fn bootstrap_admin(db: &Database, username: &str, password: &str) -> ApiResult<bool> {
    if db.get_user_by_username(username)?.is_some() {
        return Ok(false);
    }
    let hash = hash_password(password)?;
    db.create_user(username, username, &hash, true)?;
    info!(username, "Bootstrap admin created");
    Ok(true)
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "Please enter both username and password.".into(),
        ));
    }

    let username = req.username.clone();
    let user = with_db(&state, move |db| db.get_user_by_username(&username))
        .await?
        .ok_or(ApiError::Unauthorized("Invalid username or password."))?;

    if !verify_password(&req.password, &user.password) {
        return Err(ApiError::Unauthorized("Invalid username or password."));
    }

    let token = state.sessions.issue(&user.username, user.is_admin)?;
    info!(username = %user.username, is_admin = user.is_admin, "User logged in");

    Ok(Json(LoginResponse {
        token,
        username: user.username,
        is_admin: user.is_admin,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<impl IntoResponse> {
    state.sessions.revoke(&claims)?;
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
        assert!(!verify_password("correct horse", "not-a-phc-string"));
    }
}
