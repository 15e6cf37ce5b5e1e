use axum::{
    Extension,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use marquee_types::api::Session;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolve the bearer token into a request-scoped [`Session`] (and the raw
/// claims, for logout). Rejects with 401 before the handler runs.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(ApiError::unauthorized)?
        .to_owned();

    let claims = state.sessions.resolve(&token)?;
    req.extensions_mut().insert(Session::from(&claims));
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Must be layered inside [`require_session`].
pub async fn require_admin(
    Extension(session): Extension<Session>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !session.is_admin {
        warn!(username = %session.username, "Non-admin session on admin route");
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(req).await)
}
