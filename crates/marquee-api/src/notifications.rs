use axum::{Extension, Json, extract::State, response::IntoResponse};

use marquee_types::api::Session;

use crate::error::ApiResult;
use crate::state::{AppState, with_db};

/// Unread notifications for the session user. Returned rows are marked read.
pub async fn get_notifications(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<impl IntoResponse> {
    let unread = with_db(&state, move |db| db.take_unread_notifications(&session)).await?;
    Ok(Json(unread))
}
