use axum::{Extension, Json, body::Bytes, extract::State, response::IntoResponse};

use marquee_types::api::{MessageResponse, Session, WishlistRequest};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, with_db};

/// An empty body reads as `{}` so that a missing title is a 400 from the
/// title check rather than a body rejection.
fn event_title_from(body: &Bytes) -> ApiResult<String> {
    let req: WishlistRequest = if body.is_empty() {
        WishlistRequest::default()
    } else {
        serde_json::from_slice(body)
            .map_err(|e| ApiError::Validation(format!("Invalid request body: {e}")))?
    };
    Ok(req.event_title.unwrap_or_default())
}

pub async fn add_to_wishlist(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let event_title = event_title_from(&body)?;

    with_db(&state, move |db| db.add_to_wishlist(&session, &event_title)).await?;

    Ok(Json(MessageResponse::new("Event added to wishlist successfully")))
}

pub async fn list_wishlist(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<impl IntoResponse> {
    let items = with_db(&state, move |db| db.list_wishlist(&session)).await?;
    Ok(Json(items))
}

pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let event_title = event_title_from(&body)?;

    let title = event_title.clone();
    with_db(&state, move |db| db.remove_from_wishlist(&session, &title)).await?;

    Ok(Json(MessageResponse::new(format!(
        "Event \"{event_title}\" removed from wishlist successfully"
    ))))
}
