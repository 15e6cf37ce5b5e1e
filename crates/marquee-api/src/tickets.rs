use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use marquee_types::api::{MessageResponse, TicketRequest};
use marquee_types::models::Ticket;

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, with_db};

pub async fn create_ticket(
    State(state): State<AppState>,
    Json(req): Json<TicketRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.ticket_id.trim().is_empty() {
        return Err(ApiError::Validation("Ticket id is required".into()));
    }

    let ticket = Ticket::from(req);
    with_db(&state, move |db| db.create_ticket(&ticket)).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Ticket created successfully!")),
    ))
}

pub async fn list_ticket_records(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let tickets = with_db(&state, |db| db.list_ticket_records()).await?;
    Ok(Json(tickets))
}

/// The path id wins over any `ticket_id` in the body.
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
    Json(req): Json<TicketRequest>,
) -> ApiResult<impl IntoResponse> {
    let ticket = Ticket::from(req);
    let target = ticket_id.clone();
    let updated = with_db(&state, move |db| db.update_ticket(&target, &ticket)).await?;

    if updated == 0 {
        return Err(ApiError::NotFound(format!("Ticket not found: {ticket_id}")));
    }
    Ok(Json(MessageResponse::new("Ticket updated successfully!")))
}

pub async fn delete_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let target = ticket_id.clone();
    let deleted = with_db(&state, move |db| db.delete_ticket(&target)).await?;

    if deleted == 0 {
        return Err(ApiError::NotFound(format!("Ticket not found: {ticket_id}")));
    }
    Ok(Json(MessageResponse::new("Ticket deleted successfully!")))
}

pub async fn seats_for_event(
    State(state): State<AppState>,
    Path(event_title): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let title = event_title.clone();
    let seats = with_db(&state, move |db| db.seats_for_event(&title)).await?;

    if seats.is_empty() {
        return Err(ApiError::NotFound(format!(
            "No tickets found for event: {event_title}"
        )));
    }
    Ok(Json(seats))
}
