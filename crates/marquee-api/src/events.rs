use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use marquee_types::api::{CreateLocationRequest, EventFilterQuery, EventRequest, MessageResponse};
use marquee_types::models::{Event, Location};

use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, with_db};

const TOP_CITY_EVENTS_LIMIT: u32 = 10;

fn event_from(req: EventRequest) -> ApiResult<Event> {
    if req.event_title.trim().is_empty() {
        return Err(ApiError::Validation("Event title is required".into()));
    }
    Ok(Event {
        event_title: req.event_title.trim().to_string(),
        event_url: req.event_url,
        datetime_local: req.datetime_local,
        location_name: req.location_name,
        promoter_name: req.promoter_name,
    })
}

// -- Admin --

pub async fn create_location(
    State(state): State<AppState>,
    Json(req): Json<CreateLocationRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.location_name.trim().is_empty() {
        return Err(ApiError::Validation("Location name is required".into()));
    }

    let location = Location {
        location_name: req.location_name.trim().to_string(),
        city: req.city,
        state: req.state,
    };
    with_db(&state, move |db| db.create_location(&location)).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Location created successfully!")),
    ))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<EventRequest>,
) -> ApiResult<impl IntoResponse> {
    let event = event_from(req)?;
    with_db(&state, move |db| db.create_event(&event)).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Event created successfully!")),
    ))
}

pub async fn list_event_records(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let events = with_db(&state, |db| db.list_event_records()).await?;
    Ok(Json(events))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(old_title): Path<String>,
    Json(req): Json<EventRequest>,
) -> ApiResult<impl IntoResponse> {
    let event = event_from(req)?;
    let target = old_title.clone();
    let updated = with_db(&state, move |db| db.update_event(&target, &event)).await?;

    if updated == 0 {
        return Err(ApiError::NotFound(format!("Event not found: {old_title}")));
    }
    Ok(Json(MessageResponse::new("Event updated successfully!")))
}

/// Cancel an event: notify its wishlisters and delete it in one transaction.
/// An unknown title is a 404 and writes nothing.
pub async fn cancel_event(
    State(state): State<AppState>,
    Path(event_title): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let title = event_title.clone();
    let cancelled = with_db(&state, move |db| db.cancel_event(&title)).await?;

    info!(
        event_title = %event_title,
        notified = cancelled.notifications_sent,
        "Event deleted"
    );
    Ok(Json(MessageResponse::new("Event deleted successfully!")))
}

// -- Browsing --

pub async fn list_events(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let events = with_db(&state, |db| db.list_events()).await?;
    Ok(Json(events))
}

pub async fn filter_events(
    State(state): State<AppState>,
    Query(filter): Query<EventFilterQuery>,
) -> ApiResult<impl IntoResponse> {
    let events = with_db(&state, move |db| db.filter_events(&filter)).await?;
    Ok(Json(events))
}

pub async fn popular_events(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let events = with_db(&state, |db| db.popular_events()).await?;
    Ok(Json(events))
}

pub async fn top_city_events(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let events = with_db(&state, |db| db.top_city_events(TOP_CITY_EVENTS_LIMIT)).await?;
    Ok(Json(events))
}
