use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{require_admin, require_session};
use crate::state::AppState;
use crate::{auth, events, notifications, tickets, users, wishlist};

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new().route("/login", post(auth::login));

    let session_routes = Router::new()
        .route("/logout", post(auth::logout))
        .route(
            "/wishlist",
            get(wishlist::list_wishlist)
                .post(wishlist::add_to_wishlist)
                .delete(wishlist::remove_from_wishlist),
        )
        .route("/notifications", get(notifications::get_notifications))
        .route("/events", get(events::list_events))
        .route("/events/filter", get(events::filter_events))
        .route("/events/popular", get(events::popular_events))
        .route("/events/top-cities", get(events::top_city_events))
        // `/tickets/records` is the admin listing and takes precedence, so an
        // event titled "records" has no reachable seat lookup.
        .route("/tickets/{event_title}", get(tickets::seats_for_event))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    // Layers run bottom-up: the session is resolved before the admin check.
    let admin_routes = Router::new()
        .route("/users/create", post(users::create_user))
        .route("/users/records", get(users::list_users))
        .route("/users/update/{old_username}", put(users::update_user))
        .route("/users/delete/{username}", delete(users::delete_user))
        .route("/locations/create", post(events::create_location))
        .route("/events/create", post(events::create_event))
        .route("/events/records", get(events::list_event_records))
        .route("/events/update/{old_event_title}", put(events::update_event))
        .route("/events/delete/{event_title}", delete(events::cancel_event))
        .route("/tickets/create", post(tickets::create_ticket))
        .route("/tickets/records", get(tickets::list_ticket_records))
        .route("/tickets/update/{ticket_id}", put(tickets::update_ticket))
        .route("/tickets/delete/{ticket_id}", delete(tickets::delete_ticket))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(admin_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
