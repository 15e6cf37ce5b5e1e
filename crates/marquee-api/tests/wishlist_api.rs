//! Integration tests for the wishlist and notification endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, body_json};
use serde_json::json;

fn seeded() -> (TestApp, String) {
    let app = TestApp::new();
    let token = app.user("ana", false);
    app.location("Moody Center", "Austin", "TX");
    app.event("Jazz Night", "Moody Center");
    (app, token)
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn wishlist_routes_require_a_session() {
    let (app, _) = seeded();

    for method in [Method::GET, Method::POST, Method::DELETE] {
        let response = app
            .send(method.clone(), "/wishlist", None, Some(json!({"event_title": "Jazz Night"})))
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method}");
        let body = body_json(response).await;
        assert_eq!(body["error"], "Unauthorized access");
    }

    let response = app
        .send(Method::POST, "/wishlist", Some("garbage"), Some(json!({"event_title": "Jazz Night"})))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(app.count("SELECT COUNT(*) FROM wishlist"), 0);
    assert_eq!(app.count("SELECT COUNT(*) FROM notifications"), 0);
}

// ---------------------------------------------------------------------------
// Add / list / remove
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_then_list_then_remove() {
    let (app, token) = seeded();

    let response = app
        .send(Method::POST, "/wishlist", Some(&token), Some(json!({"event_title": "Jazz Night"})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Event added to wishlist successfully"
    );

    let response = app.send(Method::GET, "/wishlist", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let items = body_json(response).await;
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["event_title"], "Jazz Night");
    assert_eq!(items[0]["datetime_local"], "2025-09-01T19:30:00");
    assert_eq!(items[0]["location_name"], "Moody Center");
    assert_eq!(items[0]["promoter_name"], "AEG Presents");

    let response = app
        .send(Method::DELETE, "/wishlist", Some(&token), Some(json!({"event_title": "Jazz Night"})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Event \"Jazz Night\" removed from wishlist successfully"
    );
    assert_eq!(app.count("SELECT COUNT(*) FROM wishlist"), 0);
}

#[tokio::test]
async fn missing_title_is_400() {
    let (app, token) = seeded();

    let response = app
        .send(Method::POST, "/wishlist", Some(&token), Some(json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Event title is required");

    let response = app.send(Method::DELETE, "/wishlist", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(Method::POST, "/wishlist", Some(&token), Some(json!({"event_title": ""})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn adding_twice_keeps_one_row() {
    let (app, token) = seeded();

    for _ in 0..2 {
        let response = app
            .send(Method::POST, "/wishlist", Some(&token), Some(json!({"event_title": "Jazz Night"})))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(app.count("SELECT COUNT(*) FROM wishlist"), 1);
    assert_eq!(app.count("SELECT COUNT(*) FROM notifications"), 2);
}

#[tokio::test]
async fn removing_absent_entry_succeeds() {
    let (app, token) = seeded();
    let response = app
        .send(Method::DELETE, "/wishlist", Some(&token), Some(json!({"event_title": "Jazz Night"})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_event_is_database_error_and_leaves_nothing() {
    let (app, token) = seeded();
    let response = app
        .send(Method::POST, "/wishlist", Some(&token), Some(json!({"event_title": "Ghost Show"})))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "DATABASE_ERROR");
    assert!(body["error"].as_str().unwrap().starts_with("Database error:"));

    assert_eq!(app.count("SELECT COUNT(*) FROM wishlist"), 0);
    assert_eq!(app.count("SELECT COUNT(*) FROM notifications"), 0);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn wishlist_notice_is_delivered_once() {
    let (app, token) = seeded();
    let bo = app.user("bo", false);

    app.send(Method::POST, "/wishlist", Some(&bo), Some(json!({"event_title": "Jazz Night"})))
        .await;
    app.send(Method::POST, "/wishlist", Some(&token), Some(json!({"event_title": "Jazz Night"})))
        .await;

    let response = app.send(Method::GET, "/notifications", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let unread = body_json(response).await;
    assert_eq!(unread.as_array().unwrap().len(), 1);
    assert_eq!(
        unread[0]["message"],
        "You have added \"Jazz Night\" to your wishlist at Moody Center (Austin, TX). \
         Promoted by AEG Presents. Currently, 2 user(s) have wishlisted this event, including you."
    );

    let response = app.send(Method::GET, "/notifications", Some(&token), None).await;
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn logged_out_token_is_rejected() {
    let (app, token) = seeded();

    let response = app.send(Method::POST, "/logout", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send(Method::GET, "/wishlist", Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
