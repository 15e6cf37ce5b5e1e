#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, header};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use marquee_api::session::SessionStore;
use marquee_api::state::{AppState, AppStateInner};
use marquee_db::Database;
use marquee_types::models::{Event, Location};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Router plus direct handles on the state behind it. The temp dir holding
/// the database lives as long as this value.
pub struct TestApp {
    pub state: AppState,
    _dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("api.db"), Duration::from_secs(5)).unwrap();
        let sessions = SessionStore::new(TEST_SECRET, chrono::Duration::hours(1));
        Self {
            state: AppStateInner::new(db, sessions),
            _dir: dir,
        }
    }

    pub fn router(&self) -> Router {
        marquee_api::router(self.state.clone())
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    /// Create a user row and return a bearer token for it.
    pub fn user(&self, username: &str, is_admin: bool) -> String {
        self.db()
            .create_user(username, username, "unused-hash", is_admin)
            .unwrap();
        self.state.sessions.issue(username, is_admin).unwrap()
    }

    pub fn location(&self, name: &str, city: &str, state: &str) {
        self.db()
            .create_location(&Location {
                location_name: name.into(),
                city: city.into(),
                state: state.into(),
            })
            .unwrap();
    }

    pub fn event(&self, title: &str, location: &str) {
        self.db()
            .create_event(&Event {
                event_title: title.into(),
                event_url: "https://tickets.example/e".into(),
                datetime_local: NaiveDate::from_ymd_opt(2025, 9, 1)
                    .unwrap()
                    .and_hms_opt(19, 30, 0)
                    .unwrap(),
                location_name: location.into(),
                promoter_name: "AEG Presents".into(),
            })
            .unwrap();
    }

    pub fn count(&self, sql: &str) -> i64 {
        self.db()
            .with_conn(|conn| Ok(conn.query_row(sql, [], |row| row.get(0))?))
            .unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.router()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
