use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::Ticket;

// -- Sessions --

/// Bearer token claims. The token is opaque to clients; only the server
/// decodes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
    /// Token id, used to revoke the token on logout.
    pub jti: String,
}

/// Request-scoped identity resolved from a bearer token. Handlers receive it
/// explicitly instead of reading ambient session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub is_admin: bool,
}

impl From<&Claims> for Session {
    fn from(claims: &Claims) -> Self {
        Self {
            username: claims.sub.clone(),
            is_admin: claims.is_admin,
        }
    }
}

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub is_admin: bool,
}

// -- Generic --

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// -- Users --

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub new_username: String,
    pub name: String,
    /// Absent keeps the stored hash.
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

// -- Locations --

#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub location_name: String,
    pub city: String,
    pub state: String,
}

// -- Events --

/// Body of both create and update; on update `event_title` is the new title.
#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub event_title: String,
    pub event_url: String,
    pub datetime_local: NaiveDateTime,
    pub location_name: String,
    pub promoter_name: String,
}

#[derive(Debug, Deserialize)]
pub struct EventFilterQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub tab: EventTab,
}

fn default_city() -> String {
    "all".to_string()
}

impl Default for EventFilterQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            city: default_city(),
            start_date: String::new(),
            end_date: String::new(),
            tab: EventTab::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventTab {
    #[default]
    All,
    /// Only the cities with the most scheduled events.
    Major,
    Popular,
}

// -- Tickets --

#[derive(Debug, Deserialize)]
pub struct TicketRequest {
    pub ticket_id: String,
    pub event_title: String,
    pub ticket_price: f64,
    pub fee: f64,
    pub total_price: f64,
    pub quantity: i64,
    pub full_section: String,
    pub section: String,
    pub row_num: String,
}

impl From<TicketRequest> for Ticket {
    fn from(req: TicketRequest) -> Self {
        Ticket {
            ticket_id: req.ticket_id,
            event_title: req.event_title,
            ticket_price: req.ticket_price,
            fee: req.fee,
            total_price: req.total_price,
            quantity: req.quantity,
            full_section: req.full_section,
            section: req.section,
            row_num: req.row_num,
        }
    }
}

// -- Wishlist --

/// `event_title` is optional at the wire level so a missing title is
/// reported as a validation error rather than a body rejection.
#[derive(Debug, Default, Deserialize)]
pub struct WishlistRequest {
    #[serde(default)]
    pub event_title: Option<String>,
}

// -- Notifications --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadNotification {
    pub notification_id: i64,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_query_defaults() {
        let q: EventFilterQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.city, "all");
        assert_eq!(q.tab, EventTab::All);
        assert!(q.query.is_empty());
    }

    #[test]
    fn wishlist_request_tolerates_missing_title() {
        let req: WishlistRequest = serde_json::from_str("{}").unwrap();
        assert!(req.event_title.is_none());
    }

    #[test]
    fn event_tab_is_lowercase_on_the_wire() {
        let tab: EventTab = serde_json::from_str("\"popular\"").unwrap();
        assert_eq!(tab, EventTab::Popular);
    }
}
