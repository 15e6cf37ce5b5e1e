use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public view of a user. The password hash never leaves the DB layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub location_name: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_title: String,
    pub event_url: String,
    pub datetime_local: NaiveDateTime,
    pub location_name: String,
    pub promoter_name: String,
}

/// Event joined with its location's city, as shown on the browse pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventListing {
    pub event_title: String,
    pub datetime_local: NaiveDateTime,
    pub location_name: String,
    pub promoter_name: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularEvent {
    pub event_title: String,
    pub datetime_local: NaiveDateTime,
    pub location_name: String,
    pub promoter_name: String,
    pub city: String,
    pub wishlist_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
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

/// Seat block offered for an event, deduplicated across ticket listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatOffer {
    pub section: String,
    pub row_num: String,
    pub quantity: i64,
    pub total_price: f64,
}

/// One saved event on a user's wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub event_title: String,
    pub datetime_local: NaiveDateTime,
    pub location_name: String,
    pub promoter_name: String,
}

/// Notifications are rendered once when their triggering action runs and
/// are never rewritten afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub notification_id: i64,
    pub username: String,
    pub event_title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
