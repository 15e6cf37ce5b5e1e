//! Database row types that carry columns the API models must not expose.

pub struct UserRow {
    pub username: String,
    pub name: String,
    pub password: String,
    pub is_admin: bool,
}

/// Result of a successful wishlist add.
#[derive(Debug)]
pub struct WishlistAdded {
    pub notification: marquee_types::models::Notification,
}

/// Result of a committed event cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelledEvent {
    pub notifications_sent: usize,
}
