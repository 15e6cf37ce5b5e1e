pub mod auth;
pub mod error;
pub mod events;
pub mod middleware;
pub mod notifications;
pub mod router;
pub mod session;
pub mod state;
pub mod tickets;
pub mod users;
pub mod wishlist;

pub use router::router;
