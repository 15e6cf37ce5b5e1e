use marquee_types::api::Session;
use marquee_types::models::WishlistItem;

use crate::models::WishlistAdded;
use crate::notifications::notify_wishlist_added;
use crate::{Database, DbError, IsolationLevel, Result};

/// Blank titles are rejected; anything else is bound exactly as given.
fn require_title(event_title: &str) -> Result<&str> {
    if event_title.trim().is_empty() {
        return Err(DbError::Validation("Event title is required".into()));
    }
    Ok(event_title)
}

impl Database {
    /// Save an event to the session user's wishlist and notify them.
    ///
    /// Re-adding an entry only refreshes its timestamp. The upsert and the
    /// notice commit together or not at all; an unknown event fails on the
    /// foreign key and leaves nothing behind.
    pub fn add_to_wishlist(&self, session: &Session, event_title: &str) -> Result<WishlistAdded> {
        let title = require_title(event_title)?;
        let now = chrono::Utc::now();

        self.transaction(IsolationLevel::RepeatableRead, |tx| {
            tx.execute(
                "INSERT INTO wishlist (username, event_title, wishlist_date)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT (username, event_title)
                 DO UPDATE SET wishlist_date = excluded.wishlist_date",
                (&session.username, title, now),
            )?;

            // Count is read after the upsert: the actor is always included.
            let notification = notify_wishlist_added(tx, &session.username, title)?;
            Ok(WishlistAdded { notification })
        })
    }

    /// Returns rows affected. Removing an entry that does not exist is a
    /// success with zero rows.
    pub fn remove_from_wishlist(&self, session: &Session, event_title: &str) -> Result<usize> {
        let title = require_title(event_title)?;
        self.with_conn(|conn| {
            Ok(conn.execute(
                "DELETE FROM wishlist WHERE username = ?1 AND event_title = ?2",
                (&session.username, title),
            )?)
        })
    }

    pub fn list_wishlist(&self, session: &Session) -> Result<Vec<WishlistItem>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT w.event_title, e.datetime_local, e.location_name, e.promoter_name
                 FROM wishlist w
                 JOIN events e ON w.event_title = e.event_title
                 WHERE w.username = ?1
                 ORDER BY w.wishlist_date DESC, w.event_title",
            )?;
            let rows = stmt
                .query_map([&session.username], |row| {
                    Ok(WishlistItem {
                        event_title: row.get(0)?,
                        datetime_local: row.get(1)?,
                        location_name: row.get(2)?,
                        promoter_name: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}
