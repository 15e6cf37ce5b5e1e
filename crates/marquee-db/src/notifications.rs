//! Notification generation and delivery.
//!
//! Messages are rendered by SQL at the moment of the triggering action, from
//! whatever the related tables hold inside the caller's transaction. They are
//! never re-rendered afterwards.

use marquee_types::api::{Session, UnreadNotification};
use marquee_types::models::Notification;
use rusqlite::{Connection, OptionalExtension};

use crate::{Database, DbError, IsolationLevel, Result};

/// Notice for the acting user after a wishlist upsert. The wishlister count
/// is read after the upsert, so it always includes the actor.
const WISHLIST_ADDED_SQL: &str = "
    INSERT INTO notifications (username, event_title, message)
    SELECT ?1,
           e.event_title,
           'You have added \"' || e.event_title || '\" to your wishlist at '
               || e.location_name || ' (' || l.city || ', ' || l.state || '). '
               || 'Promoted by ' || e.promoter_name || '. '
               || 'Currently, ' || COUNT(DISTINCT w.username)
               || ' user(s) have wishlisted this event, including you.'
    FROM events e
    JOIN locations l ON e.location_name = l.location_name
    LEFT JOIN wishlist w ON e.event_title = w.event_title
    WHERE e.event_title = ?2
    GROUP BY e.event_title, e.location_name, l.city, l.state, e.promoter_name
    RETURNING notification_id, username, event_title, message, is_read, created_at";

/// One notice per wishlister of the cancelled event, in a single statement so
/// every recipient sees the same per-city count. Cities with no other events
/// still get a notice reporting 0.
const EVENT_CANCELLED_SQL: &str = "
    INSERT INTO notifications (username, event_title, message)
    SELECT w.username,
           e.event_title,
           'The event \"' || e.event_title || '\" at ' || l.location_name
               || ' (' || l.city || ', ' || l.state || ') has been cancelled. '
               || 'There are ' || COALESCE(other_events.event_count, 0)
               || ' other events happening in ' || l.city || '. Check them out!'
    FROM wishlist w
    JOIN events e ON w.event_title = e.event_title
    JOIN locations l ON e.location_name = l.location_name
    LEFT JOIN (
        SELECT l2.city AS city, COUNT(*) AS event_count
        FROM events e2
        JOIN locations l2 ON e2.location_name = l2.location_name
        WHERE e2.event_title != ?1
        GROUP BY l2.city
    ) other_events ON l.city = other_events.city
    WHERE e.event_title = ?1";

/// Insert the wishlist-add notice for `username`. Must run in the same
/// transaction as, and after, the wishlist upsert.
pub(crate) fn notify_wishlist_added(
    conn: &Connection,
    username: &str,
    event_title: &str,
) -> Result<Notification> {
    conn.query_row(WISHLIST_ADDED_SQL, (username, event_title), |row| {
        Ok(Notification {
            notification_id: row.get(0)?,
            username: row.get(1)?,
            event_title: row.get(2)?,
            message: row.get(3)?,
            is_read: row.get(4)?,
            created_at: row.get(5)?,
        })
    })
    .optional()?
    .ok_or_else(|| DbError::NotFound(format!("Event not found: {}", event_title)))
}

/// Fan out cancellation notices. Returns the number of rows inserted; zero
/// wishlisters is not an error.
pub(crate) fn notify_event_cancelled(conn: &Connection, event_title: &str) -> Result<usize> {
    Ok(conn.execute(EVENT_CANCELLED_SQL, [event_title])?)
}

impl Database {
    /// Return the session user's unread notifications and mark exactly those
    /// rows read, atomically.
    pub fn take_unread_notifications(&self, session: &Session) -> Result<Vec<UnreadNotification>> {
        self.transaction(IsolationLevel::RepeatableRead, |tx| {
            let mut stmt = tx.prepare(
                "SELECT notification_id, message
                 FROM notifications
                 WHERE username = ?1 AND is_read = 0
                 ORDER BY notification_id",
            )?;
            let unread = stmt
                .query_map([&session.username], |row| {
                    Ok(UnreadNotification {
                        notification_id: row.get(0)?,
                        message: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            if let Some(last) = unread.last() {
                tx.execute(
                    "UPDATE notifications SET is_read = 1
                     WHERE username = ?1 AND is_read = 0 AND notification_id <= ?2",
                    (&session.username, last.notification_id),
                )?;
            }

            Ok(unread)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{add_event, add_location, add_user, count, fixture, session};

    #[test]
    fn unread_notifications_are_delivered_once() {
        let fx = fixture();
        add_user(&fx.db, "ana");
        add_location(&fx.db, "Moody Center", "Austin", "TX");
        add_event(&fx.db, "Jazz Night", "Moody Center");
        add_event(&fx.db, "Rock Fest", "Moody Center");
        fx.db.add_to_wishlist(&session("ana"), "Jazz Night").unwrap();
        fx.db.add_to_wishlist(&session("ana"), "Rock Fest").unwrap();

        let first = fx.db.take_unread_notifications(&session("ana")).unwrap();
        assert_eq!(first.len(), 2);
        assert!(first[0].message.contains("Jazz Night"));
        assert!(first[0].notification_id < first[1].notification_id);

        let second = fx.db.take_unread_notifications(&session("ana")).unwrap();
        assert!(second.is_empty());
        assert_eq!(
            count(&fx.db, "SELECT COUNT(*) FROM notifications WHERE is_read = 1"),
            2
        );
    }

    #[test]
    fn reading_leaves_other_users_untouched() {
        let fx = fixture();
        add_user(&fx.db, "ana");
        add_user(&fx.db, "bo");
        add_location(&fx.db, "Moody Center", "Austin", "TX");
        add_event(&fx.db, "Jazz Night", "Moody Center");
        fx.db.add_to_wishlist(&session("ana"), "Jazz Night").unwrap();
        fx.db.add_to_wishlist(&session("bo"), "Jazz Night").unwrap();

        fx.db.take_unread_notifications(&session("ana")).unwrap();
        let bo = fx.db.take_unread_notifications(&session("bo")).unwrap();
        assert_eq!(bo.len(), 1);
        assert!(bo[0].message.contains("Currently, 2 user(s)"));
    }
}
