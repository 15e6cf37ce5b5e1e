use tracing::info;

use crate::models::CancelledEvent;
use crate::notifications::notify_event_cancelled;
use crate::{Database, DbError, IsolationLevel, Result};

impl Database {
    /// Cancel an event: notify every wishlister, then delete the event row.
    ///
    /// Both statements commit together. Any failure rolls the pair back and
    /// is reported as [`DbError::OperationFailed`]. An unknown title deletes
    /// nothing and is reported as [`DbError::NotFound`] after rollback.
    pub fn cancel_event(&self, event_title: &str) -> Result<CancelledEvent> {
        let outcome = self.transaction(IsolationLevel::RepeatableRead, |tx| {
            let notifications_sent = notify_event_cancelled(tx, event_title)?;

            let deleted = tx.execute("DELETE FROM events WHERE event_title = ?1", [event_title])?;
            if deleted == 0 {
                return Err(DbError::NotFound(format!("Event not found: {}", event_title)));
            }

            Ok(CancelledEvent { notifications_sent })
        });

        match outcome {
            Ok(cancelled) => {
                info!(
                    event_title,
                    notifications = cancelled.notifications_sent,
                    "event cancelled"
                );
                Ok(cancelled)
            }
            Err(e @ DbError::NotFound(_)) => Err(e),
            Err(e) => Err(DbError::operation_failed("cancel event", e)),
        }
    }
}
