use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        // User references carry no ON DELETE action: deleting a user who
        // still has wishlist or notification rows fails.
        conn.execute_batch(
            "
            BEGIN;

            CREATE TABLE users (
                username    TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                password    TEXT NOT NULL,
                is_admin    INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE locations (
                location_name   TEXT PRIMARY KEY,
                city            TEXT NOT NULL,
                state           TEXT NOT NULL
            );

            CREATE TABLE events (
                event_title     TEXT PRIMARY KEY,
                event_url       TEXT NOT NULL,
                datetime_local  TEXT NOT NULL,
                location_name   TEXT NOT NULL REFERENCES locations(location_name) ON UPDATE CASCADE,
                promoter_name   TEXT NOT NULL
            );

            CREATE INDEX idx_events_location ON events(location_name);

            CREATE TABLE tickets (
                ticket_id       TEXT PRIMARY KEY,
                event_title     TEXT NOT NULL
                    REFERENCES events(event_title) ON DELETE CASCADE ON UPDATE CASCADE,
                ticket_price    REAL NOT NULL,
                fee             REAL NOT NULL,
                total_price     REAL NOT NULL,
                quantity        INTEGER NOT NULL,
                full_section    TEXT NOT NULL,
                section         TEXT NOT NULL,
                row_num         TEXT NOT NULL
            );

            CREATE INDEX idx_tickets_event ON tickets(event_title);

            CREATE TABLE wishlist (
                username        TEXT NOT NULL REFERENCES users(username) ON UPDATE CASCADE,
                event_title     TEXT NOT NULL
                    REFERENCES events(event_title) ON DELETE CASCADE ON UPDATE CASCADE,
                wishlist_date   TEXT NOT NULL,
                PRIMARY KEY (username, event_title)
            );

            CREATE INDEX idx_wishlist_event ON wishlist(event_title);

            -- event_title is not a foreign key: cancellation notices outlive the event
            CREATE TABLE notifications (
                notification_id INTEGER PRIMARY KEY AUTOINCREMENT,
                username        TEXT NOT NULL REFERENCES users(username) ON UPDATE CASCADE,
                event_title     TEXT NOT NULL,
                message         TEXT NOT NULL,
                is_read         INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_notifications_unread ON notifications(username, is_read);

            INSERT INTO schema_version (version) VALUES (1);

            COMMIT;
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
