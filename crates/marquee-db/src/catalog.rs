use chrono::NaiveDateTime;
use marquee_types::api::{EventFilterQuery, EventTab};
use marquee_types::models::{Event, EventListing, Location, PopularEvent, SeatOffer, Ticket};
use rusqlite::types::Value;
use rusqlite::{Row, params_from_iter};

use crate::{Database, Result};

const BROWSE_LIMIT: u32 = 150;
const EVENT_RECORDS_LIMIT: u32 = 10;
const TICKET_RECORDS_LIMIT: u32 = 15;
const POPULAR_LIMIT: u32 = 10;
const MAJOR_CITY_COUNT: u32 = 5;

/// Cities ranked by number of scheduled events, as a subquery.
const MAJOR_CITIES_SQL: &str = "SELECT l3.city
     FROM events e3
     JOIN locations l3 ON e3.location_name = l3.location_name
     GROUP BY l3.city
     ORDER BY COUNT(*) DESC, l3.city
     LIMIT ?";

impl Database {
    // -- Locations --

    pub fn create_location(&self, location: &Location) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO locations (location_name, city, state) VALUES (?1, ?2, ?3)",
                (&location.location_name, &location.city, &location.state),
            )?;
            Ok(())
        })
    }

    // -- Events --

    pub fn create_event(&self, event: &Event) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO events (event_title, event_url, datetime_local, location_name, promoter_name)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (
                    &event.event_title,
                    &event.event_url,
                    event.datetime_local,
                    &event.location_name,
                    &event.promoter_name,
                ),
            )?;
            Ok(())
        })
    }

    pub fn list_event_records(&self) -> Result<Vec<Event>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT event_title, event_url, datetime_local, location_name, promoter_name
                 FROM events
                 ORDER BY datetime_local, event_title
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([EVENT_RECORDS_LIMIT], |row| {
                    Ok(Event {
                        event_title: row.get(0)?,
                        event_url: row.get(1)?,
                        datetime_local: row.get(2)?,
                        location_name: row.get(3)?,
                        promoter_name: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Replace every column of the event titled `old_title`. Wishlist and
    /// ticket rows follow a title change.
    pub fn update_event(&self, old_title: &str, event: &Event) -> Result<usize> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE events
                 SET event_title = ?1, event_url = ?2, datetime_local = ?3,
                     location_name = ?4, promoter_name = ?5
                 WHERE event_title = ?6",
                (
                    &event.event_title,
                    &event.event_url,
                    event.datetime_local,
                    &event.location_name,
                    &event.promoter_name,
                    old_title,
                ),
            )?;
            Ok(updated)
        })
    }

    pub fn list_events(&self) -> Result<Vec<EventListing>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT e.event_title, e.datetime_local, e.location_name, e.promoter_name, l.city
                 FROM events e
                 JOIN locations l ON e.location_name = l.location_name
                 ORDER BY e.datetime_local, e.event_title
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([BROWSE_LIMIT], listing_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Most-wishlisted events first.
    pub fn popular_events(&self) -> Result<Vec<PopularEvent>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT e.event_title, e.datetime_local, e.location_name, e.promoter_name, l.city,
                        COUNT(w.username) AS wishlist_count
                 FROM events e
                 JOIN locations l ON e.location_name = l.location_name
                 LEFT JOIN wishlist w ON e.event_title = w.event_title
                 GROUP BY e.event_title
                 ORDER BY wishlist_count DESC, e.event_title
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([POPULAR_LIMIT], |row| {
                    Ok(PopularEvent {
                        event_title: row.get(0)?,
                        datetime_local: row.get(1)?,
                        location_name: row.get(2)?,
                        promoter_name: row.get(3)?,
                        city: row.get(4)?,
                        wishlist_count: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Events in the cities hosting the most events.
    pub fn top_city_events(&self, limit: u32) -> Result<Vec<EventListing>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT e.event_title, e.datetime_local, e.location_name, e.promoter_name, l.city
                 FROM events e
                 JOIN locations l ON e.location_name = l.location_name
                 WHERE l.city IN ({MAJOR_CITIES_SQL})
                 ORDER BY e.datetime_local, e.event_title
                 LIMIT ?"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([MAJOR_CITY_COUNT, limit], listing_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn filter_events(&self, filter: &EventFilterQuery) -> Result<Vec<EventListing>> {
        if filter.tab == EventTab::Popular {
            let needle = filter.query.to_lowercase();
            let events = self
                .popular_events()?
                .into_iter()
                .filter(|e| {
                    let when = date_key(&e.datetime_local);
                    (filter.city == "all" || e.city == filter.city)
                        && (filter.start_date.is_empty() || when >= filter.start_date)
                        && (filter.end_date.is_empty() || when <= filter.end_date)
                        && e.event_title.to_lowercase().contains(&needle)
                })
                .map(|e| EventListing {
                    event_title: e.event_title,
                    datetime_local: e.datetime_local,
                    location_name: e.location_name,
                    promoter_name: e.promoter_name,
                    city: e.city,
                })
                .collect();
            return Ok(events);
        }

        let mut sql = String::from(
            "SELECT e.event_title, e.datetime_local, e.location_name, e.promoter_name, l.city
             FROM events e
             JOIN locations l ON e.location_name = l.location_name
             WHERE LOWER(e.event_title) LIKE ?",
        );
        let mut params: Vec<Value> = vec![Value::Text(format!("%{}%", filter.query.to_lowercase()))];

        if filter.city != "all" {
            sql.push_str(" AND l.city = ?");
            params.push(Value::Text(filter.city.clone()));
        }
        if !filter.start_date.is_empty() {
            sql.push_str(" AND e.datetime_local >= ?");
            params.push(Value::Text(filter.start_date.clone()));
        }
        if !filter.end_date.is_empty() {
            sql.push_str(" AND e.datetime_local <= ?");
            params.push(Value::Text(filter.end_date.clone()));
        }
        if filter.tab == EventTab::Major {
            sql.push_str(&format!(" AND l.city IN ({MAJOR_CITIES_SQL})"));
            params.push(Value::Integer(MAJOR_CITY_COUNT.into()));
        }
        sql.push_str(" ORDER BY e.datetime_local, e.event_title LIMIT ?");
        params.push(Value::Integer(BROWSE_LIMIT.into()));

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(params), listing_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Tickets --

    pub fn create_ticket(&self, ticket: &Ticket) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tickets (ticket_id, event_title, ticket_price, fee, total_price,
                                      quantity, full_section, section, row_num)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                (
                    &ticket.ticket_id,
                    &ticket.event_title,
                    ticket.ticket_price,
                    ticket.fee,
                    ticket.total_price,
                    ticket.quantity,
                    &ticket.full_section,
                    &ticket.section,
                    &ticket.row_num,
                ),
            )?;
            Ok(())
        })
    }

    pub fn list_ticket_records(&self) -> Result<Vec<Ticket>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT ticket_id, event_title, ticket_price, fee, total_price,
                        quantity, full_section, section, row_num
                 FROM tickets
                 ORDER BY ticket_id
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([TICKET_RECORDS_LIMIT], |row| {
                    Ok(Ticket {
                        ticket_id: row.get(0)?,
                        event_title: row.get(1)?,
                        ticket_price: row.get(2)?,
                        fee: row.get(3)?,
                        total_price: row.get(4)?,
                        quantity: row.get(5)?,
                        full_section: row.get(6)?,
                        section: row.get(7)?,
                        row_num: row.get(8)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_ticket(&self, ticket_id: &str, ticket: &Ticket) -> Result<usize> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE tickets
                 SET event_title = ?1, ticket_price = ?2, fee = ?3, total_price = ?4,
                     quantity = ?5, full_section = ?6, section = ?7, row_num = ?8
                 WHERE ticket_id = ?9",
                (
                    &ticket.event_title,
                    ticket.ticket_price,
                    ticket.fee,
                    ticket.total_price,
                    ticket.quantity,
                    &ticket.full_section,
                    &ticket.section,
                    &ticket.row_num,
                    ticket_id,
                ),
            )?;
            Ok(updated)
        })
    }

    pub fn delete_ticket(&self, ticket_id: &str) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute("DELETE FROM tickets WHERE ticket_id = ?1", [ticket_id])?)
        })
    }

    pub fn seats_for_event(&self, event_title: &str) -> Result<Vec<SeatOffer>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT section, row_num, quantity, total_price
                 FROM tickets
                 WHERE event_title = ?1
                 ORDER BY section, row_num",
            )?;
            let rows = stmt
                .query_map([event_title], |row| {
                    Ok(SeatOffer {
                        section: row.get(0)?,
                        row_num: row.get(1)?,
                        quantity: row.get(2)?,
                        total_price: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<EventListing> {
    Ok(EventListing {
        event_title: row.get(0)?,
        datetime_local: row.get(1)?,
        location_name: row.get(2)?,
        promoter_name: row.get(3)?,
        city: row.get(4)?,
    })
}

/// Same text form the column is stored in, so string bounds compare alike
/// in SQL and in memory.
fn date_key(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
