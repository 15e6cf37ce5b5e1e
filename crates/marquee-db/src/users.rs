use marquee_types::models::User;
use rusqlite::{Connection, OptionalExtension};

use crate::models::UserRow;
use crate::{Database, Result};

impl Database {
    pub fn create_user(
        &self,
        username: &str,
        name: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, name, password, is_admin) VALUES (?1, ?2, ?3, ?4)",
                (username, name, password_hash, is_admin),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT username, name, is_admin FROM users ORDER BY username")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(User {
                        username: row.get(0)?,
                        name: row.get(1)?,
                        is_admin: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Rename/update a user. `None` keeps the stored password hash.
    /// Returns the number of rows updated.
    pub fn update_user(
        &self,
        old_username: &str,
        new_username: &str,
        name: &str,
        password_hash: Option<&str>,
        is_admin: bool,
    ) -> Result<usize> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE users
                 SET username = ?1, name = ?2, password = COALESCE(?3, password), is_admin = ?4
                 WHERE username = ?5",
                (new_username, name, password_hash, is_admin, old_username),
            )?;
            Ok(updated)
        })
    }

    /// Fails with a constraint violation while wishlist or notification rows
    /// still reference the user.
    pub fn delete_user(&self, username: &str) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM users WHERE username = ?1", [username])?))
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT username, name, password, is_admin FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                username: row.get(0)?,
                name: row.get(1)?,
                password: row.get(2)?,
                is_admin: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}
