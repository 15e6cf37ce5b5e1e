use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::TimeDelta;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

/// Server configuration loaded from environment variables.
///
/// | Env Var                     | Default      |
/// |-----------------------------|--------------|
/// | `MARQUEE_HOST`              | `0.0.0.0`    |
/// | `MARQUEE_PORT`              | `3000`       |
/// | `MARQUEE_DB_PATH`           | `marquee.db` |
/// | `MARQUEE_BUSY_TIMEOUT_MS`   | `5000`       |
/// | `MARQUEE_JWT_SECRET`        | required     |
/// | `MARQUEE_SESSION_TTL_HOURS` | `24`         |
/// | `MARQUEE_ADMIN_USERNAME`    | unset        |
/// | `MARQUEE_ADMIN_PASSWORD`    | unset        |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// How long a statement waits on a held lock before failing with a
    /// retryable lock-timeout error.
    pub busy_timeout: Duration,
    pub jwt_secret: String,
    pub session_ttl: TimeDelta,
    /// Admin account created at startup when both are set and the user does
    /// not exist yet.
    pub bootstrap_admin: Option<(String, String)>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = std::env::var("MARQUEE_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("MARQUEE_JWT_SECRET is unset or still a placeholder");
        }

        let host = std::env::var("MARQUEE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("MARQUEE_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .context("MARQUEE_PORT must be a valid u16")?;
        let db_path: PathBuf = std::env::var("MARQUEE_DB_PATH")
            .unwrap_or_else(|_| "marquee.db".into())
            .into();
        let busy_timeout_ms: u64 = std::env::var("MARQUEE_BUSY_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .context("MARQUEE_BUSY_TIMEOUT_MS must be a valid u64")?;
        let session_ttl_hours: i64 = std::env::var("MARQUEE_SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse()
            .context("MARQUEE_SESSION_TTL_HOURS must be a valid i64")?;
        let session_ttl = session_ttl(session_ttl_hours)?;

        let bootstrap_admin = match (
            std::env::var("MARQUEE_ADMIN_USERNAME"),
            std::env::var("MARQUEE_ADMIN_PASSWORD"),
        ) {
            (Ok(user), Ok(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            db_path,
            busy_timeout: Duration::from_millis(busy_timeout_ms),
            jwt_secret,
            session_ttl,
            bootstrap_admin,
        })
    }
}

fn session_ttl(hours: i64) -> Result<TimeDelta> {
    if hours <= 0 {
        bail!("MARQUEE_SESSION_TTL_HOURS must be positive, got {hours}");
    }
    TimeDelta::try_hours(hours)
        .with_context(|| format!("MARQUEE_SESSION_TTL_HOURS out of range: {hours}"))
}
