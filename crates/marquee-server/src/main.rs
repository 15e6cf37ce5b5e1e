mod config;

use std::net::SocketAddr;

use tracing::info;

use marquee_api::session::SessionStore;
use marquee_api::state::AppStateInner;
use marquee_db::Database;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "marquee=debug,marquee_api=debug,marquee_db=debug,tower_http=debug".into()
            }),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Init database
    let db = Database::open(&config.db_path, config.busy_timeout)?;

    if let Some((username, password)) = &config.bootstrap_admin {
        marquee_api::auth::bootstrap_admin(&db, username, password)?;
    }

    let sessions = SessionStore::new(config.jwt_secret.clone(), config.session_ttl);
    let app = marquee_api::router(AppStateInner::new(db, sessions));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Marquee server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
