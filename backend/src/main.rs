//! Backend entry-point: wires the REST endpoints, storage, and OpenAPI docs.

mod server;

use std::env;
use std::net::SocketAddr;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use server::ServerConfig;
use territories_backend::inbound::http::health::HealthState;
use territories_backend::outbound::persistence::{run_pending_migrations, DbPool, PoolConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let mut config = ServerConfig::new(bind_addr);
    match env::var("DATABASE_URL") {
        Ok(url) => {
            run_pending_migrations(&url)
                .map_err(|e| std::io::Error::other(format!("migration run failed: {e}")))?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;
            config = config.with_db_pool(pool);
            info!("using PostgreSQL persistence");
        }
        Err(_) => {
            warn!("DATABASE_URL not set; falling back to in-memory storage");
        }
    }

    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state, config)?;
    info!(%bind_addr, "server listening");
    server.await
}
