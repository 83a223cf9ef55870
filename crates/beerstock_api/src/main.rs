//! Beer stock HTTP server entry point.

use beerstock_api::config::{DatabaseLocation, ServerConfig};
use beerstock_api::{build_app, AppState};
use beerstock_core::db::{open_db, open_db_in_memory};
use beerstock_core::init_logging;
use log::{info, warn};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = match &config.database {
        DatabaseLocation::File(path) => open_db(path)?,
        DatabaseLocation::InMemory => {
            warn!("event=server_start module=api status=warning reason=in_memory_database");
            open_db_in_memory()?
        }
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(
        "event=server_start module=api status=ok addr={}",
        listener.local_addr()?
    );

    axum::serve(listener, build_app(AppState::new(conn)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        // Without a signal handler the server runs until killed.
        warn!("event=shutdown_signal module=api status=error error={err}");
        std::future::pending::<()>().await;
    }
}
