use std::{net::SocketAddr, sync::Arc};

use club_persistence::{Database, config::database_url_from_env};
use club_server_api::JwtSessionService;
use club_server_domain::app::construct_app;
use log::{error, info};

mod logs;

const DEFAULT_HOST: &str = "127.0.0.1";

const DEFAULT_PORT: u16 = 5000;

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received. Preparing graceful exit...");
}

fn listen_addr() -> Result<SocketAddr, String> {
    let host = std::env::var("CLUB_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = match std::env::var("CLUB_PORT") {
        Ok(port) => port
            .parse::<u16>()
            .map_err(|_| format!("CLUB_PORT must be a valid u16, got {}", port))?,
        Err(_) => DEFAULT_PORT,
    };
    format!("{}:{}", host, port)
        .parse()
        .map_err(|e| format!("Invalid listen address {}:{}: {}", host, port, e))
}

async fn run() -> Result<(), String> {
    let addr = listen_addr()?;

    let db = Database::connect(&database_url_from_env())
        .await
        .map_err(|e| format!("Failed to connect to database: {}", e))?;
    db.ensure_schema()
        .await
        .map_err(|e| format!("Failed to create tables: {}", e))?;

    let app = construct_app(
        db.repositories(),
        Arc::new(Box::new(JwtSessionService::from_env())),
    );

    info!("Starting application");
    club_server_api::serve(app, addr, shutdown_signal())
        .await
        .map_err(|e| format!("HTTP server failed: {}", e))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    if let Err(e) = logs::init_logger() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}
