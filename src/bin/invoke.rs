use std::{
    io::{Read, Write},
    sync::Arc,
};

use club_persistence::{Database, config::database_url_from_env};
use club_server_api::{
    JwtSessionService,
    adapter::{InboundRequest, dispatch},
    router,
};
use club_server_domain::app::construct_app;

/// Reads one JSON request from stdin, runs it through the app and writes the
/// JSON response to stdout.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("Failed to read request: {}", e);
        std::process::exit(1);
    }
    let inbound: InboundRequest = match serde_json::from_str(&input) {
        Ok(inbound) => inbound,
        Err(e) => {
            eprintln!("Invalid request JSON: {}", e);
            std::process::exit(1);
        }
    };

    let db = match Database::connect(&database_url_from_env()).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = db.ensure_schema().await {
        eprintln!("Failed to create tables: {}", e);
        std::process::exit(1);
    }

    let app = construct_app(
        db.repositories(),
        Arc::new(Box::new(JwtSessionService::from_env())),
    );
    let outbound = dispatch(router(app), inbound).await;

    let output = match serde_json::to_string(&outbound) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Failed to encode response: {}", e);
            std::process::exit(1);
        }
    };
    let mut stdout = std::io::stdout();
    if let Err(e) = writeln!(stdout, "{}", output) {
        eprintln!("Failed to write response: {}", e);
        std::process::exit(1);
    }
}
