use std::net::SocketAddr;

use axum::{Router, routing::get};
use club_server_domain::app::AppState;
use log::info;

pub mod adapter;
mod auth;
mod diagnostics;
pub mod error;
mod pages;
mod roster;
pub mod session;
mod stats;

pub use session::JwtSessionService;

pub fn router(app: AppState) -> Router {
    Router::new()
        .route("/", get(diagnostics::index))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/signup", get(auth::signup_form).post(auth::signup))
        .route("/register", get(auth::signup_form).post(auth::signup))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(roster::dashboard))
        .route(
            "/add_player",
            get(roster::add_player_form).post(roster::add_player),
        )
        .route(
            "/add_match_statistic",
            get(stats::add_match_statistic_form).post(stats::add_match_statistic),
        )
        .route("/team_statistics", get(stats::team_statistics))
        .route("/test-db", get(diagnostics::test_db))
        .route("/api/test", get(diagnostics::api_test))
        .route("/api/players", get(roster::players_json))
        .route("/api/team_statistics", get(stats::team_statistics_json))
        .with_state(app)
}

pub async fn serve(
    app: AppState,
    addr: SocketAddr,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Club server listening on {}", addr);
    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Club server shut down gracefully");
    Ok(())
}
