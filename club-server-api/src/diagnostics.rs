use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use club_server_domain::app::AppState;
use log::error;
use serde_json::json;

use crate::{pages, session::Session};

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

pub async fn index(Session(ctx): Session, headers: HeaderMap) -> Response {
    if wants_json(&headers) {
        return Json(json!({ "message": "Welcome to Basketball Club API" })).into_response();
    }
    pages::landing_page(ctx.user()).into_response()
}

pub async fn test_db(State(app): State<AppState>) -> Response {
    match app.storage_probe.probe().await {
        Ok(()) => Json(json!({
            "status": "success",
            "message": "Database connection successful",
            "database_url": app.storage_probe.describe(),
        }))
        .into_response(),
        Err(e) => {
            error!("Database probe failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn api_test() -> Json<serde_json::Value> {
    Json(json!({ "status": "success", "message": "API is working!" }))
}
