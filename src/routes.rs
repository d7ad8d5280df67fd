use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::services::ServeDir;

use crate::language::Language;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let system_config = &state.config.system_config;

    Router::new()
        // WebSocket
        .route("/client-ws", get(websocket_handler))

        // Health check
        .route("/api/health", get(health_check))

        // REST API routes
        .route("/api/languages", get(get_languages))
        .route("/api/download/:client_uid", get(download_translation))

        // Static frontend
        .fallback_service(ServeDir::new(&system_config.frontend_dir))
}

async fn websocket_handler(
    ws: axum::extract::ws::WebSocketUpgrade,
    State(state): State<AppState>,
) -> axum::response::Response {
    crate::websocket::websocket_handler(ws, State(state)).await
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "provider": state.config.translator_config.provider,
        "model": state.config.translator_config.model
    }))
}

async fn get_languages() -> Json<Value> {
    Json(Language::catalog())
}

/// Serve the current translation as a plain-text attachment named after the
/// selected target language.
async fn download_translation(
    State(state): State<AppState>,
    Path(client_uid): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let artifact = match state.sessions.get(&client_uid) {
        Some(session) => session.download_artifact(),
        None => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Unknown session"})),
            ))
        }
    };

    match artifact {
        Some(artifact) => Ok((
            [
                (
                    header::CONTENT_TYPE,
                    "text/plain; charset=utf-8".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.file_name),
                ),
            ],
            artifact.content,
        )),
        None => Err((
            StatusCode::CONFLICT,
            Json(json!({"error": "No translation available to download"})),
        )),
    }
}
