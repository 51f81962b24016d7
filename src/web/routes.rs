use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AppState;
use crate::pipeline::{ErrorKind, GeneratedPost};

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(status))
        .route("/heartbeat", get(heartbeat))
        .route("/generate-post", post(generate_post))
}

/// Body of `GET /`: which credentials are configured, never their values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub service: String,
    pub version: String,
    pub newsdata_key: bool,
    pub openai_key: bool,
    pub synthesis_mode: String,
}

async fn status(State(state): State<AppState>) -> Json<ServiceStatus> {
    let config = &state.config;
    Json(ServiceStatus {
        status: "live".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        newsdata_key: config.has_news_key(),
        openai_key: config.has_openai_key(),
        synthesis_mode: config.synthesis_mode.as_str().to_string(),
    })
}

async fn heartbeat() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub topic: String,
}

async fn generate_post(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected generate-post body");
            let post = GeneratedPost::failed(
                "",
                ErrorKind::InvalidTopic,
                rejection.body_text(),
                None,
            );
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(post)).into_response();
        }
    };

    let post = state.pipeline.run(&request.topic).await;

    let code = match &post {
        GeneratedPost::Failed {
            error_kind: ErrorKind::InvalidTopic,
            ..
        } => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };

    (code, Json(post)).into_response()
}
