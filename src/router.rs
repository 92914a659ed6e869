use std::net::TcpListener;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::client::{CompletionClient, CompletionOptions};
use crate::models::{ChatTurnRequest, UploadResponse, UploadedFileInfo};

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub struct RouterState {
  pub started_at: Instant,
  pub client: CompletionClient,
}

pub fn app(state: RouterState) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/api/chat", get(chat_status).post(chat))
    .route("/api/upload", get(upload_status).post(upload))
    .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
    .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
    .with_state(Arc::new(state))
}

pub async fn run_router(listener: TcpListener, state: RouterState) -> anyhow::Result<()> {
  listener.set_nonblocking(true)?;
  let listener = tokio::net::TcpListener::from_std(listener)?;
  axum::serve(listener, app(state)).await?;
  Ok(())
}

async fn health(State(state): State<Arc<RouterState>>) -> Json<serde_json::Value> {
  let uptime = state.started_at.elapsed().as_millis();
  Json(serde_json::json!({
    "status": "ok",
    "version": env!("CARGO_PKG_VERSION"),
    "uptime_ms": uptime
  }))
}

async fn chat_status() -> Json<serde_json::Value> {
  Json(serde_json::json!({ "message": "Chat API is running" }))
}

async fn chat(
  State(state): State<Arc<RouterState>>,
  body: Result<Json<ChatTurnRequest>, JsonRejection>,
) -> Response {
  let messages = match body {
    Ok(Json(req)) => req.messages,
    Err(JsonRejection::JsonDataError(_)) => {
      return error_response(StatusCode::BAD_REQUEST, "Messages array is required")
    }
    Err(rejection) => {
      error!(error = %rejection.body_text(), "unreadable chat request");
      return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process request");
    }
  };

  match state.client.chain_of_thought(&messages, &CompletionOptions::default()).await {
    Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
    Err(err) => {
      error!(error = %err, "error in chat route");
      error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process request")
    }
  }
}

async fn upload_status() -> Json<serde_json::Value> {
  Json(serde_json::json!({ "message": "File upload API is running" }))
}

async fn upload(request: Request) -> Response {
  let is_multipart = request
    .headers()
    .get(CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| v.contains("multipart/form-data"));
  if !is_multipart {
    return error_response(StatusCode::BAD_REQUEST, "Request must be multipart/form-data");
  }

  let files = match collect_files(request).await {
    Ok(files) => files,
    Err(err) => {
      error!(error = %err, "error in upload route");
      return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process file upload");
    }
  };
  if files.is_empty() {
    return error_response(StatusCode::BAD_REQUEST, "No files uploaded");
  }

  let body = UploadResponse {
    message: "Files uploaded successfully".to_string(),
    files,
  };
  (StatusCode::OK, Json(body)).into_response()
}

async fn collect_files(request: Request) -> anyhow::Result<Vec<UploadedFileInfo>> {
  let mut multipart = Multipart::from_request(request, &())
    .await
    .map_err(|rejection| anyhow::anyhow!(rejection.body_text()))?;

  let mut files = Vec::new();
  while let Some(field) = multipart.next_field().await? {
    if field.name() != Some("files") {
      continue;
    }
    let name = field.file_name().unwrap_or_default().to_string();
    let mime = field.content_type().unwrap_or_default().to_string();
    let size = field.bytes().await?.len() as u64;
    files.push(UploadedFileInfo { name, mime, size });
  }
  Ok(files)
}

fn error_response(status: StatusCode, message: &str) -> Response {
  let body = Json(serde_json::json!({ "error": message }));
  (status, body).into_response()
}
