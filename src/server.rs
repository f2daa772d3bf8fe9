//! HTTP API for deed analysis and question answering.
//!
//! # Endpoints
//!
//! | Method   | Path               | Description |
//! |----------|--------------------|-------------|
//! | `POST`   | `/analyze`         | Upload a deed (multipart `file`), get the full analysis |
//! | `POST`   | `/ask`             | Ask a question about an analyzed document |
//! | `GET`    | `/documents`       | List analyzed document ids |
//! | `DELETE` | `/documents/{id}`  | Drop a document (index + audio) |
//! | `GET`    | `/audio/{id}`      | Tamil summary MP3 for a document |
//! | `GET`    | `/health`          | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses carry the same JSON shape:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "file part missing" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404),
//! `collaborator_error` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser clients can
//! call the API directly.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::extract::ExtractError;
use crate::models::AnswerResult;
use crate::pipeline::{AnalysisReport, Pipeline};

/// Shared application state passed to all route handlers via Axum's `State`
/// extractor.
#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
}

/// Starts the HTTP server.
///
/// Binds to the address configured in `[server].bind` and runs until the
/// process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let pipeline = Arc::new(Pipeline::from_config(Arc::new(config.clone()))?);

    let app = router(AppState { pipeline });

    println!("deedscope listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/analyze", post(handle_analyze))
        .route("/ask", post(handle_ask))
        .route("/documents", get(handle_list_documents))
        .route("/documents/{id}", delete(handle_delete_document))
        .route("/audio/{id}", get(handle_audio))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn collaborator_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "collaborator_error".to_string(),
        message: message.into(),
    }
}

/// Maps pipeline failures onto the HTTP contract: extraction failures are the
/// client's fault, everything else is a collaborator failure. The pipeline
/// keeps [`ExtractError`] in the error chain so classification can downcast
/// instead of matching message text.
fn classify_pipeline_error(err: anyhow::Error) -> AppError {
    if err.downcast_ref::<ExtractError>().is_some() {
        bad_request(format!("{:#}", err))
    } else {
        collaborator_error(format!("{:#}", err))
    }
}

// ============ POST /analyze ============

/// Handler for `POST /analyze`.
///
/// Expects a multipart body with a `file` part carrying the deed (PDF or
/// plain text). Returns the full [`AnalysisReport`].
async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let mut upload: Option<(Vec<u8>, String, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("malformed multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let content_type = field.content_type().unwrap_or_default().to_string();
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("failed to read file part: {}", e)))?;
            upload = Some((bytes.to_vec(), content_type, filename));
            break;
        }
    }

    let (bytes, content_type, filename) =
        upload.ok_or_else(|| bad_request("multipart body must contain a 'file' part"))?;

    let report = state
        .pipeline
        .analyze(&bytes, &content_type, &filename)
        .await
        .map_err(classify_pipeline_error)?;

    Ok(Json(report))
}

// ============ POST /ask ============

/// JSON request body for `POST /ask`.
#[derive(Deserialize)]
struct AskRequest {
    document_id: String,
    question: String,
}

/// Handler for `POST /ask`.
async fn handle_ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AnswerResult>, AppError> {
    if req.question.trim().is_empty() {
        return Err(bad_request("question must not be empty"));
    }
    if req.document_id.trim().is_empty() {
        return Err(bad_request("document_id must not be empty"));
    }

    let result = state
        .pipeline
        .answer(&req.document_id, &req.question)
        .await
        .map_err(|e| collaborator_error(e.to_string()))?;

    match result {
        Some(answer) => Ok(Json(answer)),
        None => Err(not_found("Document not found")),
    }
}

// ============ GET /documents ============

/// JSON response body for `GET /documents`.
#[derive(Serialize)]
struct DocumentListResponse {
    documents: Vec<String>,
    count: usize,
}

/// Handler for `GET /documents`.
async fn handle_list_documents(
    State(state): State<AppState>,
) -> Result<Json<DocumentListResponse>, AppError> {
    let documents = state
        .pipeline
        .list_documents()
        .await
        .map_err(|e| collaborator_error(e.to_string()))?;
    let count = documents.len();
    Ok(Json(DocumentListResponse { documents, count }))
}

// ============ DELETE /documents/{id} ============

/// JSON response body for `DELETE /documents/{id}`.
#[derive(Serialize)]
struct DeleteResponse {
    deleted: bool,
    document_id: String,
}

/// Handler for `DELETE /documents/{id}`.
async fn handle_delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = state
        .pipeline
        .delete_document(&id)
        .await
        .map_err(|e| collaborator_error(e.to_string()))?;
    if !deleted {
        return Err(not_found("Document not found"));
    }
    Ok(Json(DeleteResponse {
        deleted: true,
        document_id: id,
    }))
}

// ============ GET /audio/{id} ============

/// Handler for `GET /audio/{id}`.
///
/// Streams the Tamil summary MP3 stored at analyze time.
async fn handle_audio(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let clip = state
        .pipeline
        .audio_clip(&id)
        .await
        .ok_or_else(|| not_found("Audio not found"))?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "audio/mpeg")],
        clip.as_ref().clone(),
    )
        .into_response())
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_failure_maps_to_bad_request() {
        let err = anyhow::Error::new(ExtractError::EmptyDocument).context("invalid document");
        let app = classify_pipeline_error(err);
        assert_eq!(app.status, StatusCode::BAD_REQUEST);
        assert_eq!(app.code, "bad_request");
        assert!(app.message.contains("no extractable text"));
    }

    #[test]
    fn test_unclassified_failure_maps_to_collaborator_error() {
        let app = classify_pipeline_error(anyhow::anyhow!("embedding backend timed out"));
        assert_eq!(app.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app.code, "collaborator_error");
    }
}
