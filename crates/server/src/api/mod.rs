use crate::config::{AppState, ServerConfig};
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use roster_core::storage::StoreError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

mod handlers;

/// Start the API server
pub async fn serve(addr: &str, config: ServerConfig) -> Result<()> {
    let state = AppState::new(&config)?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/employees",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/employees/",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route("/employees/{employee_id}", get(handlers::get_employee))
        // Middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let employees = state.store.count()?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "service": "roster",
        "version": env!("CARGO_PKG_VERSION"),
        "employees": employees,
    })))
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Error type for API handlers
#[derive(Debug)]
pub enum ApiError {
    /// Request body, query or path failed validation (422)
    Validation(String),
    /// Request conflicts with stored state (400)
    Conflict(String),
    /// Requested record does not exist (404)
    NotFound(String),
    /// Storage or other internal failure (500)
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, response) = match self {
            Self::Validation(message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, ErrorResponse::new(message))
            }
            Self::Conflict(message) => (StatusCode::BAD_REQUEST, ErrorResponse::new(message)),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, ErrorResponse::new(message)),
            Self::Internal(err) => {
                tracing::error!("Request failed: {:#}", err);

                let error_msg = err.to_string();
                let details = err
                    .chain()
                    .skip(1)
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(": ");

                let response = if details.is_empty() {
                    ErrorResponse::new(error_msg)
                } else {
                    ErrorResponse::with_details(error_msg, details)
                };
                (StatusCode::INTERNAL_SERVER_ERROR, response)
            }
        };

        (status, Json(response)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => Self::Conflict(err.to_string()),
            StoreError::Storage(err) => Self::Internal(err),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
