//! HTTP API
//!
//! Serves the aggregated winter temperatures as JSON at `/api/temperature`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use std::future::Future;
use std::net::SocketAddr;
use tracing::{error, info};

use crate::aggregate::{AggregateError, Aggregator};
use crate::data::TemperaturePayload;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub aggregator: Aggregator,
}

/// Error response carrying a status code and a JSON `{error}` body
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    /// Catch-all for failures that are not the caller's fault
    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to process temperature data",
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<AggregateError> for ApiError {
    fn from(err: AggregateError) -> Self {
        match err {
            AggregateError::InvalidYearRange { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: "Invalid year range",
            },
            AggregateError::NoData => Self {
                status: StatusCode::NOT_FOUND,
                message: "No data available",
            },
            AggregateError::InvalidWinterTable => Self::internal(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

/// Builds the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/temperature", get(temperature))
        .with_state(state)
}

/// `GET /api/temperature`
pub async fn temperature(
    State(state): State<AppState>,
) -> Result<Json<TemperaturePayload>, ApiError> {
    let now = Local::now().naive_local();
    let aggregator = state.aggregator;
    run_guarded(async move { aggregator.payload(now).await })
        .await
        .map(Json)
}

/// Runs `work` on its own task and maps its outcome to an API result
///
/// A panic inside `work` becomes a 500 instead of dropping the connection.
pub async fn run_guarded<F, T>(work: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, AggregateError>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(work).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            error!(error = %e, "temperature request failed");
            Err(e.into())
        }
        Err(e) => {
            error!(error = %e, "temperature request aborted");
            Err(ApiError::internal())
        }
    }
}

/// Binds `addr` and serves until the process is stopped
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router(state)).await
}
