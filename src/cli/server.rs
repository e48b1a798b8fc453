//! HTTP server mode for REST API access to the connector

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapter::{Adapter, AdapterError, AdapterPage, AdapterRequest, ErrorCode};
use crate::error::{Error, Result};

/// App state shared across handlers
#[derive(Clone)]
struct AppState {
    adapter: Adapter,
}

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<AdapterError>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(error: AdapterError) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Build the router
pub fn router(adapter: Adapter) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/page", post(get_page))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState { adapter }))
}

/// Start the HTTP server, stopping on Ctrl-C
pub async fn serve(adapter: Adapter, port: u16) -> Result<()> {
    let app = router(adapter);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received, stopping server");
            }
        })
        .await
        .map_err(|e| Error::Other(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

/// Fetch one page
///
/// If the client disconnects, axum drops this future and the outbound
/// request with it.
async fn get_page(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdapterRequest>,
) -> Response {
    match state.adapter.get_page(&request).await {
        Ok(page) => (StatusCode::OK, Json(ApiResponse::<AdapterPage>::success(page))).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AdapterError) -> Response {
    let status = match err.code {
        ErrorCode::InvalidDatasourceConfig
        | ErrorCode::InvalidEntityConfig
        | ErrorCode::InvalidPageRequestConfig => StatusCode::BAD_REQUEST,
        ErrorCode::DatasourceAuthenticationFailed => StatusCode::UNAUTHORIZED,
        ErrorCode::DatasourceRateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::DatasourceFailed => StatusCode::BAD_GATEWAY,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let retry_after = err
        .retry_after
        .as_deref()
        .and_then(|value| HeaderValue::from_str(value).ok());

    let mut response = (status, Json(ApiResponse::<()>::error(err))).into_response();
    if let Some(value) = retry_after {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}
