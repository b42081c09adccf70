// Copyright 2026 UAF Calculator Contributors
// SPDX-License-Identifier: MIT

//! HTTP REST API for the result and attendance lookups.
//!
//! Every endpoint answers with the [`ApiResponse`] envelope. When a shared
//! secret is configured, lookups must carry a valid `X-Timestamp` /
//! `X-Hash` signature pair.

use crate::config::{default_allowed_origins, ServerConfig};
use crate::service::{ApiResponse, ResultService, ServiceError};
use crate::trust::{RequestSigner, SignatureError};
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

const X_TIMESTAMP: &str = "x-timestamp";
const X_HASH: &str = "x-hash";

/// State shared by every handler.
pub struct AppState {
    pub service: ResultService,
    pub signer: Option<RequestSigner>,
    pub allowed_origins: Vec<String>,
}

impl AppState {
    pub fn new(service: ResultService, server: &ServerConfig) -> Self {
        Self {
            service,
            signer: server.secret_key.as_deref().map(RequestSigner::new),
            allowed_origins: server.allowed_origins.clone(),
        }
    }

    /// Check the signature headers, if a secret is configured.
    fn authorize(&self, headers: &HeaderMap, registration: &str) -> Result<(), SignatureError> {
        let Some(signer) = &self.signer else {
            return Ok(());
        };
        let header_str = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
        };
        signer.verify(
            header_str(X_HASH),
            header_str(X_TIMESTAMP),
            registration,
            chrono::Utc::now().timestamp_millis(),
        )
    }
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route("/health", get(health))
        .route("/api/result", get(handle_result))
        .route("/api/attendance", get(handle_attendance))
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server on the given address.
pub async fn start(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins = if origins.is_empty() {
        default_allowed_origins()
    } else {
        origins.to_vec()
    };
    let allow_origin = AllowOrigin::list(
        origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok()),
    );

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(X_TIMESTAMP),
            HeaderName::from_static(X_HASH),
        ])
}

fn reply<T: Serialize>(status: StatusCode, body: ApiResponse<T>) -> Response {
    (status, Json(body)).into_response()
}

fn error_reply(status: StatusCode, message: impl Into<String>) -> Response {
    reply::<()>(status, ApiResponse::error(message))
}

fn status_for(e: ServiceError) -> StatusCode {
    match e {
        ServiceError::InvalidRegistration => StatusCode::BAD_REQUEST,
        ServiceError::ResultUnavailable | ServiceError::AttendanceUnavailable => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn outcome<T: Serialize>(result: Result<T, ServiceError>) -> Response {
    match result {
        Ok(data) => reply(StatusCode::OK, ApiResponse::success(data)),
        Err(e) => error_reply(status_for(e), e.to_string()),
    }
}

/// Pull the registration number and check the signature over it.
fn admit<'a>(
    state: &AppState,
    headers: &HeaderMap,
    params: &'a LookupParams,
) -> Result<&'a str, Response> {
    let registration = params
        .reg_number
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| {
            error_reply(StatusCode::BAD_REQUEST, "Registration number is required")
        })?;

    state.authorize(headers, registration).map_err(|e| {
        tracing::warn!(%registration, "rejected request: {e}");
        error_reply(StatusCode::UNAUTHORIZED, e.to_string())
    })?;

    Ok(registration)
}

// ── Handlers ────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct LookupParams {
    reg_number: Option<String>,
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_result(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<LookupParams>,
) -> Response {
    let registration = match admit(&state, &headers, &params) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    outcome(state.service.lookup_result(registration).await)
}

async fn handle_attendance(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<LookupParams>,
) -> Response {
    let registration = match admit(&state, &headers, &params) {
        Ok(r) => r,
        Err(resp) => return resp,
    };
    outcome(state.service.lookup_attendance(registration).await)
}
