use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use super::HealthResponse;
use crate::api::routes::AppState;
use crate::error::ResolveError;
use crate::resolver::{Envelope, Event};

/// Function-style invocation: `{ "body": <string|object> }` in, envelope out.
pub async fn invoke(State(state): State<Arc<AppState>>, payload: Bytes) -> Response {
    let event: Event = match serde_json::from_slice(&payload) {
        Ok(event) => event,
        Err(e) => return ResolveError::from(e).to_envelope().into_response(),
    };

    state.resolver.handle(&event).await.into_response()
}

/// The HTTP request body is the request itself.
pub async fn resolve(State(state): State<Arc<AppState>>, payload: Bytes) -> Response {
    let text = String::from_utf8_lossy(&payload);
    let body = if text.trim().is_empty() {
        Value::Null
    } else {
        Value::String(text.into_owned())
    };
    state.resolver.handle_body(&body).await.into_response()
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST);
        (status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
