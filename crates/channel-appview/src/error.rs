use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use channel_engine::{EngineError, RateLimitScope};
use serde_json::json;

/// Application error type that converts to HTTP responses
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized,
    Engine(EngineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut retry_after = None;

        let (status, kind, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".into(),
            ),
            AppError::Engine(err) => {
                let kind = err.kind();
                match err {
                    EngineError::InvalidIdentifier(ref id) => {
                        tracing::debug!(identifier = %id, "Rejected channel identifier");
                        (StatusCode::BAD_REQUEST, kind, "Invalid channel identifier".into())
                    }
                    EngineError::ResolutionFailed(ref msg) => {
                        tracing::warn!(error = %msg, "Channel resolution failed");
                        (StatusCode::BAD_REQUEST, kind, "Failed to resolve channel".into())
                    }
                    EngineError::RateLimited {
                        scope,
                        retry_after: wait,
                    } => {
                        retry_after = Some(wait.as_secs() + u64::from(wait.subsec_nanos() > 0));
                        let message = match scope {
                            RateLimitScope::Global => "Too many requests",
                            RateLimitScope::Vote => "Already voted on this channel recently",
                        };
                        (StatusCode::TOO_MANY_REQUESTS, kind, message.into())
                    }
                    EngineError::Unauthorized => (
                        StatusCode::UNAUTHORIZED,
                        kind,
                        "Authentication required".into(),
                    ),
                    EngineError::Forbidden => {
                        (StatusCode::FORBIDDEN, kind, "Not an administrator".into())
                    }
                    EngineError::Database(e) => {
                        tracing::error!(error = %e, "Database error");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            kind,
                            "Internal server error".into(),
                        )
                    }
                }
            }
        };

        let mut response =
            (status, axum::Json(json!({ "error": message, "kind": kind }))).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
        }
        response
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError::Engine(e)
    }
}
