use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::error;

#[derive(Error, Debug)]
pub enum KwameError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("Handlebars error: {0}")]
    Handlebars(#[from] handlebars::RenderError),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "storage")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[cfg(feature = "storage")]
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("Storage is not configured")]
    StorageUnavailable,
}

pub type Result<T, E = KwameError> = std::result::Result<T, E>;

impl KwameError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Validation failures are reported in a 200 body, not via the status line.
            KwameError::Validation(_) => StatusCode::OK,
            KwameError::Conflict(_) => StatusCode::CONFLICT,
            KwameError::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for KwameError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        #[cfg(feature = "tracing")]
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_keep_ok_status() {
        let err = KwameError::Validation("missing field `email`".into());
        assert_eq!(err.status_code(), StatusCode::OK);
        assert_eq!(err.to_string(), "missing field `email`");
    }

    #[test]
    fn server_side_failures_map_to_5xx() {
        assert_eq!(KwameError::StorageUnavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            KwameError::Config("bad port".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(KwameError::Conflict("taken".into()).status_code(), StatusCode::CONFLICT);
    }
}
