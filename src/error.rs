use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Failures a handler cannot turn into a flash message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),

    #[error("session token error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_hides_cause_from_client() {
        let err = AppError::from(anyhow::anyhow!("duplicate key value violates unique constraint"));
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn display_keeps_context_chain() {
        let err: AppError = anyhow::anyhow!("connection refused")
            .context("insert student")
            .into();
        let msg = err.to_string();
        assert!(msg.contains("insert student"));
        assert!(msg.contains("connection refused"));
    }
}
