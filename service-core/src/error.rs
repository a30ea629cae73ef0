use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Aucune donnée fournie")]
    MissingBody,

    #[error("Invalid payload: {0}")]
    InvalidPayload(anyhow::Error),

    #[error("{0}")]
    TemplateOpen(anyhow::Error),

    #[error("{0}")]
    CellIndex(anyhow::Error),

    #[error("{0}")]
    DocumentSave(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Stable kind name surfaced to clients in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MissingBody => "MissingBody",
            AppError::InvalidPayload(_) => "InvalidPayload",
            AppError::TemplateOpen(_) => "TemplateOpenError",
            AppError::CellIndex(_) => "CellIndexError",
            AppError::DocumentSave(_) => "DocumentSaveError",
            AppError::ConfigError(_) => "ConfigError",
            AppError::InternalError(_) => "InternalError",
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
            kind: Option<&'static str>,
        }

        let (status, kind) = match &self {
            // The 400 body carries no kind, only the literal French message.
            AppError::MissingBody => (StatusCode::BAD_REQUEST, None),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, Some(self.kind())),
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
                kind,
            }),
        )
            .into_response()
    }
}
