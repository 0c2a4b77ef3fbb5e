// API Errors
// Every failure leaves the service as {"error": "<mensaje>"} with a status code

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::UnknownLevelError;
use crate::services::ExtractionError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No se seleccionó ningún archivo")]
    MissingFile,

    #[error("Por favor selecciona un nivel educativo")]
    MissingLevel,

    #[error(transparent)]
    UnknownLevel(#[from] UnknownLevelError),

    #[error("Tipo de archivo no permitido. Use .txt, .docx, .pdf, .jpg, .png")]
    UnsupportedFileType,

    #[error("Archivo demasiado grande. Máximo {max_mb}MB")]
    FileTooLarge { max_mb: u64 },

    #[error("Formulario inválido: {0}")]
    MalformedMultipart(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile
            | ApiError::MissingLevel
            | ApiError::UnknownLevel(_)
            | ApiError::UnsupportedFileType
            | ApiError::MalformedMultipart(_) => StatusCode::BAD_REQUEST,
            ApiError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Extraction(ExtractionError::UnsupportedFormat(_)) => StatusCode::BAD_REQUEST,
            ApiError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(e) => {
                tracing::error!("[API] internal error: {}", e);
                "Error interno del servidor".to_string()
            }
            other => {
                tracing::warn!(status = status.as_u16(), "[API] request rejected: {}", other);
                other.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
