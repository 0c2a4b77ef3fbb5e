// HTTP handlers

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::Html,
    Json,
};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::models::{AnalysisResponse, EducationalLevel, ExtractedDocument, HealthResponse};
use crate::services::{extract_text, format_response, is_allowed_file, ExtractionError};

use super::error::ApiError;
use super::state::AppState;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Upload page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Liveness check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Servidor funcionando correctamente".to_string(),
    })
}

struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    level: Option<String>,
}

/// Analyze an uploaded document
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let multipart = multipart.map_err(|e| ApiError::MalformedMultipart(e.body_text()))?;
    let max_bytes = state.max_upload_bytes();
    let max_mb = state.config.server.max_upload_mb;

    let form = read_form(multipart, max_bytes, max_mb).await?;

    let (filename, data) = form.file.ok_or(ApiError::MissingFile)?;
    let level_code = form
        .level
        .filter(|l| !l.trim().is_empty())
        .ok_or(ApiError::MissingLevel)?;
    if !is_allowed_file(&filename) {
        return Err(ApiError::UnsupportedFileType);
    }
    let level: EducationalLevel = level_code.parse()?;

    let request_id = Uuid::new_v4();
    info!(%request_id, filename = %filename, bytes = data.len(), level = %level, "[API] analysis requested");

    let extract_name = filename.clone();
    let text = tokio::task::spawn_blocking(move || extract_text(&extract_name, &data))
        .await
        .map_err(|e| ExtractionError::Aborted(e.to_string()))??;

    let doc = ExtractedDocument::from_text(text);
    if doc.is_empty() {
        return Err(ExtractionError::EmptyText.into());
    }

    let verdict = state.detection.analyze(&doc, level).await.map_err(|e| {
        error!(%request_id, filename = %filename, "[API] analyzer contract violated: {}", e);
        ApiError::Internal(e.to_string())
    })?;

    info!(
        %request_id,
        filename = %filename,
        percentage = verdict.percentage(),
        with_ai = verdict.analyzed_with_ai(),
        "[API] analysis completed"
    );
    Ok(Json(format_response(&verdict, &filename, level)))
}

async fn read_form(mut multipart: Multipart, max_bytes: usize, max_mb: u64) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm { file: None, level: None };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_mb))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().map(sanitize_filename).unwrap_or_default();
                let data = read_limited(field, max_bytes, max_mb).await?;
                if !filename.is_empty() {
                    form.file = Some((filename, data));
                }
            }
            Some("nivel") => {
                let value = field.text().await.map_err(|e| multipart_error(e, max_mb))?;
                form.level = Some(value);
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_limited(mut field: Field<'_>, max_bytes: usize, max_mb: u64) -> Result<Vec<u8>, ApiError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, max_mb))? {
        if data.len() + chunk.len() > max_bytes {
            return Err(ApiError::FileTooLarge { max_mb });
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

fn multipart_error(err: MultipartError, max_mb: u64) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::FileTooLarge { max_mb }
    } else {
        ApiError::MalformedMultipart(err.body_text())
    }
}

/// Keep only the final path component of a client-supplied name
fn sanitize_filename(name: &str) -> String {
    name.rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}
