//! HTTP route tests driven through `tower::ServiceExt::oneshot`

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use detector_ia_lib::api::{router, AppState};
use detector_ia_lib::models::AnalysisResponse;
use detector_ia_lib::services::AppConfig;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "detector-ia-test-boundary";

const ESSAY: &str = "La inteligencia artificial es una herramienta. La inteligencia artificial es útil. \
                     La inteligencia artificial ayuda. La inteligencia artificial cambia la sociedad.";

fn app_with(config: AppConfig) -> Router {
    router(Arc::new(AppState::new(config)))
}

fn app() -> Router {
    app_with(AppConfig::default())
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a [u8]),
}

fn multipart_request(parts: &[Part<'_>]) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n", name, value).as_bytes(),
                );
            }
            Part::File(filename, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/analizar")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_reports_running() {
    let response = app()
        .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["message"], "Servidor funcionando correctamente");
}

#[tokio::test]
async fn index_serves_upload_page() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("/analizar"));
    assert!(html.contains("name=\"nivel\""));
}

#[tokio::test]
async fn missing_file_is_rejected() {
    let response = app()
        .oneshot(multipart_request(&[Part::Text("nivel", "medio-1-2")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No se seleccionó ningún archivo");
}

#[tokio::test]
async fn missing_level_is_rejected() {
    let response = app()
        .oneshot(multipart_request(&[Part::File("ensayo.txt", ESSAY.as_bytes())]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Por favor selecciona un nivel educativo");
}

#[tokio::test]
async fn unknown_level_is_rejected() {
    let response = app()
        .oneshot(multipart_request(&[
            Part::File("ensayo.txt", ESSAY.as_bytes()),
            Part::Text("nivel", "kinder"),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn disallowed_extension_is_rejected() {
    let response = app()
        .oneshot(multipart_request(&[
            Part::File("programa.exe", b"MZ"),
            Part::Text("nivel", "superior"),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Tipo de archivo no permitido. Use .txt, .docx, .pdf, .jpg, .png"
    );
}

#[tokio::test]
async fn oversized_file_is_rejected() {
    let mut config = AppConfig::default();
    config.server.max_upload_mb = 1;
    let data = vec![b'a'; 1024 * 1024 + 10];
    let response = app_with(config)
        .oneshot(multipart_request(&[
            Part::Text("nivel", "superior"),
            Part::File("grande.txt", &data),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json_body(response).await["error"], "Archivo demasiado grande. Máximo 1MB");
}

#[tokio::test]
async fn image_upload_reports_missing_ocr() {
    let response = app()
        .oneshot(multipart_request(&[
            Part::File("foto.png", &[0x89, b'P', b'N', b'G']),
            Part::Text("nivel", "basica-5-8"),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = json_body(response).await;
    assert!(json["error"].as_str().unwrap().contains("OCR"));
}

#[tokio::test]
async fn blank_text_file_is_unprocessable() {
    let response = app()
        .oneshot(multipart_request(&[
            Part::File("vacio.txt", b"  \n ... "),
            Part::Text("nivel", "superior"),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn text_upload_falls_back_to_heuristic() {
    let response = app()
        .oneshot(multipart_request(&[
            Part::File("ensayo.txt", ESSAY.as_bytes()),
            Part::Text("nivel", "medio-3-4"),
        ]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let result: AnalysisResponse = serde_json::from_value(json).unwrap();
    assert_eq!(result.filename, "ensayo.txt");
    assert_eq!(result.nivel_educativo, "medio-3-4");
    assert!(!result.analizado_con_ia);
    assert_eq!(result.error_info, "Fallback: IA no disponible (API Key no configurada)");
    assert!(result.porcentaje >= 40);
    assert!(!result.indicadores.is_empty());
    assert_eq!(result.preguntas.len(), 3);
    assert_eq!(result.longitud_texto, ESSAY.chars().count());
}
