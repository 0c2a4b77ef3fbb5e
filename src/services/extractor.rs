// Document Extractor
// Plain text out of uploaded .txt, .docx and .pdf files

use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::text_processor::normalize_punctuation;

pub const ALLOWED_EXTENSIONS: [&str; 8] = ["txt", "docx", "pdf", "jpg", "jpeg", "png", "bmp", "tiff"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Tipo de archivo no permitido: .{0}")]
    UnsupportedFormat(String),
    #[error("No se pudo leer el documento Word: {0}")]
    Docx(String),
    #[error("No se pudo leer el PDF: {0}")]
    Pdf(String),
    #[error("OCR no disponible: no se puede extraer texto de imágenes")]
    OcrUnavailable,
    #[error("No se pudo extraer texto del archivo")]
    EmptyText,
    #[error("La extracción de texto se interrumpió: {0}")]
    Aborted(String),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DocumentKind {
    PlainText,
    Docx,
    Pdf,
    Image,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::PlainText),
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" | "png" | "bmp" | "tiff" => Some(Self::Image),
            _ => None,
        }
    }
}

pub fn is_allowed_file(filename: &str) -> bool {
    DocumentKind::from_filename(filename).is_some()
}

/// Extract normalized text; an empty result is an error
pub fn extract_text(filename: &str, data: &[u8]) -> Result<String, ExtractionError> {
    let kind = DocumentKind::from_filename(filename).ok_or_else(|| {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        ExtractionError::UnsupportedFormat(ext)
    })?;

    let raw = match kind {
        DocumentKind::PlainText => decode_plain_text(data),
        DocumentKind::Docx => extract_docx(data)?,
        DocumentKind::Pdf => extract_pdf(data)?,
        DocumentKind::Image => return Err(ExtractionError::OcrUnavailable),
    };

    let text = normalize_punctuation(&raw);
    debug!(kind = ?kind, bytes = data.len(), chars = text.chars().count(), "[EXTRACTOR] text extracted");

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyText);
    }
    Ok(text)
}

fn decode_plain_text(data: &[u8]) -> String {
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    String::from_utf8_lossy(data).into_owned()
}

fn extract_docx(data: &[u8]) -> Result<String, ExtractionError> {
    use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

    let docx = read_docx(data).map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in docx.document.children.iter() {
        if let DocumentChild::Paragraph(para) = child {
            let para_text: String = para
                .children
                .iter()
                .filter_map(|pc| match pc {
                    ParagraphChild::Run(run) => Some(
                        run.children
                            .iter()
                            .filter_map(|rc| match rc {
                                RunChild::Text(t) => Some(t.text.as_str()),
                                _ => None,
                            })
                            .collect::<String>(),
                    ),
                    _ => None,
                })
                .collect();

            if !para_text.trim().is_empty() {
                paragraphs.push(para_text);
            }
        }
    }

    Ok(paragraphs.join("\n"))
}

fn extract_pdf(data: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| ExtractionError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert!(is_allowed_file("ensayo.TXT"));
        assert!(is_allowed_file("trabajo.final.docx"));
        assert!(is_allowed_file("foto.jpeg"));
        assert!(!is_allowed_file("virus.exe"));
        assert!(!is_allowed_file("sin_extension"));
        for ext in ALLOWED_EXTENSIONS {
            assert!(is_allowed_file(&format!("a.{}", ext)));
        }
    }

    #[test]
    fn test_plain_text_with_bom() {
        let mut data = b"\xEF\xBB\xBF".to_vec();
        data.extend_from_slice("Hola “mundo”.".as_bytes());
        assert_eq!(extract_text("a.txt", &data).unwrap(), "Hola \"mundo\".");
    }

    #[test]
    fn test_empty_text_is_error() {
        assert_eq!(extract_text("a.txt", b"   \n\t"), Err(ExtractionError::EmptyText));
    }

    #[test]
    fn test_image_reports_ocr_unavailable() {
        assert_eq!(extract_text("foto.png", &[0x89, 0x50]), Err(ExtractionError::OcrUnavailable));
    }

    #[test]
    fn test_unsupported_format() {
        assert_eq!(
            extract_text("a.exe", b"MZ"),
            Err(ExtractionError::UnsupportedFormat("exe".to_string()))
        );
    }

    #[test]
    fn test_corrupt_containers() {
        assert!(matches!(extract_text("a.docx", b"not a zip"), Err(ExtractionError::Docx(_))));
        assert!(matches!(extract_text("a.pdf", b"not a pdf"), Err(ExtractionError::Pdf(_))));
    }

    #[test]
    fn test_docx_paragraphs() {
        use docx_rs::{Docx, Paragraph, Run};

        let mut buf = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Primera idea.")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Segunda idea.")))
            .build()
            .pack(&mut buf)
            .unwrap();

        let text = extract_text("trabajo.docx", buf.get_ref()).unwrap();
        assert_eq!(text, "Primera idea.\nSegunda idea.");
    }
}
