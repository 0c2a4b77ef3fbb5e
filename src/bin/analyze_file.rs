use detector_ia_lib::models::{EducationalLevel, ExtractedDocument};
use detector_ia_lib::services::detection::analyze_heuristic;
use detector_ia_lib::services::{extract_text, format_response, AppConfig, DetectionService};

fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  cargo run --bin analyze_file -- <path> [--nivel <code>] [--offline] [--out <json_path>]\n\nNotes:\n  - Niveles: basica-1-4, basica-5-8, medio-1-2, medio-3-4, superior (default: medio-1-2).\n  - `--offline` usa solo el análisis heurístico, sin llamar a Gemini.\n  - GOOGLE_API_KEY (o .env) habilita el análisis con IA."
        );
        return Ok(());
    }
    dotenvy::dotenv().ok();

    let path = args[1].clone();
    let level: EducationalLevel = parse_arg_value(&args, "--nivel")
        .unwrap_or_else(|| "medio-1-2".to_string())
        .parse()
        .map_err(|e: detector_ia_lib::models::UnknownLevelError| e.to_string())?;
    let offline = has_flag(&args, "--offline");
    let out_path = parse_arg_value(&args, "--out");

    let bytes = std::fs::read(&path).map_err(|e| format!("read file failed: {}", e))?;
    let file_name = std::path::Path::new(&path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.clone());

    let text = extract_text(&file_name, &bytes).map_err(|e| e.to_string())?;
    let doc = ExtractedDocument::from_text(text);

    println!("File: {}", path);
    println!("Extracted: {} chars, {} words, {} sentences", doc.char_count, doc.word_count, doc.sentences.len());
    println!("Level: {}", level.description());
    println!("Mode: {}", if offline { "heuristic only" } else { "AI with heuristic fallback" });
    println!("Preview: {}", preview(&doc.text, 140));
    println!();

    let verdict = if offline {
        analyze_heuristic(&doc, level).map_err(|e| e.to_string())?
    } else {
        let config = AppConfig::load_from_env()?;
        DetectionService::new(&config.ai)
            .analyze(&doc, level)
            .await
            .map_err(|e| e.to_string())?
    };

    let response = format_response(&verdict, &file_name, level);
    println!("Result: {}% ({}, {})", response.porcentaje, response.label, response.color);
    println!("Status: {}", response.error_info);
    for indicator in &response.indicadores {
        println!("  - {}", indicator);
    }
    println!("Questions:");
    for question in &response.preguntas {
        println!("  ? {}", question);
    }

    let json = serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;
    match out_path {
        Some(out_path) => {
            std::fs::write(&out_path, json).map_err(|e| format!("write out failed: {}", e))?;
            println!();
            println!("Wrote JSON: {}", out_path);
        }
        None => {
            println!();
            println!("{}", json);
        }
    }

    Ok(())
}
