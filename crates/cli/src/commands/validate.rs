//! `chatwhisk validate` — Check a payload against a pipeline stage.

use chatwhisk_core::{Payload, ValidationError};
use chatwhisk_validate::validate_payload;
use std::io::Read;
use std::path::{Path, PathBuf};

pub async fn run(stage: &str, file: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(file.as_deref())?;
    let payload = parse_payload(&text)?;

    match validate_payload(&payload, stage) {
        Ok(_) => {
            println!("✅ Payload is valid for stage {stage}");
            Ok(())
        }
        Err(err) => {
            for line in report(&err) {
                println!("{line}");
            }
            Err(err.into())
        }
    }
}

fn read_input(file: Option<&Path>) -> Result<String, Box<dyn std::error::Error>> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn parse_payload(text: &str) -> Result<Payload, String> {
    serde_json::from_str(text).map_err(|e| format!("Payload is not valid JSON: {e}"))
}

/// Human-readable lines for a failed validation.
fn report(err: &ValidationError) -> Vec<String> {
    let mut lines = vec![format!("❌ {} ({})", headline(err), err.kind())];
    lines.extend(err.violations().iter().map(|v| format!("   - {v}")));
    lines
}

fn headline(err: &ValidationError) -> String {
    match err {
        ValidationError::Failed { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
