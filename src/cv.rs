// src/cv.rs
//! CV text extraction from PDF files.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Extract the concatenated text of a PDF document.
pub fn extract_text(path: &Path) -> Result<String> {
    if !path.exists() {
        anyhow::bail!("CV file not found: {}", path.display());
    }

    // pdf-extract can panic on malformed input; contain it so a bad CV
    // never takes the session down.
    let outcome =
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| pdf_extract::extract_text(path)));

    let text = match outcome {
        Ok(result) => result
            .map_err(|e| anyhow::anyhow!("Failed to extract text from PDF: {}", e))
            .with_context(|| format!("Could not read CV: {}", path.display()))?,
        Err(_) => anyhow::bail!("PDF parser crashed on {}", path.display()),
    };

    if text.trim().is_empty() {
        anyhow::bail!(
            "No extractable text in {} (scanned or image-only PDF?)",
            path.display()
        );
    }

    info!("Extracted {} characters of CV text", text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_an_error() {
        let result = extract_text(Path::new("non_existent_cv.pdf"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn malformed_pdf_is_an_error_not_a_crash() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 this is not a real pdf").unwrap();

        assert!(extract_text(&path).is_err());
    }
}
