// src/utils.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Normalize a company or position string for file system usage.
pub fn sanitize_filename(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Deterministic artifact path for a generated cover letter.
pub fn cover_letter_path(output_dir: &Path, company: &str, position: &str) -> PathBuf {
    output_dir.join(format!(
        "cover_letter_{}_{}.txt",
        sanitize_filename(company),
        sanitize_filename(position)
    ))
}

/// Write the generated body text verbatim, creating parent directories.
pub async fn write_artifact(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Test Corp"), "Test_Corp");
        assert_eq!(sanitize_filename("Software Engineer"), "Software_Engineer");
        assert_eq!(sanitize_filename("R&D/Platform"), "R_D_Platform");
        assert_eq!(sanitize_filename("  padded  "), "padded");
    }

    #[test]
    fn test_cover_letter_path_is_deterministic() {
        let path = cover_letter_path(Path::new("output"), "Test Corp", "Software Engineer");
        assert_eq!(
            path,
            PathBuf::from("output/cover_letter_Test_Corp_Software_Engineer.txt")
        );
        assert_eq!(
            path,
            cover_letter_path(Path::new("output"), "Test Corp", "Software Engineer")
        );
    }

    #[tokio::test]
    async fn write_artifact_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/letter.txt");
        write_artifact(&path, "Dear hiring manager").await.unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Dear hiring manager"
        );
    }
}
