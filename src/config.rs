// src/config.rs
//! Typed application configuration loaded once at startup.
//!
//! Settings live in a YAML file; secrets come from the environment and are
//! resolved into the config object at load time so no component reads
//! process-global state afterwards.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub profile: Profile,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub smtp: Option<SmtpSettings>,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Applicant profile consumed by the generation prompts.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    #[serde(default)]
    pub skills: Skills,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub non_technical: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_generation_timeout")]
    pub timeout_seconds: u64,
    /// Resolved from GEMINI_API_KEY, never read from the config file.
    #[serde(skip)]
    pub api_key: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_seconds: default_generation_timeout(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    pub from: String,
    /// Resolved from SMTP_PASSWORD; only required when actually sending.
    #[serde(skip)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_generation_timeout() -> u64 {
    60
}

fn default_smtp_port() -> u16 {
    465
}

fn default_database_path() -> PathBuf {
    PathBuf::from("applications.db")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl AppConfig {
    /// Load configuration from a YAML file and resolve secrets from the
    /// environment.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "{} not found. Copy config.example.yaml and fill in your profile.",
                path.display()
            );
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let mut config = Self::from_yaml(&content)?;
        config.resolve_secrets()?;
        config.resolve_paths()?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse configuration file")
    }

    fn resolve_secrets(&mut self) -> Result<()> {
        self.generation.api_key = std::env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY environment variable not set")?;

        if let Some(smtp) = &mut self.smtp {
            smtp.password = std::env::var("SMTP_PASSWORD").ok();
        }

        Ok(())
    }

    fn resolve_paths(&mut self) -> Result<()> {
        self.storage.database_path = resolve_path(&self.storage.database_path)?;
        self.storage.output_dir = resolve_path(&self.storage.output_dir)?;
        Ok(())
    }
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(current_dir.join(path))
    }
}
