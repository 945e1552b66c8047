// src/cli.rs
//! Command-line front end and orchestration.
//!
//! Boundary failures (scraping, CV parsing, generation, mail, ledger) are
//! reported and degraded here so a single bad call never kills the session.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, warn};

use crate::ai::{CoverLetter, CoverLetterRequest, GenerationClient, WritingStyle};
use crate::config::AppConfig;
use crate::jobs::JobScraper;
use crate::ledger::Ledger;
use crate::mail::Mailer;
use crate::{cv, utils};

const SCRAPE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "applykit")]
#[command(about = "Generate and track job application letters")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the configuration file
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a cover letter, save it and record it in the history
    Generate {
        #[arg(long)]
        company: String,
        #[arg(long)]
        position: String,
        /// Where the listing was found (e.g. LinkedIn)
        #[arg(long, default_value = "a job board")]
        source: String,
        /// Scrape the job description from this URL
        #[arg(long)]
        job_url: Option<String>,
        /// Path to the applicant's CV in PDF format
        #[arg(long)]
        cv: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = WritingStyle::Formal)]
        style: WritingStyle,
        /// Email the saved letter to this address
        #[arg(long)]
        email_to: Option<String>,
    },
    /// Show previously generated applications, newest first
    History,
    /// Generate a post-interview thank-you email
    ThankYou {
        #[arg(long)]
        company: String,
        #[arg(long)]
        position: String,
        #[arg(long)]
        interview_date: String,
        /// Email the result to this address
        #[arg(long)]
        email_to: Option<String>,
    },
    /// Generate a follow-up email for a pending application
    FollowUp {
        #[arg(long)]
        company: String,
        #[arg(long)]
        position: String,
        #[arg(long)]
        applied_date: String,
        /// Email the result to this address
        #[arg(long)]
        email_to: Option<String>,
    },
    /// Suggest CV improvements, optionally against a job posting
    Suggest {
        /// Path to the applicant's CV in PDF format
        #[arg(long)]
        cv: PathBuf,
        /// Compare the CV against the posting at this URL
        #[arg(long)]
        job_url: Option<String>,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Command::Generate {
            company,
            position,
            source,
            job_url,
            cv,
            style,
            email_to,
        } => {
            handle_generate(
                &config, &company, &position, &source, job_url, cv, style, email_to,
            )
            .await
        }
        Command::History => handle_history(&config).await,
        Command::ThankYou {
            company,
            position,
            interview_date,
            email_to,
        } => {
            handle_thank_you(
                &config,
                &company,
                &position,
                &interview_date,
                email_to.as_deref(),
            )
            .await
        }
        Command::FollowUp {
            company,
            position,
            applied_date,
            email_to,
        } => {
            handle_follow_up(
                &config,
                &company,
                &position,
                &applied_date,
                email_to.as_deref(),
            )
            .await
        }
        Command::Suggest { cv, job_url } => handle_suggest(&config, &cv, job_url).await,
    }
}

async fn handle_thank_you(
    config: &AppConfig,
    company: &str,
    position: &str,
    interview_date: &str,
    email_to: Option<&str>,
) -> Result<()> {
    let outcome = match GenerationClient::new(&config.generation) {
        Ok(client) => {
            client
                .generate_thank_you_email(&config.profile, position, company, interview_date)
                .await
        }
        Err(e) => Err(e),
    };

    let body = match outcome {
        Ok(body) => body,
        Err(e) => {
            error!("Thank-you email generation failed: {:#}", e);
            println!("Could not generate the thank-you email. Please try again.");
            return Ok(());
        }
    };

    println!("{}", body);

    let subject = format!("Thank You - {} Interview - {}", position, config.profile.name);
    maybe_send(config, &subject, &body, email_to, &[]).await;
    Ok(())
}

async fn handle_follow_up(
    config: &AppConfig,
    company: &str,
    position: &str,
    applied_date: &str,
    email_to: Option<&str>,
) -> Result<()> {
    let outcome = match GenerationClient::new(&config.generation) {
        Ok(client) => {
            client
                .generate_follow_up_email(&config.profile, position, company, applied_date)
                .await
        }
        Err(e) => Err(e),
    };

    let body = match outcome {
        Ok(body) => body,
        Err(e) => {
            error!("Follow-up email generation failed: {:#}", e);
            println!("Could not generate the follow-up email. Please try again.");
            return Ok(());
        }
    };

    println!("{}", body);

    let subject = format!(
        "Application Follow-Up - {} - {}",
        position, config.profile.name
    );
    maybe_send(config, &subject, &body, email_to, &[]).await;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn handle_generate(
    config: &AppConfig,
    company: &str,
    position: &str,
    source: &str,
    job_url: Option<String>,
    cv_path: Option<PathBuf>,
    style: WritingStyle,
    email_to: Option<String>,
) -> Result<()> {
    let job_text = match &job_url {
        Some(url) => scrape_degraded(url).await,
        None => None,
    };

    let cv_text = cv_path.as_deref().and_then(|path| match cv::extract_text(path) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Continuing without CV text: {:#}", e);
            None
        }
    });

    let client = GenerationClient::new(&config.generation)?;
    let request = CoverLetterRequest {
        position,
        company,
        source,
        cv_text: cv_text.as_deref(),
        job_description: job_text.as_deref(),
        style,
    };

    // Generation failures degrade to the documented sentinel so the session
    // survives; the real error goes to the log.
    let letter = match client.generate_cover_letter(&config.profile, &request).await {
        Ok(letter) => letter,
        Err(e) => {
            error!("Cover letter generation failed: {:#}", e);
            CoverLetter::fallback()
        }
    };

    let artifact = utils::cover_letter_path(&config.storage.output_dir, company, position);
    utils::write_artifact(&artifact, &letter.cover_letter).await?;

    println!("Saved cover letter to {}", artifact.display());
    if letter.is_fallback() {
        println!("Generation failed; the saved file contains the fallback text.");
    } else {
        println!("Match score: {}/100", letter.match_score);
    }
    println!("{}", "-".repeat(40));
    println!("{}", letter.cover_letter);
    println!("{}", "-".repeat(40));

    // Record only after the artifact was written successfully. A broken
    // ledger must not take the session down with it.
    match Ledger::open(&config.storage.database_path).await {
        Ok(ledger) => {
            if let Err(e) = ledger
                .append(company, position, &artifact.display().to_string())
                .await
            {
                warn!("Could not record application in history: {:#}", e);
            }
        }
        Err(e) => warn!("Application history unavailable: {:#}", e),
    }

    let subject = format!("Job Application - {} - {}", position, config.profile.name);
    maybe_send(
        config,
        &subject,
        &letter.cover_letter,
        email_to.as_deref(),
        &[artifact],
    )
    .await;

    Ok(())
}

async fn handle_history(config: &AppConfig) -> Result<()> {
    let ledger = Ledger::open(&config.storage.database_path).await?;
    let records = ledger.list_all().await?;

    if records.is_empty() {
        println!("No applications recorded yet.");
        return Ok(());
    }

    println!(
        "{:<5} {:<27} {:<25} {:<25} File",
        "ID", "When", "Company", "Position"
    );
    println!("{}", "-".repeat(100));
    for record in records {
        println!(
            "{:<5} {:<27} {:<25} {:<25} {}",
            record.id, record.timestamp, record.company, record.position, record.file_path
        );
    }

    Ok(())
}

async fn handle_suggest(
    config: &AppConfig,
    cv_path: &std::path::Path,
    job_url: Option<String>,
) -> Result<()> {
    let cv_text = match cv::extract_text(cv_path) {
        Ok(text) => text,
        Err(e) => {
            error!("CV parsing failed: {:#}", e);
            println!("Could not read the CV; no suggestions generated.");
            return Ok(());
        }
    };

    let job_text = match &job_url {
        Some(url) => scrape_degraded(url).await,
        None => None,
    };

    let outcome = match GenerationClient::new(&config.generation) {
        Ok(client) => {
            client
                .generate_cv_suggestions(&config.profile, &cv_text, job_text.as_deref())
                .await
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(suggestions) => println!("{}", suggestions),
        Err(e) => {
            error!("CV suggestion generation failed: {:#}", e);
            println!("Could not generate CV suggestions. Please try again.");
        }
    }

    Ok(())
}

async fn scrape_degraded(url: &str) -> Option<String> {
    let scraper = match JobScraper::new(SCRAPE_TIMEOUT) {
        Ok(scraper) => scraper,
        Err(e) => {
            warn!("Could not set up job scraper: {:#}", e);
            return None;
        }
    };

    match scraper.scrape(url).await {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Continuing without job description: {:#}", e);
            None
        }
    }
}

/// Send by email when a recipient was given and SMTP is configured. Delivery
/// problems are reported, never fatal.
async fn maybe_send(
    config: &AppConfig,
    subject: &str,
    body: &str,
    to: Option<&str>,
    attachments: &[PathBuf],
) {
    let Some(to) = to else { return };

    let Some(smtp) = &config.smtp else {
        warn!("No smtp section in the configuration; cannot send email");
        return;
    };

    let mailer = Mailer::new(smtp.clone());
    match mailer.send(subject, body, to, attachments).await {
        Ok(report) => {
            println!("Email sent to {}", to);
            for skipped in &report.skipped {
                println!("Attachment skipped (not found): {}", skipped.display());
            }
        }
        Err(e) => error!("Failed to send email: {:#}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FALLBACK_COVER_LETTER;
    use crate::config::{GenerationSettings, Profile, Skills, StorageSettings};
    use std::path::Path;
    use tempfile::tempdir;

    // Points the generation client at a closed local port so every call
    // fails fast without touching the network.
    fn unreachable_config(dir: &Path) -> AppConfig {
        AppConfig {
            profile: Profile {
                name: "John Doe".to_string(),
                email: "john.doe@example.com".to_string(),
                phone: "1234567890".to_string(),
                address: None,
                linkedin: None,
                github: None,
                skills: Skills::default(),
            },
            generation: GenerationSettings {
                base_url: "http://127.0.0.1:9".to_string(),
                model: "gemini-1.5-flash".to_string(),
                timeout_seconds: 1,
                api_key: "test-key".to_string(),
            },
            smtp: None,
            storage: StorageSettings {
                database_path: dir.join("history.db"),
                output_dir: dir.join("output"),
            },
        }
    }

    #[tokio::test]
    async fn thank_you_generation_failure_does_not_abort() {
        let dir = tempdir().unwrap();
        let config = unreachable_config(dir.path());

        handle_thank_you(&config, "Test Corp", "Engineer", "2025-10-06", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn follow_up_generation_failure_does_not_abort() {
        let dir = tempdir().unwrap();
        let config = unreachable_config(dir.path());

        handle_follow_up(&config, "Test Corp", "Engineer", "2025-09-29", None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn suggest_with_missing_cv_does_not_abort() {
        let dir = tempdir().unwrap();
        let config = unreachable_config(dir.path());

        handle_suggest(&config, Path::new("non_existent_cv.pdf"), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn generate_degrades_to_fallback_and_still_records() {
        let dir = tempdir().unwrap();
        let config = unreachable_config(dir.path());

        handle_generate(
            &config,
            "Test Corp",
            "Engineer",
            "a job board",
            None,
            None,
            WritingStyle::Formal,
            None,
        )
        .await
        .unwrap();

        let artifact = utils::cover_letter_path(&config.storage.output_dir, "Test Corp", "Engineer");
        let saved = std::fs::read_to_string(&artifact).unwrap();
        assert_eq!(saved, FALLBACK_COVER_LETTER);

        let ledger = Ledger::open(&config.storage.database_path).await.unwrap();
        let records = ledger.list_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].company, "Test Corp");
    }
}
