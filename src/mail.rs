// src/mail.rs
//! SMTP delivery of generated application text with file attachments.

use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::SmtpSettings;

/// Which attachments made it into a delivered message.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub attached: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

pub struct Mailer {
    settings: SmtpSettings,
}

impl Mailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    /// Send one email. Missing attachments are skipped with a warning; the
    /// message is still delivered with whatever attachments resolved.
    pub async fn send(
        &self,
        subject: &str,
        body: &str,
        to: &str,
        attachments: &[PathBuf],
    ) -> Result<DispatchReport> {
        let (message, report) = self.build_message(subject, body, to, attachments).await?;

        let password = self.settings.password.clone().context(
            "SMTP password not available. Set the SMTP_PASSWORD environment variable.",
        )?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.settings.host)
            .context("Failed to configure SMTP transport")?
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.settings.username.clone(),
                password,
            ))
            .build();

        transport
            .send(message)
            .await
            .context("SMTP delivery failed")?;

        info!("Email delivered to {}", to);
        Ok(report)
    }

    /// Assemble the MIME message. Split out from `send` so attachment
    /// handling is testable without a live SMTP server.
    pub async fn build_message(
        &self,
        subject: &str,
        body: &str,
        to: &str,
        attachments: &[PathBuf],
    ) -> Result<(Message, DispatchReport)> {
        let from: Mailbox = self
            .settings
            .from
            .parse()
            .with_context(|| format!("Invalid sender address: {}", self.settings.from))?;
        let to: Mailbox = to
            .parse()
            .with_context(|| format!("Invalid recipient address: {}", to))?;

        let mut multipart = MultiPart::mixed().singlepart(SinglePart::plain(body.to_string()));
        let mut report = DispatchReport::default();

        for path in attachments {
            match tokio::fs::read(path).await {
                Ok(bytes) => {
                    let part = Attachment::new(attachment_name(path)).body(
                        bytes,
                        ContentType::parse("application/octet-stream")
                            .context("Invalid attachment content type")?,
                    );
                    multipart = multipart.singlepart(part);
                    report.attached.push(path.clone());
                }
                Err(e) => {
                    warn!("Skipping attachment {}: {}", path.display(), e);
                    report.skipped.push(path.clone());
                }
            }
        }

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(multipart)
            .context("Failed to build email message")?;

        Ok((message, report))
    }
}

fn attachment_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment")
        .to_string()
}
