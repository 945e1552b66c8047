// src/ai/client.rs
//! HTTP client for the hosted generative-language API.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{prompts, CoverLetter, CoverLetterRequest};
use crate::config::{GenerationSettings, Profile};

// ===== Wire types (generateContent) =====

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

pub struct GenerationClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GenerationClient {
    pub fn new(settings: &GenerationSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    /// Send one prompt and return the raw generated text.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call generation API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Generation API returned {}: {}", status, error_text);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse generation API response")?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .context("Generation API returned no candidates")
    }

    /// Generate a cover letter with a 1-100 match score. Callers that want
    /// the original degrade-to-sentinel behavior map `Err` to
    /// [`CoverLetter::fallback`].
    pub async fn generate_cover_letter(
        &self,
        profile: &Profile,
        request: &CoverLetterRequest<'_>,
    ) -> Result<CoverLetter> {
        info!(
            "Generating cover letter for {} at {}",
            request.position, request.company
        );

        let prompt = prompts::cover_letter(profile, request);
        let raw = self.complete(&prompt).await?;
        parse_cover_letter(&raw)
    }

    pub async fn generate_thank_you_email(
        &self,
        profile: &Profile,
        position: &str,
        company: &str,
        interview_date: &str,
    ) -> Result<String> {
        let prompt = prompts::thank_you_email(profile, position, company, interview_date);
        self.complete(&prompt).await
    }

    pub async fn generate_follow_up_email(
        &self,
        profile: &Profile,
        position: &str,
        company: &str,
        applied_date: &str,
    ) -> Result<String> {
        let prompt = prompts::follow_up_email(profile, position, company, applied_date);
        self.complete(&prompt).await
    }

    pub async fn generate_cv_suggestions(
        &self,
        profile: &Profile,
        cv_text: &str,
        job_description: Option<&str>,
    ) -> Result<String> {
        let prompt = prompts::cv_suggestions(profile, cv_text, job_description);
        self.complete(&prompt).await
    }
}

/// Parse the structured cover-letter response, tolerating code fences the
/// model sometimes wraps around JSON output.
pub fn parse_cover_letter(raw: &str) -> Result<CoverLetter> {
    let stripped = strip_code_fences(raw);
    let letter: CoverLetter = serde_json::from_str(stripped)
        .context("Model response was not the expected cover-letter JSON")?;

    if letter.cover_letter.trim().is_empty() {
        anyhow::bail!("Model returned an empty cover letter");
    }

    Ok(letter)
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop an optional language tag after the opening fence, whether or not
    // a newline follows it, then the closing fence.
    let rest = rest
        .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
        .trim_start();
    rest.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FALLBACK_COVER_LETTER;

    #[test]
    fn parses_plain_json_response() {
        let raw = r#"{"cover_letter": "Test cover letter", "match_score": 80}"#;
        let letter = parse_cover_letter(raw).unwrap();
        assert_eq!(letter.cover_letter, "Test cover letter");
        assert_eq!(letter.match_score, 80);
    }

    #[test]
    fn parses_fenced_json_response() {
        let raw = "```json\n{\"cover_letter\": \"Test cover letter\", \"match_score\": 80}\n```";
        let letter = parse_cover_letter(raw).unwrap();
        assert_eq!(letter.cover_letter, "Test cover letter");
        assert_eq!(letter.match_score, 80);
    }

    #[test]
    fn parses_single_line_fenced_response() {
        let raw = "```json {\"cover_letter\": \"Test cover letter\", \"match_score\": 80}```";
        let letter = parse_cover_letter(raw).unwrap();
        assert_eq!(letter.cover_letter, "Test cover letter");
        assert_eq!(letter.match_score, 80);
    }

    #[test]
    fn parses_fence_without_language_tag() {
        let raw = "```\n{\"cover_letter\": \"Hi\", \"match_score\": 5}\n```";
        let letter = parse_cover_letter(raw).unwrap();
        assert_eq!(letter.match_score, 5);
    }

    #[test]
    fn rejects_unstructured_response() {
        assert!(parse_cover_letter("Dear hiring manager, ...").is_err());
        assert!(parse_cover_letter("{\"cover_letter\": \"\", \"match_score\": 10}").is_err());
    }

    #[test]
    fn fallback_is_the_documented_sentinel() {
        let fallback = CoverLetter::fallback();
        assert_eq!(fallback.cover_letter, FALLBACK_COVER_LETTER);
        assert_eq!(fallback.match_score, 0);
        assert!(fallback.is_fallback());

        let real = CoverLetter {
            cover_letter: "Test cover letter".to_string(),
            match_score: 80,
        };
        assert!(!real.is_fallback());
    }
}
