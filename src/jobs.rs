// src/jobs.rs
//! Best-effort extraction of job-posting text from a listing URL.

use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, warn};

// Tried in order; the first match wins. Job boards rarely agree on markup,
// so the tail entries are deliberately loose.
const DESCRIPTION_SELECTORS: &[&str] = &[
    ".job-description",
    "[class*='job-description']",
    "[class*='jobDescription']",
    "[class*='description']",
    "main",
    "article",
];

pub struct JobScraper {
    client: Client,
}

impl JobScraper {
    pub fn new(timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch a listing page and return its best-effort posting text.
    pub async fn scrape(&self, url: &str) -> Result<String> {
        info!("Fetching job posting: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch job posting")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let html = response
            .text()
            .await
            .context("Failed to read response body")?;

        let document = Html::parse_document(&html);
        extract_description(&document).context("Page contained no readable text")
    }
}

fn extract_description(document: &Html) -> Option<String> {
    for selector_str in DESCRIPTION_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if text.len() > 5 {
                    return Some(text);
                }
            }
        }
    }

    // No recognizable container; fall back to the whole body text.
    warn!("No job-description container found, falling back to body text");
    let body = Selector::parse("body").ok()?;
    document
        .select(&body)
        .next()
        .map(|element| clean_text(&element.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| !text.is_empty())
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_job_description_container() {
        let html = Html::parse_document(
            "<html><body><div class=\"job-description\">Test job description</div></body></html>",
        );
        assert_eq!(
            extract_description(&html).unwrap(),
            "Test job description"
        );
    }

    #[test]
    fn falls_back_to_body_text() {
        let html =
            Html::parse_document("<html><body><p>This is the body</p></body></html>");
        assert_eq!(extract_description(&html).unwrap(), "This is the body");
    }

    #[test]
    fn empty_page_yields_nothing() {
        let html = Html::parse_document("<html><body></body></html>");
        assert!(extract_description(&html).is_none());
    }

    #[test]
    fn normalizes_whitespace() {
        let html = Html::parse_document(
            "<html><body><div class=\"job-description\">Line one\n\n   Line two</div></body></html>",
        );
        assert_eq!(extract_description(&html).unwrap(), "Line one Line two");
    }
}
