// src/ai/mod.rs
use serde::{Deserialize, Serialize};

pub mod client;
pub mod prompts;

pub use client::GenerationClient;
pub use prompts::WritingStyle;

/// Fixed text returned when cover-letter generation fails. Paired with a
/// match score of 0 it is a sentinel, never a real compatibility judgment.
pub const FALLBACK_COVER_LETTER: &str =
    "Could not generate a cover letter. Please try again.";

/// Structured cover-letter result parsed from the model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub cover_letter: String,
    pub match_score: u8,
}

impl CoverLetter {
    /// The sentinel returned to the user when generation or parsing failed.
    pub fn fallback() -> Self {
        Self {
            cover_letter: FALLBACK_COVER_LETTER.to_string(),
            match_score: 0,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.match_score == 0 && self.cover_letter == FALLBACK_COVER_LETTER
    }
}

/// Everything the cover-letter prompt needs besides the applicant profile.
#[derive(Debug, Clone)]
pub struct CoverLetterRequest<'a> {
    pub position: &'a str,
    pub company: &'a str,
    pub source: &'a str,
    pub cv_text: Option<&'a str>,
    pub job_description: Option<&'a str>,
    pub style: WritingStyle,
}
