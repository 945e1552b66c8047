// src/ai/prompts.rs
//! Prompt builders for the generation client.

use clap::ValueEnum;
use std::fmt;

use super::CoverLetterRequest;
use crate::config::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WritingStyle {
    Formal,
    Creative,
    Confident,
}

impl WritingStyle {
    fn directive(&self) -> &'static str {
        match self {
            Self::Formal => "formal and professional",
            Self::Creative => "creative and engaging while staying professional",
            Self::Confident => "confident and assertive",
        }
    }
}

// Must render the clap value names so default_value_t round-trips.
impl fmt::Display for WritingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Formal => "formal",
            Self::Creative => "creative",
            Self::Confident => "confident",
        };
        write!(f, "{}", name)
    }
}

fn profile_block(profile: &Profile) -> String {
    let mut lines = vec![
        format!("Full name: {}", profile.name),
        format!("Email: {}", profile.email),
        format!("Phone: {}", profile.phone),
    ];

    if let Some(address) = &profile.address {
        lines.push(format!("Address: {}", address));
    }
    if let Some(linkedin) = &profile.linkedin {
        lines.push(format!("LinkedIn: {}", linkedin));
    }
    if let Some(github) = &profile.github {
        lines.push(format!("GitHub: {}", github));
    }

    lines.push(format!(
        "Technical skills: {}",
        profile.skills.technical.join(", ")
    ));
    lines.push(format!(
        "Non-technical skills: {}",
        profile.skills.non_technical.join(", ")
    ));

    lines.join("\n")
}

pub fn cover_letter(profile: &Profile, request: &CoverLetterRequest<'_>) -> String {
    let cv_block = request
        .cv_text
        .map(|cv| format!("\nSummary of the applicant's CV:\n{}\n", cv))
        .unwrap_or_default();

    let job_block = request
        .job_description
        .map(|job| format!("\nJob description being applied to:\n{}\n", job))
        .unwrap_or_default();

    format!(
        r#"You are a professional career assistant writing persuasive, personal job application letters.

Write a cover letter addressed to the hiring manager at {company} for the {position} position. The listing was found via {source}.

Applicant details:
{profile}
{cv_block}{job_block}
Instructions:
- Write in a {style} tone.
- Compare the applicant's skills with the job requirements and emphasize the most relevant matches.
- Keep the letter complete and ready to send.

Respond with a single JSON object and nothing else, with exactly two fields:
"cover_letter": the complete letter as a string
"match_score": an integer from 1 to 100 rating how well the applicant matches the position"#,
        company = request.company,
        position = request.position,
        source = request.source,
        profile = profile_block(profile),
        cv_block = cv_block,
        job_block = job_block,
        style = request.style.directive(),
    )
}

pub fn thank_you_email(
    profile: &Profile,
    position: &str,
    company: &str,
    interview_date: &str,
) -> String {
    format!(
        r#"You are a professional career assistant.

Write a short, sincere thank-you email from {name} following an interview on {interview_date} for the {position} position at {company}. Reaffirm interest in the role and thank the interviewer for their time.

Respond with the email body only, ready to send."#,
        name = profile.name,
        interview_date = interview_date,
        position = position,
        company = company,
    )
}

pub fn follow_up_email(
    profile: &Profile,
    position: &str,
    company: &str,
    applied_date: &str,
) -> String {
    format!(
        r#"You are a professional career assistant.

Write a polite follow-up email from {name} about the application submitted on {applied_date} for the {position} position at {company}. Ask about the status of the application without sounding impatient.

Respond with the email body only, ready to send."#,
        name = profile.name,
        applied_date = applied_date,
        position = position,
        company = company,
    )
}

pub fn cv_suggestions(profile: &Profile, cv_text: &str, job_description: Option<&str>) -> String {
    let job_block = job_description
        .map(|job| format!("\nTarget job description:\n{}\n", job))
        .unwrap_or_default();

    format!(
        r#"You are a professional career advisor reviewing a CV.

Applicant details:
{profile}

CV text:
{cv_text}
{job_block}
Give concrete, prioritized suggestions to improve this CV{target}. Focus on content and relevance, not layout."#,
        profile = profile_block(profile),
        cv_text = cv_text,
        job_block = job_block,
        target = if job_description.is_some() {
            " for the target job"
        } else {
            ""
        },
    )
}
