//! Resume → `Profile`.
//!
//! Pipeline: extract text (pdf / txt) → LLM structured extraction →
//! heuristic regex parse if the LLM is unavailable or returns garbage.

use std::sync::OnceLock;

use chrono::Utc;
use regex::Regex;
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{CompletionRequest, LlmClient};
use crate::profile::models::{ParsingMethod, Profile, ProfileMetadata};
use crate::profile::prompts::{PARSE_PROMPT_TEMPLATE, PARSE_SYSTEM};
use crate::profile::ProfileError;

/// Resume text beyond this many characters is not sent to the LLM.
const MAX_PROMPT_CHARS: usize = 24_000;

/// Keywords scanned by the heuristic parser, with their display spelling.
const SKILL_KEYWORDS: &[(&str, &str)] = &[
    ("python", "Python"),
    ("javascript", "JavaScript"),
    ("java", "Java"),
    ("react", "React"),
    ("node", "Node.js"),
    ("sql", "SQL"),
    ("aws", "AWS"),
    ("docker", "Docker"),
    ("git", "Git"),
];

#[derive(Clone)]
pub struct ResumeParser {
    /// `None` forces the heuristic parser.
    llm: Option<LlmClient>,
}

impl ResumeParser {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm: Some(llm) }
    }

    /// Parser that never calls the LLM.
    #[cfg(test)]
    pub fn heuristic() -> Self {
        Self { llm: None }
    }

    /// Extracts plain text from an uploaded resume, chosen by file extension.
    pub async fn extract_text(&self, filename: &str, bytes: &[u8]) -> Result<String, ProfileError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let text = match extension.as_str() {
            "pdf" => extract_pdf(bytes.to_vec()).await?,
            "txt" => String::from_utf8_lossy(bytes).into_owned(),
            _ => return Err(ProfileError::UnsupportedFormat(filename.to_string())),
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(ProfileError::EmptyResume);
        }
        Ok(text.to_string())
    }

    /// Parses resume text, preferring the LLM and falling back to heuristics.
    pub async fn parse(&self, resume_text: &str) -> (Profile, ParsingMethod) {
        let Some(llm) = &self.llm else {
            return (parse_heuristic(resume_text), ParsingMethod::Heuristic);
        };

        let truncated: String = resume_text.chars().take(MAX_PROMPT_CHARS).collect();
        let prompt = PARSE_PROMPT_TEMPLATE.replace("{resume_text}", &truncated);
        let system = format!("{PARSE_SYSTEM} {JSON_ONLY_SYSTEM}");

        match llm
            .call_json::<Profile>(&CompletionRequest {
                system: &system,
                prompt: &prompt,
                temperature: 0.0,
                max_tokens: 4096,
            })
            .await
        {
            Ok(profile) => (profile, ParsingMethod::Llm),
            Err(e) => {
                warn!("LLM resume parsing failed, using heuristic parser: {e}");
                (parse_heuristic(resume_text), ParsingMethod::Heuristic)
            }
        }
    }

    /// Full upload pipeline: extract, parse and stamp metadata.
    pub async fn process_upload(&self, filename: &str, bytes: &[u8]) -> Result<Profile, ProfileError> {
        let text = self.extract_text(filename, bytes).await?;
        info!("Extracted {} characters from {}", text.len(), filename);

        let (mut profile, parsing_method) = self.parse(&text).await;
        profile.metadata = Some(ProfileMetadata {
            source_file: filename.to_string(),
            processed_at: Utc::now(),
            text_length: text.chars().count(),
            parsing_method,
        });
        Ok(profile)
    }
}

/// Decodes on the blocking pool. A decoder panic counts as an unreadable file.
async fn extract_pdf(bytes: Vec<u8>) -> Result<String, ProfileError> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| {
            if e.is_panic() {
                ProfileError::Extraction("PDF decoder panicked on this file".to_string())
            } else {
                ProfileError::Internal(format!("spawn_blocking failed in PDF extraction: {e}"))
            }
        })?
        .map_err(|e| ProfileError::Extraction(e.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Heuristic parser
// ────────────────────────────────────────────────────────────────────────────

struct HeuristicPatterns {
    email: Regex,
    phone: Regex,
    linkedin: Regex,
    github: Regex,
    skills: Vec<(Regex, &'static str)>,
}

fn patterns() -> &'static HeuristicPatterns {
    static PATTERNS: OnceLock<HeuristicPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| HeuristicPatterns {
        email: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
            .expect("email pattern is valid"),
        phone: Regex::new(r"(\+\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}")
            .expect("phone pattern is valid"),
        linkedin: Regex::new(r"linkedin\.com/in/[\w-]+").expect("linkedin pattern is valid"),
        github: Regex::new(r"github\.com/[\w-]+").expect("github pattern is valid"),
        skills: SKILL_KEYWORDS
            .iter()
            .map(|(keyword, display)| {
                let re = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword))).expect("skill pattern is valid");
                (re, *display)
            })
            .collect(),
    })
}

/// Deterministic extraction of contact details, name and common skills.
pub fn parse_heuristic(resume_text: &str) -> Profile {
    let p = patterns();
    let first = |re: &Regex| re.find(resume_text).map(|m| m.as_str().to_string());

    Profile {
        name: guess_name(resume_text).unwrap_or_default(),
        email: first(&p.email).unwrap_or_default(),
        phone: first(&p.phone).unwrap_or_default(),
        linkedin_url: first(&p.linkedin)
            .map(|m| format!("https://{m}"))
            .unwrap_or_default(),
        github_url: first(&p.github)
            .map(|m| format!("https://{m}"))
            .unwrap_or_default(),
        technical_skills: p
            .skills
            .iter()
            .filter(|(re, _)| re.is_match(resume_text))
            .map(|(_, display)| display.to_string())
            .collect(),
        ..Default::default()
    }
}

/// First of the opening five lines that looks like a name: at most four
/// words and no contact punctuation.
fn guess_name(resume_text: &str) -> Option<String> {
    resume_text
        .lines()
        .take(5)
        .map(str::trim)
        .find(|line| {
            !line.is_empty()
                && line.split_whitespace().count() <= 4
                && !line.contains(['@', '(', ')', '+'])
                && !line.contains("www")
        })
        .map(str::to_string)
}
