use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub description: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub graduation_date: String,
    pub location: String,
    pub gpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub duration: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub expiry: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsingMethod {
    Llm,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    pub source_file: String,
    pub processed_at: DateTime<Utc>,
    pub text_length: usize,
    pub parsing_method: ParsingMethod,
}

/// Candidate profile, as extracted from a resume or supplied by the user.
/// Every field defaults, so partial JSON from the LLM still deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin_url: String,
    pub github_url: String,
    pub portfolio_url: String,
    pub title: String,
    pub years_experience: i64,
    pub summary: String,
    pub technical_skills: Vec<String>,
    pub frameworks: Vec<String>,
    pub tools: Vec<String>,
    pub soft_skills: Vec<String>,
    pub languages: Vec<String>,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProfileMetadata>,
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("EMAIL_REGEX is valid")
    })
}

impl Profile {
    /// Human-readable problems with the profile. Empty means usable.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push("Missing required field: name".to_string());
        }
        let email = self.email.trim();
        if email.is_empty() {
            issues.push("Missing required field: email".to_string());
        } else if !email_regex().is_match(email) {
            issues.push("Invalid email format".to_string());
        }
        if !(0..=50).contains(&self.years_experience) {
            issues.push("Invalid years of experience".to_string());
        }
        issues
    }

    /// Technical skills, frameworks and tools with case-insensitive duplicates removed.
    pub fn skills(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.technical_skills
            .iter()
            .chain(&self.frameworks)
            .chain(&self.tools)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty() && seen.insert(s.to_lowercase()))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> Profile {
        Profile {
            name: "Jane Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            years_experience: 6,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_profile_has_no_issues() {
        assert!(jane().validate().is_empty());
    }

    #[test]
    fn test_missing_name_and_email() {
        let issues = Profile::default().validate();
        assert_eq!(
            issues,
            vec![
                "Missing required field: name".to_string(),
                "Missing required field: email".to_string()
            ]
        );
    }

    #[test]
    fn test_invalid_email_and_experience() {
        let profile = Profile {
            email: "jane@".to_string(),
            years_experience: 51,
            ..jane()
        };
        let issues = profile.validate();
        assert!(issues.contains(&"Invalid email format".to_string()));
        assert!(issues.contains(&"Invalid years of experience".to_string()));
    }

    #[test]
    fn test_skills_union_dedupes() {
        let profile = Profile {
            technical_skills: vec!["Python".to_string(), "SQL".to_string()],
            frameworks: vec!["FastAPI".to_string(), "python".to_string()],
            tools: vec!["Docker".to_string(), " ".to_string()],
            ..Default::default()
        };
        assert_eq!(profile.skills(), vec!["Python", "SQL", "FastAPI", "Docker"]);
    }

    #[test]
    fn test_partial_json_deserializes() {
        let profile: Profile =
            serde_json::from_str(r#"{"name": "Jane Smith", "work_experience": [{"company": "Acme"}]}"#)
                .unwrap();
        assert_eq!(profile.name, "Jane Smith");
        assert_eq!(profile.work_experience[0].company, "Acme");
        assert_eq!(profile.years_experience, 0);
        assert!(profile.metadata.is_none());
    }
}
