//! Job listings: the record type shared with the workflow, search-term
//! normalisation and the `JobSearch` seam.

pub mod handlers;
pub mod search;

use std::cmp::Reverse;
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::models::Profile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Listing source, e.g. "indeed" or "linkedin".
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            company: company.into(),
            location: None,
            description: String::new(),
            skills: Vec::new(),
            url: None,
            source: None,
            posted_at: None,
        }
    }
}

#[async_trait]
pub trait JobSearch: Send + Sync {
    /// Listings matching any of `terms`, at most `limit`. Newest first, or
    /// ranked by skill overlap when a candidate profile is given.
    async fn search(
        &self,
        profile: Option<&Profile>,
        terms: &[String],
        limit: i64,
    ) -> anyhow::Result<Vec<JobRecord>>;
}

/// How many of the candidate's skills the listing asks for.
pub fn skill_overlap(job: &JobRecord, profile_skills: &HashSet<String>) -> usize {
    job.skills
        .iter()
        .filter(|skill| profile_skills.contains(&skill.to_lowercase()))
        .count()
}

/// Listings sharing more skills with the profile come first; ties keep
/// their existing order.
pub fn rank_by_profile(jobs: &mut [JobRecord], profile: &Profile) {
    let skills: HashSet<String> = profile.skills().iter().map(|s| s.to_lowercase()).collect();
    if skills.is_empty() {
        return;
    }
    jobs.sort_by_cached_key(|job| Reverse(skill_overlap(job, &skills)));
}

/// Trims terms, drops blanks and removes case-insensitive duplicates,
/// keeping the first spelling seen.
pub fn normalize_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    terms
        .into_iter()
        .filter_map(|term| {
            let term = term.as_ref().trim();
            if term.is_empty() || !seen.insert(term.to_lowercase()) {
                return None;
            }
            Some(term.to_string())
        })
        .collect()
}

/// Escapes LIKE metacharacters so a term only ever matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_dedupes_case_insensitively() {
        let terms = normalize_terms(["  Python ", "python", "", "   ", "Data Engineer", "PYTHON"]);
        assert_eq!(terms, vec!["Python", "Data Engineer"]);
    }

    #[test]
    fn test_normalize_empty_input() {
        assert!(normalize_terms(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("100%_remote\\"), "100\\%\\_remote\\\\");
        assert_eq!(escape_like("rust"), "rust");
    }

    #[test]
    fn test_rank_by_profile_prefers_skill_overlap() {
        let job = |id: &str, skills: &[&str]| JobRecord {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..JobRecord::new(id, "Engineer", "Acme")
        };
        let mut jobs = vec![
            job("newest", &["Go"]),
            job("one", &["sql"]),
            job("two", &["Spark", "SQL"]),
            job("also-one", &["SPARK"]),
        ];
        let profile = Profile {
            technical_skills: vec!["SQL".to_string(), "Spark".to_string()],
            ..Default::default()
        };

        rank_by_profile(&mut jobs, &profile);

        let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["two", "one", "also-one", "newest"]);
    }

    #[test]
    fn test_rank_without_profile_skills_keeps_order() {
        let mut jobs = vec![JobRecord::new("a", "A", "X"), JobRecord::new("b", "B", "Y")];
        rank_by_profile(&mut jobs, &Profile::default());
        assert_eq!(jobs[0].id, "a");
    }

    #[test]
    fn test_job_record_deserializes_with_defaults() {
        let job: JobRecord = serde_json::from_str(
            r#"{"id": "j1", "title": "Data Engineer", "company": "Insight Analytics"}"#,
        )
        .unwrap();
        assert_eq!(job, JobRecord::new("j1", "Data Engineer", "Insight Analytics"));
    }
}
