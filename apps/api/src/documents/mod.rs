//! Application documents: tailored resumes, cover letters and interview
//! guides generated from a profile and a job, persisted as markdown.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod storage;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::jobs::JobRecord;
use crate::profile::models::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
    InterviewGuide,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover-letter",
            DocumentKind::InterviewGuide => "interview-guide",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDocuments {
    pub resume_text: String,
    pub cover_letter_text: String,
}

#[async_trait]
pub trait DocumentGenerator: Send + Sync {
    async fn write(
        &self,
        kind: DocumentKind,
        profile: &Profile,
        job: &JobRecord,
    ) -> anyhow::Result<String>;

    async fn resume(&self, profile: &Profile, job: &JobRecord) -> anyhow::Result<String> {
        self.write(DocumentKind::Resume, profile, job).await
    }

    async fn cover_letter(&self, profile: &Profile, job: &JobRecord) -> anyhow::Result<String> {
        self.write(DocumentKind::CoverLetter, profile, job).await
    }

    async fn interview_guide(&self, profile: &Profile, job: &JobRecord) -> anyhow::Result<String> {
        self.write(DocumentKind::InterviewGuide, profile, job).await
    }

    /// Resume and cover letter for one job.
    async fn generate(&self, profile: &Profile, job: &JobRecord) -> anyhow::Result<GeneratedDocuments> {
        let resume_text = self.resume(profile, job).await?;
        let cover_letter_text = self.cover_letter(profile, job).await?;
        Ok(GeneratedDocuments {
            resume_text,
            cover_letter_text,
        })
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores markdown under `key` and returns the key.
    async fn put(&self, key: &str, markdown: &str) -> anyhow::Result<String>;
}
