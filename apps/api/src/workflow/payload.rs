//! Typed task outputs. One variant per task type; the orchestrator stores them
//! opaquely and only `results` looks inside to derive deliverables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::jobs::JobRecord;
use crate::profile::models::Profile;
use crate::workflow::models::TaskType;

/// A generated document tailored to one job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredDocument {
    pub job_id: String,
    pub job_title: String,
    pub company: String,
    pub text: String,
    /// Storage key of the uploaded markdown, when it was persisted.
    pub document_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionMode {
    /// Source supports direct submission.
    Auto,
    /// User submits manually following the checklist.
    Checklist,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationItem {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub url: Option<String>,
    pub mode: SubmissionMode,
    pub materials_ready: bool,
    pub checklist: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpReminder {
    pub job_id: String,
    pub company: String,
    pub due_at: DateTime<Utc>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskOutput {
    ProfileReady {
        profile: Profile,
        validation_issues: Vec<String>,
    },
    JobsFound {
        search_terms: Vec<String>,
        count: usize,
        jobs: Vec<JobRecord>,
    },
    ResumeCreated(TailoredDocument),
    CoverLetterCreated(TailoredDocument),
    ApplicationsPrepared {
        applications: Vec<ApplicationItem>,
    },
    InterviewGuideReady(TailoredDocument),
    FollowUpsScheduled {
        reminders: Vec<FollowUpReminder>,
    },
}

impl TaskOutput {
    /// The task type that produces this kind of output.
    pub fn task_type(&self) -> TaskType {
        match self {
            TaskOutput::ProfileReady { .. } => TaskType::ProfileSetup,
            TaskOutput::JobsFound { .. } => TaskType::JobSearch,
            TaskOutput::ResumeCreated(_) => TaskType::ResumeCreation,
            TaskOutput::CoverLetterCreated(_) => TaskType::CoverLetter,
            TaskOutput::ApplicationsPrepared { .. } => TaskType::ApplicationPrep,
            TaskOutput::InterviewGuideReady(_) => TaskType::InterviewPrep,
            TaskOutput::FollowUpsScheduled { .. } => TaskType::FollowUp,
        }
    }

    pub fn jobs_found(jobs: Vec<JobRecord>, search_terms: Vec<String>) -> Self {
        TaskOutput::JobsFound {
            search_terms,
            count: jobs.len(),
            jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_serializes_with_kind_tag() {
        let output = TaskOutput::jobs_found(vec![], vec!["rust".to_string()]);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["kind"], "jobs_found");
        assert_eq!(json["count"], 0);
    }

    #[test]
    fn test_newtype_variant_flattens_document_fields() {
        let output = TaskOutput::ResumeCreated(TailoredDocument {
            job_id: "job-1".to_string(),
            job_title: "Backend Engineer".to_string(),
            company: "CloudCore".to_string(),
            text: "# Resume".to_string(),
            document_key: Some("documents/u/p/resume-job-1.md".to_string()),
        });
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["kind"], "resume_created");
        assert_eq!(json["company"], "CloudCore");
        assert_eq!(output.task_type(), TaskType::ResumeCreation);
    }
}
