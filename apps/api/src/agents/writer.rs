use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::documents::storage::document_key;
use crate::documents::{DocumentGenerator, DocumentKind, DocumentStore};
use crate::workflow::executor::{TaskContext, TaskHandler};
use crate::workflow::models::Task;
use crate::workflow::payload::{TailoredDocument, TaskOutput};

/// Owner segment of the document key for plans without a user id.
const ANONYMOUS_USER: &str = "anonymous";

/// resume_creation / cover_letter / interview_prep: one document tailored to
/// the target job, persisted when the store accepts it.
pub struct WriterAgent {
    kind: DocumentKind,
    documents: Arc<dyn DocumentGenerator>,
    store: Arc<dyn DocumentStore>,
}

impl WriterAgent {
    pub fn new(
        kind: DocumentKind,
        documents: Arc<dyn DocumentGenerator>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            kind,
            documents,
            store,
        }
    }
}

#[async_trait]
impl TaskHandler for WriterAgent {
    fn name(&self) -> &'static str {
        match self.kind {
            DocumentKind::Resume => "resume_writer",
            DocumentKind::CoverLetter => "cover_letter_writer",
            DocumentKind::InterviewGuide => "interview_coach",
        }
    }

    async fn execute(&self, task: &Task, ctx: &TaskContext) -> anyhow::Result<TaskOutput> {
        let profile = ctx
            .profile()
            .context("no candidate profile available; profile setup must complete first")?;
        let job = ctx
            .target_job()
            .context("no target job: the search found nothing and no target_job was supplied")?;

        let text = match self.kind {
            DocumentKind::Resume => self.documents.resume(profile, job).await?,
            DocumentKind::CoverLetter => self.documents.cover_letter(profile, job).await?,
            DocumentKind::InterviewGuide => self.documents.interview_guide(profile, job).await?,
        };

        let key = document_key(
            ctx.user_id().unwrap_or(ANONYMOUS_USER),
            &ctx.plan_id,
            self.kind,
            &job.id,
        );
        // The text is still returned when the upload fails.
        let document_key = match self.store.put(&key, &text).await {
            Ok(key) => Some(key),
            Err(e) => {
                warn!("Task {}: could not store {}: {e:#}", task.id, key);
                None
            }
        };
        info!("Task {}: {} ready for {}", task.id, self.kind.as_str(), job.company);

        let document = TailoredDocument {
            job_id: job.id.clone(),
            job_title: job.title.clone(),
            company: job.company.clone(),
            text,
            document_key,
        };
        Ok(match self.kind {
            DocumentKind::Resume => TaskOutput::ResumeCreated(document),
            DocumentKind::CoverLetter => TaskOutput::CoverLetterCreated(document),
            DocumentKind::InterviewGuide => TaskOutput::InterviewGuideReady(document),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{MemoryDocumentStore, StubDocuments};
    use crate::jobs::JobRecord;
    use crate::workflow::classifier::GoalClassification;
    use crate::workflow::executor::testing::canned_output;
    use crate::workflow::models::{TaskType, UserData};

    fn context(completed: Vec<TaskOutput>, target_job: Option<JobRecord>) -> TaskContext {
        TaskContext {
            plan_id: "plan-1".to_string(),
            goal: "goal".to_string(),
            classification: GoalClassification::fallback("goal"),
            user_data: UserData {
                user_id: Some("u-1".to_string()),
                target_job,
                ..Default::default()
            },
            completed,
        }
    }

    #[tokio::test]
    async fn test_resume_tailored_to_top_match_and_stored() {
        let store = Arc::new(MemoryDocumentStore::default());
        let agent = WriterAgent::new(DocumentKind::Resume, Arc::new(StubDocuments), store.clone());
        let ctx = context(
            vec![
                canned_output(TaskType::ProfileSetup),
                canned_output(TaskType::JobSearch),
            ],
            None,
        );

        let output = agent
            .execute(&Task::new("t", TaskType::ResumeCreation, "resume"), &ctx)
            .await
            .unwrap();

        let TaskOutput::ResumeCreated(doc) = output else {
            panic!("expected a resume");
        };
        assert_eq!(doc.job_id, "job-1");
        assert_eq!(doc.text, "resume for Senior Python Engineer at Insight Analytics");
        assert_eq!(doc.document_key.as_deref(), Some("documents/u-1/plan-1/resume-job-1.md"));
        assert_eq!(store.stored.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_interview_guide_uses_target_job_without_search() {
        let agent = WriterAgent::new(
            DocumentKind::InterviewGuide,
            Arc::new(StubDocuments),
            Arc::new(MemoryDocumentStore::default()),
        );
        assert_eq!(agent.name(), "interview_coach");
        let ctx = context(
            vec![canned_output(TaskType::ProfileSetup)],
            Some(JobRecord::new("t-9", "Staff Engineer", "Acme")),
        );

        let output = agent
            .execute(&Task::new("t", TaskType::InterviewPrep, "interview"), &ctx)
            .await
            .unwrap();
        let TaskOutput::InterviewGuideReady(doc) = output else {
            panic!("expected a guide");
        };
        assert_eq!(doc.company, "Acme");
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_text() {
        let store = Arc::new(MemoryDocumentStore {
            fail: true,
            ..Default::default()
        });
        let agent = WriterAgent::new(DocumentKind::CoverLetter, Arc::new(StubDocuments), store);
        let ctx = context(
            vec![
                canned_output(TaskType::ProfileSetup),
                canned_output(TaskType::JobSearch),
            ],
            None,
        );

        let output = agent
            .execute(&Task::new("t", TaskType::CoverLetter, "letter"), &ctx)
            .await
            .unwrap();
        let TaskOutput::CoverLetterCreated(doc) = output else {
            panic!("expected a cover letter");
        };
        assert!(doc.document_key.is_none());
        assert!(doc.text.starts_with("cover-letter for"));
    }

    #[tokio::test]
    async fn test_fails_without_job() {
        let agent = WriterAgent::new(
            DocumentKind::Resume,
            Arc::new(StubDocuments),
            Arc::new(MemoryDocumentStore::default()),
        );
        let ctx = context(
            vec![
                canned_output(TaskType::ProfileSetup),
                TaskOutput::jobs_found(vec![], vec!["cobol".to_string()]),
            ],
            None,
        );
        let err = agent
            .execute(&Task::new("t", TaskType::ResumeCreation, "resume"), &ctx)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no target job"));
    }
}
