//! Concrete task handlers, one per task type, registered on the executor by
//! handler name. Each agent reads prior outputs from the `TaskContext` and
//! returns a typed `TaskOutput`.

pub mod application;
pub mod job_scout;
pub mod profile_agent;
pub mod writer;

use std::sync::Arc;

use crate::documents::{DocumentGenerator, DocumentKind, DocumentStore};
use crate::jobs::JobSearch;
use crate::profile::parser::ResumeParser;
use crate::profile::store::ProfileStore;
use crate::workflow::executor::TaskExecutor;

use application::{ApplicationAgent, FollowUpAgent};
use job_scout::JobScoutAgent;
use profile_agent::ProfileAgent;
use writer::WriterAgent;

/// Collaborators shared by the agents.
#[derive(Clone)]
pub struct AgentDeps {
    pub profiles: Arc<dyn ProfileStore>,
    pub resume_parser: ResumeParser,
    pub job_search: Arc<dyn JobSearch>,
    pub job_search_limit: i64,
    pub documents: Arc<dyn DocumentGenerator>,
    pub document_store: Arc<dyn DocumentStore>,
}

/// Registers a handler for every task type.
pub fn register_default_handlers(executor: &mut TaskExecutor, deps: &AgentDeps) {
    executor.register(Arc::new(ProfileAgent::new(
        deps.profiles.clone(),
        deps.resume_parser.clone(),
    )));
    executor.register(Arc::new(JobScoutAgent::new(
        deps.job_search.clone(),
        deps.job_search_limit,
    )));
    for kind in [
        DocumentKind::Resume,
        DocumentKind::CoverLetter,
        DocumentKind::InterviewGuide,
    ] {
        executor.register(Arc::new(WriterAgent::new(
            kind,
            deps.documents.clone(),
            deps.document_store.clone(),
        )));
    }
    executor.register(Arc::new(ApplicationAgent));
    executor.register(Arc::new(FollowUpAgent));
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory collaborators for agent and router tests.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::jobs::{rank_by_profile, JobRecord};
    use crate::profile::models::Profile;
    use crate::profile::store::InMemoryProfileStore;

    /// Returns canned jobs and records the terms it was asked for.
    #[derive(Default)]
    pub struct StubJobSearch {
        pub jobs: Vec<JobRecord>,
        pub queries: Mutex<Vec<Vec<String>>>,
    }

    impl StubJobSearch {
        pub fn with_jobs(jobs: Vec<JobRecord>) -> Self {
            Self {
                jobs,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl JobSearch for StubJobSearch {
        async fn search(
            &self,
            profile: Option<&Profile>,
            terms: &[String],
            limit: i64,
        ) -> anyhow::Result<Vec<JobRecord>> {
            self.queries.lock().unwrap().push(terms.to_vec());
            let mut jobs = self.jobs.clone();
            if let Some(profile) = profile {
                rank_by_profile(&mut jobs, profile);
            }
            jobs.truncate(limit.max(0) as usize);
            Ok(jobs)
        }
    }

    /// Writes "{kind} for {title} at {company}".
    pub struct StubDocuments;

    #[async_trait]
    impl DocumentGenerator for StubDocuments {
        async fn write(
            &self,
            kind: DocumentKind,
            _profile: &Profile,
            job: &JobRecord,
        ) -> anyhow::Result<String> {
            Ok(format!("{} for {} at {}", kind.as_str(), job.title, job.company))
        }
    }

    /// Keeps documents in memory; optionally fails every upload.
    #[derive(Default)]
    pub struct MemoryDocumentStore {
        pub fail: bool,
        pub stored: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl DocumentStore for MemoryDocumentStore {
        async fn put(&self, key: &str, markdown: &str) -> anyhow::Result<String> {
            if self.fail {
                anyhow::bail!("bucket unavailable");
            }
            self.stored
                .lock()
                .unwrap()
                .push((key.to_string(), markdown.to_string()));
            Ok(key.to_string())
        }
    }

    pub fn deps_with_jobs(jobs: Vec<JobRecord>) -> AgentDeps {
        AgentDeps {
            profiles: Arc::new(InMemoryProfileStore::new()),
            resume_parser: ResumeParser::heuristic(),
            job_search: Arc::new(StubJobSearch::with_jobs(jobs)),
            job_search_limit: 10,
            documents: Arc::new(StubDocuments),
            document_store: Arc::new(MemoryDocumentStore::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::deps_with_jobs;
    use super::*;

    #[test]
    fn test_every_task_type_has_a_handler() {
        let mut executor = TaskExecutor::new(None);
        register_default_handlers(&mut executor, &deps_with_jobs(vec![]));

        let names = executor.handler_names();
        for task_type in [
            crate::workflow::models::TaskType::ProfileSetup,
            crate::workflow::models::TaskType::JobSearch,
            crate::workflow::models::TaskType::ResumeCreation,
            crate::workflow::models::TaskType::CoverLetter,
            crate::workflow::models::TaskType::ApplicationPrep,
            crate::workflow::models::TaskType::InterviewPrep,
            crate::workflow::models::TaskType::FollowUp,
        ] {
            assert!(
                names.iter().any(|n| n == task_type.default_handler()),
                "missing handler for {task_type:?}"
            );
        }
        assert_eq!(names.len(), 7);
    }
}
