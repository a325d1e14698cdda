use std::sync::Arc;

use crate::config::Config;
use crate::documents::DocumentGenerator;
use crate::jobs::JobSearch;
use crate::profile::parser::ResumeParser;
use crate::profile::store::ProfileStore;
use crate::workflow::orchestrator::WorkflowOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Sole owner of workflow plans.
    pub orchestrator: Arc<WorkflowOrchestrator>,
    /// Redis-backed, or in-memory when REDIS_URL is unset.
    pub profiles: Arc<dyn ProfileStore>,
    pub job_search: Arc<dyn JobSearch>,
    pub documents: Arc<dyn DocumentGenerator>,
    pub resume_parser: ResumeParser,
    pub config: Config,
}
