pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::documents::handlers as documents;
use crate::jobs::handlers as jobs;
use crate::profile::handlers as profile;
use crate::state::AppState;
use crate::workflow::handlers as workflows;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Workflow API
        .route("/api/v1/workflows", post(workflows::handle_create_workflow))
        .route(
            "/api/v1/workflows/templates",
            get(workflows::handle_list_templates),
        )
        .route(
            "/api/v1/workflows/:id/execute",
            post(workflows::handle_execute_workflow),
        )
        .route(
            "/api/v1/workflows/:id/status",
            get(workflows::handle_workflow_status),
        )
        .route(
            "/api/v1/workflows/:id/results",
            get(workflows::handle_workflow_results),
        )
        // Profile API
        .route("/api/v1/profile/upload", post(profile::handle_upload_resume))
        .route(
            "/api/v1/profile/:user_id",
            get(profile::handle_get_profile)
                .put(profile::handle_put_profile)
                .delete(profile::handle_delete_profile),
        )
        // Jobs API
        .route("/api/v1/jobs/search", get(jobs::handle_search_jobs))
        // Documents API
        .route(
            "/api/v1/documents/generate",
            post(documents::handle_generate_documents),
        )
        .with_state(state)
}
