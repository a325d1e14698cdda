use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::{normalize_terms, JobRecord};
use crate::state::AppState;

const MAX_SEARCH_LIMIT: i64 = 100;

#[derive(Deserialize)]
pub struct JobSearchQuery {
    /// Comma-separated search terms.
    pub q: String,
    pub limit: Option<i64>,
    /// Ranks results against this user's stored profile.
    pub user_id: Option<String>,
}

#[derive(Serialize)]
pub struct JobSearchResponse {
    pub search_terms: Vec<String>,
    pub count: usize,
    pub jobs: Vec<JobRecord>,
}

/// GET /api/v1/jobs/search?q=python,data engineer&limit=10&user_id=u-1
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobSearchQuery>,
) -> Result<Json<JobSearchResponse>, AppError> {
    let terms = normalize_terms(params.q.split(','));
    if terms.is_empty() {
        return Err(AppError::Validation("q must contain at least one search term".to_string()));
    }

    let limit = params
        .limit
        .unwrap_or(state.config.job_search_limit)
        .clamp(1, MAX_SEARCH_LIMIT);

    let profile = match &params.user_id {
        Some(user_id) => state.profiles.get(user_id).await?,
        None => None,
    };

    let jobs = state.job_search.search(profile.as_ref(), &terms, limit).await?;
    Ok(Json(JobSearchResponse {
        search_terms: terms,
        count: jobs.len(),
        jobs,
    }))
}
