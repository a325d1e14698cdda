use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::jobs::{escape_like, normalize_terms, rank_by_profile, JobRecord, JobSearch};
use crate::models::job::JobRow;
use crate::profile::models::Profile;

/// Matches any pattern against title, description or the joined skills list.
const SEARCH_SQL: &str = r#"
    SELECT job_id, title, company, location, description, skills, url, source, created_at
    FROM job_listings
    WHERE title ILIKE ANY($1)
       OR description ILIKE ANY($1)
       OR array_to_string(skills, ' ') ILIKE ANY($1)
    ORDER BY created_at DESC
    LIMIT $2
"#;

/// `JobSearch` over the `job_listings` table in PostgreSQL.
#[derive(Clone)]
pub struct PgJobSearch {
    db: PgPool,
}

impl PgJobSearch {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// `%term%` patterns, one per normalised term.
pub fn like_patterns(terms: &[String]) -> Vec<String> {
    normalize_terms(terms)
        .iter()
        .map(|term| format!("%{}%", escape_like(term)))
        .collect()
}

#[async_trait]
impl JobSearch for PgJobSearch {
    async fn search(
        &self,
        profile: Option<&Profile>,
        terms: &[String],
        limit: i64,
    ) -> anyhow::Result<Vec<JobRecord>> {
        let patterns = like_patterns(terms);
        if patterns.is_empty() || limit <= 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, JobRow>(SEARCH_SQL)
            .bind(&patterns)
            .bind(limit)
            .fetch_all(&self.db)
            .await?;

        debug!("Job search for {:?} returned {} rows", patterns, rows.len());
        let mut jobs: Vec<JobRecord> = rows.into_iter().map(JobRecord::from).collect();
        if let Some(profile) = profile {
            rank_by_profile(&mut jobs, profile);
        }
        Ok(jobs)
    }
}
