use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::jobs::JobRecord;

/// Row of the `job_listings` table:
///
/// ```sql
/// CREATE TABLE job_listings (
///     job_id      TEXT PRIMARY KEY,
///     title       TEXT NOT NULL,
///     company     TEXT NOT NULL,
///     location    TEXT,
///     description TEXT NOT NULL DEFAULT '',
///     skills      TEXT[] NOT NULL DEFAULT '{}',
///     url         TEXT,
///     source      TEXT,
///     created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
/// );
/// ```
#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub job_id: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: String,
    pub skills: Vec<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<JobRow> for JobRecord {
    fn from(row: JobRow) -> Self {
        JobRecord {
            location: row.location,
            description: row.description,
            skills: row.skills,
            url: row.url,
            source: row.source,
            posted_at: Some(row.created_at),
            ..JobRecord::new(row.job_id, row.title, row.company)
        }
    }
}
