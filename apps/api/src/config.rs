use std::time::Duration;

use anyhow::{Context, Result};

use crate::workflow::orchestrator::FailurePolicy;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Profiles are kept in process memory when unset.
    pub redis_url: Option<String>,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub job_search_limit: i64,
    /// `None` when `TASK_TIMEOUT_SECS=0`.
    pub task_timeout: Option<Duration>,
    pub failure_policy: FailurePolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let task_timeout_secs: u64 = parse_or(&lookup, "TASK_TIMEOUT_SECS", 120)?;
        let cascade: bool = parse_or(&lookup, "CASCADE_FAILED_DEPENDENCIES", false)?;

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            redis_url: lookup("REDIS_URL").filter(|v| !v.trim().is_empty()),
            s3_bucket: require("S3_BUCKET")?,
            s3_endpoint: require("S3_ENDPOINT")?,
            aws_access_key_id: require("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            anthropic_api_key: require("ANTHROPIC_API_KEY")?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            job_search_limit: parse_or(&lookup, "JOB_SEARCH_LIMIT", 10)?,
            task_timeout: (task_timeout_secs > 0).then(|| Duration::from_secs(task_timeout_secs)),
            failure_policy: if cascade {
                FailurePolicy::CascadeCancel
            } else {
                FailurePolicy::LeaveBlocked
            },
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
