//! Candidate profiles: resume text extraction and parsing, validation and
//! per-user storage (Redis, or in-memory when Redis is not configured).

pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
pub mod store;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Unsupported resume format '{0}' (expected .pdf or .txt)")]
    UnsupportedFormat(String),

    #[error("Could not extract text from resume: {0}")]
    Extraction(String),

    #[error("Resume contains no text")]
    EmptyResume,

    #[error("Resume processing failed: {0}")]
    Internal(String),
}
