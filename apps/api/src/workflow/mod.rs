//! Workflow orchestration: turns a user goal into a dependency-ordered plan of
//! tasks, runs them one at a time and aggregates their outputs.
//!
//! Flow: classify goal → pick template → build plan → execute in dependency
//! order → status / combined results.
//!
//! The orchestrator is handler-agnostic: concrete agents live in `crate::agents`
//! and are registered on the `TaskExecutor` by handler name.

pub mod classifier;
pub mod executor;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod payload;
pub mod planner;
pub mod prompts;
pub mod registry;
pub mod results;
pub mod scheduler;
pub mod templates;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Workflow plan {0} not found")]
    PlanNotFound(String),

    #[error("Unknown workflow template '{0}'")]
    UnknownTemplate(String),

    #[error("Invalid workflow template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("Invalid workflow plan: {0}")]
    InvalidPlan(String),

    #[error("Execution of workflow plan {0} was aborted")]
    ExecutionAborted(String),
}
