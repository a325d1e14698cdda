//! Dependency resolution.
//!
//! Selection is first match in declaration order: priority is not consulted.
//! A task is runnable when it is pending and every id in `depends_on` is
//! completed. A task behind a failed prerequisite or on a cycle never becomes
//! runnable, so the loop ends when `next_runnable` returns `None`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::workflow::models::{Task, TaskStatus, WorkflowPlan};

/// Index of the next task eligible to run, if any.
pub fn next_runnable(tasks: &[Task]) -> Option<usize> {
    let completed: HashSet<&str> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .map(|t| t.id.as_str())
        .collect();

    tasks.iter().position(|task| {
        task.status == TaskStatus::Pending
            && task.depends_on.iter().all(|dep| completed.contains(dep.as_str()))
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    /// A prerequisite failed or was cancelled.
    DependencyFailed,
    /// The task sits on a dependency cycle.
    DependencyCycle,
    /// A prerequisite is itself blocked.
    DependencyBlocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedTask {
    pub task_id: String,
    pub reason: BlockReason,
    /// The prerequisite responsible for the block.
    pub dependency: String,
}

/// Explains why each non-terminal task could not run.
pub fn blocked_tasks(plan: &WorkflowPlan) -> Vec<BlockedTask> {
    plan.tasks
        .iter()
        .filter(|t| !t.is_terminal())
        .filter_map(|task| {
            let unmet: Vec<&String> = task
                .depends_on
                .iter()
                .filter(|dep| {
                    plan.task(dep)
                        .map(|d| d.status != TaskStatus::Completed)
                        .unwrap_or(true)
                })
                .collect();

            if plan.is_on_cycle(&task.id) {
                let dependency = unmet
                    .iter()
                    .find(|dep| plan.is_on_cycle(dep))
                    .or(unmet.first())?;
                return Some(BlockedTask {
                    task_id: task.id.clone(),
                    reason: BlockReason::DependencyCycle,
                    dependency: (*dependency).clone(),
                });
            }

            if let Some(failed) = unmet.iter().find(|dep| {
                plan.task(dep).map_or(false, |d| {
                    matches!(d.status, TaskStatus::Failed | TaskStatus::Cancelled)
                })
            }) {
                return Some(BlockedTask {
                    task_id: task.id.clone(),
                    reason: BlockReason::DependencyFailed,
                    dependency: (*failed).clone(),
                });
            }

            unmet.first().map(|dep| BlockedTask {
                task_id: task.id.clone(),
                reason: BlockReason::DependencyBlocked,
                dependency: (*dep).clone(),
            })
        })
        .collect()
}
