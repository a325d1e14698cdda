//! Workflow orchestrator: the single owner and writer of every plan.
//!
//! Boundary operations:
//! - `create_plan`  classify goal → build plan → register
//! - `execute_plan` run tasks in dependency order until nothing is runnable
//! - `get_status`   status report with progress
//! - `combine_results` deliverables and next steps, or "not ready"

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::workflow::classifier::{GoalClassification, GoalClassifier};
use crate::workflow::executor::{TaskContext, TaskExecutor, TaskOutcome};
use crate::workflow::models::{UserData, WorkflowPlan};
use crate::workflow::planner::build_plan;
use crate::workflow::registry::{PlanEntry, PlanRegistry};
use crate::workflow::results::{
    combine_results, execution_summary, status_report, ExecutionSummary, PlanResults,
    PlanStatusReport,
};
use crate::workflow::scheduler::next_runnable;
use crate::workflow::WorkflowError;

/// What happens to the dependents of a failed task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Dependents stay pending and are reported as blocked.
    #[default]
    LeaveBlocked,
    /// Dependents are marked cancelled as soon as the prerequisite fails.
    CascadeCancel,
}

pub struct WorkflowOrchestrator {
    classifier: Arc<dyn GoalClassifier>,
    executor: Arc<TaskExecutor>,
    registry: PlanRegistry,
    failure_policy: FailurePolicy,
}

impl WorkflowOrchestrator {
    pub fn new(
        classifier: Arc<dyn GoalClassifier>,
        executor: TaskExecutor,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            classifier,
            executor: Arc::new(executor),
            registry: PlanRegistry::new(),
            failure_policy,
        }
    }

    pub fn handler_names(&self) -> Vec<String> {
        self.executor.handler_names()
    }

    pub async fn plan_count(&self) -> usize {
        self.registry.len().await
    }

    /// Classifies the goal, builds a plan from the selected template and
    /// registers it. Classification failures fall back to the default template.
    pub async fn create_plan(
        &self,
        user_goal: &str,
        user_data: UserData,
    ) -> Result<WorkflowPlan, WorkflowError> {
        let classification = self.classify(user_goal, &user_data).await;
        let plan = build_plan(user_goal, classification, user_data)?;

        info!(
            "Created plan {} from template '{}' ({} tasks, urgency {:?})",
            plan.id,
            plan.template_name,
            plan.tasks.len(),
            plan.classification.urgency
        );

        self.registry.insert(plan.clone()).await;
        Ok(plan)
    }

    /// Registers an already-built plan and returns its id.
    #[cfg(test)]
    pub async fn register_plan(&self, plan: WorkflowPlan) -> String {
        let id = plan.id.clone();
        self.registry.insert(plan).await;
        id
    }

    async fn classify(&self, user_goal: &str, user_data: &UserData) -> GoalClassification {
        match self.classifier.classify(user_goal, user_data).await {
            Ok(classification) => {
                debug!(
                    "Goal classified as '{}' ({:?})",
                    classification.template_name, classification.urgency
                );
                classification
            }
            Err(e) => {
                let fallback = GoalClassification::fallback(user_goal);
                warn!(
                    "Goal classification failed, falling back to '{}': {e:#}",
                    fallback.template_name
                );
                fallback
            }
        }
    }

    /// Runs a plan to a terminal status.
    ///
    /// The run itself is a spawned task that owns the plan entry, so a caller
    /// that stops waiting (a dropped HTTP request) never strands a task
    /// in progress; a later call waits on the run lock and gets the summary.
    pub async fn execute_plan(&self, plan_id: &str) -> Result<ExecutionSummary, WorkflowError> {
        let entry = self.entry(plan_id).await?;
        let run = PlanRun {
            plan_id: plan_id.to_string(),
            entry,
            executor: self.executor.clone(),
            failure_policy: self.failure_policy,
        };

        tokio::spawn(run.execute()).await.map_err(|e| {
            error!("Execution of plan {plan_id} aborted: {e}");
            WorkflowError::ExecutionAborted(plan_id.to_string())
        })
    }

    pub async fn get_status(&self, plan_id: &str) -> Result<PlanStatusReport, WorkflowError> {
        let entry = self.entry(plan_id).await?;
        let slot = entry.state.read().await;
        Ok(status_report(&slot.plan))
    }

    pub async fn combine_results(&self, plan_id: &str) -> Result<PlanResults, WorkflowError> {
        let entry = self.entry(plan_id).await?;
        let slot = entry.state.read().await;
        Ok(combine_results(&slot.plan))
    }

    /// Snapshot of the plan as it currently stands.
    #[cfg(test)]
    pub async fn plan(&self, plan_id: &str) -> Result<WorkflowPlan, WorkflowError> {
        let entry = self.entry(plan_id).await?;
        let slot = entry.state.read().await;
        Ok(slot.plan.clone())
    }

    async fn entry(&self, plan_id: &str) -> Result<Arc<PlanEntry>, WorkflowError> {
        self.registry
            .get(plan_id)
            .await
            .ok_or_else(|| WorkflowError::PlanNotFound(plan_id.to_string()))
    }
}

/// One execution of one plan, detached from the caller.
struct PlanRun {
    plan_id: String,
    entry: Arc<PlanEntry>,
    executor: Arc<TaskExecutor>,
    failure_policy: FailurePolicy,
}

impl PlanRun {
    /// Each round starts exactly one pending task, so the loop is bounded by
    /// the task count even if a plan is malformed. Re-invoking on a terminal
    /// plan returns the cached summary without touching any handler.
    async fn execute(self) -> ExecutionSummary {
        let plan_id = self.plan_id.as_str();
        let _run = self.entry.run_lock.lock().await;

        let rounds = {
            let mut slot = self.entry.state.write().await;
            if let Some(summary) = &slot.summary {
                debug!("Plan {plan_id} already finished, returning cached summary");
                return summary.clone();
            }
            if slot.plan.status.is_terminal() {
                let summary = execution_summary(&slot.plan);
                slot.summary = Some(summary.clone());
                return summary;
            }
            slot.plan.mark_running();
            info!("Executing plan {} ({} tasks)", plan_id, slot.plan.tasks.len());
            slot.plan.tasks.len()
        };

        for _ in 0..rounds {
            if !self.run_next_task().await {
                break;
            }
        }

        let mut slot = self.entry.state.write().await;
        let settled = slot.plan.is_settled();
        slot.plan.finalize();
        let summary = execution_summary(&slot.plan);

        if !settled {
            warn!(
                "Plan {} stalled with {} blocked tasks",
                plan_id,
                summary.blocked_tasks.len()
            );
        }
        info!(
            "Plan {} finished: {:?} ({}% complete)",
            plan_id, summary.status, summary.progress.percentage
        );

        slot.summary = Some(summary.clone());
        summary
    }

    /// Selects, runs and records one task. Returns false when nothing is runnable.
    async fn run_next_task(&self) -> bool {
        let (index, task, ctx) = {
            let mut slot = self.entry.state.write().await;
            let Some(index) = next_runnable(&slot.plan.tasks) else {
                return false;
            };
            let ctx = TaskContext::for_plan(&slot.plan);
            let task = &mut slot.plan.tasks[index];
            task.start();
            info!("Task {} ({}) started", task.id, task.task_type.as_str());
            (index, task.clone(), ctx)
        };

        let outcome = self.executor.run(&task, &ctx).await;

        let mut slot = self.entry.state.write().await;
        match outcome {
            TaskOutcome::Completed(output) => {
                slot.plan.tasks[index].complete(output);
                info!("Task {} completed", task.id);
            }
            TaskOutcome::Failed(message) => {
                warn!("Task {} failed: {}", task.id, message);
                slot.plan.tasks[index].fail(message);
                if self.failure_policy == FailurePolicy::CascadeCancel {
                    let cancelled = slot.plan.cancel_dependents(&task.id);
                    if !cancelled.is_empty() {
                        info!("Cancelled {:?} after {} failed", cancelled, task.id);
                    }
                }
            }
        }
        true
    }
}
