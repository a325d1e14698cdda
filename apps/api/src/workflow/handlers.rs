use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::errors::AppError;
use crate::state::AppState;
use crate::workflow::classifier::GoalClassification;
use crate::workflow::models::{PlanStatus, TaskType, UserData, WorkflowPlan};
use crate::workflow::results::{ExecutionSummary, PlanResults, PlanStatusReport};
use crate::workflow::templates::{all_templates, WorkflowTemplate};

#[derive(Deserialize)]
pub struct CreateWorkflowRequest {
    pub user_goal: String,
    #[serde(default)]
    pub user_data: UserData,
}

#[derive(Serialize)]
pub struct PlannedTask {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub description: String,
    pub depends_on: BTreeSet<String>,
    pub estimated_minutes: i64,
}

#[derive(Serialize)]
pub struct WorkflowCreatedResponse {
    pub plan_id: String,
    pub template_name: String,
    pub classification: GoalClassification,
    pub status: PlanStatus,
    pub tasks: Vec<PlannedTask>,
    pub estimated_completion: DateTime<Utc>,
}

impl From<&WorkflowPlan> for WorkflowCreatedResponse {
    fn from(plan: &WorkflowPlan) -> Self {
        Self {
            plan_id: plan.id.clone(),
            template_name: plan.template_name.clone(),
            classification: plan.classification.clone(),
            status: plan.status,
            tasks: plan
                .tasks
                .iter()
                .map(|t| PlannedTask {
                    id: t.id.clone(),
                    task_type: t.task_type,
                    description: t.description.clone(),
                    depends_on: t.depends_on.clone(),
                    estimated_minutes: t.estimated_minutes,
                })
                .collect(),
            estimated_completion: plan.estimated_completion,
        }
    }
}

/// POST /api/v1/workflows
pub async fn handle_create_workflow(
    State(state): State<AppState>,
    Json(req): Json<CreateWorkflowRequest>,
) -> Result<(StatusCode, Json<WorkflowCreatedResponse>), AppError> {
    let goal = req.user_goal.trim();
    if goal.is_empty() {
        return Err(AppError::Validation("user_goal must not be empty".to_string()));
    }

    let plan = state.orchestrator.create_plan(goal, req.user_data).await?;
    Ok((StatusCode::CREATED, Json(WorkflowCreatedResponse::from(&plan))))
}

/// POST /api/v1/workflows/:id/execute
pub async fn handle_execute_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ExecutionSummary>, AppError> {
    let summary = state.orchestrator.execute_plan(&id).await?;
    Ok(Json(summary))
}

/// GET /api/v1/workflows/:id/status
pub async fn handle_workflow_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlanStatusReport>, AppError> {
    let report = state.orchestrator.get_status(&id).await?;
    Ok(Json(report))
}

/// GET /api/v1/workflows/:id/results
/// 202 while the plan has not reached a terminal status.
pub async fn handle_workflow_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<PlanResults>), AppError> {
    let results = state.orchestrator.combine_results(&id).await?;
    let status = match results {
        PlanResults::Ready(_) => StatusCode::OK,
        PlanResults::Pending { .. } => StatusCode::ACCEPTED,
    };
    Ok((status, Json(results)))
}

/// GET /api/v1/workflows/templates
pub async fn handle_list_templates() -> Json<&'static [WorkflowTemplate]> {
    Json(all_templates())
}
