//! Status reporting and result aggregation over a plan snapshot.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflow::models::{PlanStatus, TaskStatus, TaskType, WorkflowPlan};
use crate::workflow::payload::TaskOutput;
use crate::workflow::scheduler::{blocked_tasks, BlockedTask};

// ────────────────────────────────────────────────────────────────────────────
// Status
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// completed / total × 100, truncated.
    pub percentage: u32,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
    pub total_tasks: usize,
}

impl Progress {
    pub fn of(plan: &WorkflowPlan) -> Self {
        let total_tasks = plan.tasks.len();
        let completed_tasks = plan.count_with_status(TaskStatus::Completed);
        let percentage = if total_tasks == 0 {
            0
        } else {
            (completed_tasks * 100 / total_tasks) as u32
        };
        Self {
            percentage,
            completed_tasks,
            failed_tasks: plan.count_with_status(TaskStatus::Failed),
            total_tasks,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub description: String,
    pub status: TaskStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStatusReport {
    pub plan_id: String,
    pub goal: String,
    pub status: PlanStatus,
    pub progress: Progress,
    pub tasks: Vec<TaskStatusEntry>,
    pub estimated_completion: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

pub fn status_report(plan: &WorkflowPlan) -> PlanStatusReport {
    PlanStatusReport {
        plan_id: plan.id.clone(),
        goal: plan.goal.clone(),
        status: plan.status,
        progress: Progress::of(plan),
        tasks: plan
            .tasks
            .iter()
            .map(|t| TaskStatusEntry {
                id: t.id.clone(),
                task_type: t.task_type,
                description: t.description.clone(),
                status: t.status,
                started_at: t.started_at,
                completed_at: t.completed_at,
                error_message: t.error_message.clone(),
            })
            .collect(),
        estimated_completion: plan.estimated_completion,
        created_at: plan.created_at,
        completed_at: plan.completed_at,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Execution summary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFailure {
    pub task_id: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub plan_id: String,
    pub status: PlanStatus,
    pub progress: Progress,
    pub completed_tasks: Vec<String>,
    pub failed_tasks: Vec<TaskFailure>,
    pub cancelled_tasks: Vec<String>,
    /// Tasks left pending because a prerequisite failed or sits on a cycle.
    pub blocked_tasks: Vec<BlockedTask>,
    pub stalled: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

pub fn execution_summary(plan: &WorkflowPlan) -> ExecutionSummary {
    let ids_with = |status: TaskStatus| -> Vec<String> {
        plan.tasks
            .iter()
            .filter(|t| t.status == status)
            .map(|t| t.id.clone())
            .collect()
    };

    let blocked = blocked_tasks(plan);
    ExecutionSummary {
        plan_id: plan.id.clone(),
        status: plan.status,
        progress: Progress::of(plan),
        completed_tasks: ids_with(TaskStatus::Completed),
        failed_tasks: plan
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Failed)
            .map(|t| TaskFailure {
                task_id: t.id.clone(),
                error: t.error_message.clone().unwrap_or_default(),
            })
            .collect(),
        cancelled_tasks: ids_with(TaskStatus::Cancelled),
        stalled: !blocked.is_empty(),
        blocked_tasks: blocked,
        completed_at: plan.completed_at,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Combined results
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverableKind {
    Profile,
    JobMatches,
    Resume,
    CoverLetter,
    ApplicationChecklist,
    InterviewGuide,
    FollowUpSchedule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliverable {
    pub kind: DeliverableKind,
    pub title: String,
    /// Storage key or count backing the deliverable, when there is one.
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub output: TaskOutput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedResults {
    pub plan_id: String,
    pub goal: String,
    pub status: PlanStatus,
    pub progress: Progress,
    pub deliverables: Vec<Deliverable>,
    pub next_steps: Vec<String>,
    pub results: Vec<TaskResult>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Either the combined results of a terminal plan or an explicit "not yet".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlanResults {
    Ready(CombinedResults),
    Pending {
        plan_id: String,
        status: PlanStatus,
        progress: Progress,
    },
}

pub fn combine_results(plan: &WorkflowPlan) -> PlanResults {
    if !plan.status.is_terminal() {
        return PlanResults::Pending {
            plan_id: plan.id.clone(),
            status: plan.status,
            progress: Progress::of(plan),
        };
    }

    let results: Vec<TaskResult> = plan
        .tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .filter_map(|t| {
            t.output_data.clone().map(|output| TaskResult {
                task_id: t.id.clone(),
                task_type: t.task_type,
                output,
            })
        })
        .collect();

    PlanResults::Ready(CombinedResults {
        plan_id: plan.id.clone(),
        goal: plan.goal.clone(),
        status: plan.status,
        progress: Progress::of(plan),
        deliverables: results.iter().map(|r| deliverable_for(&r.output)).collect(),
        next_steps: next_steps(plan),
        results,
        completed_at: plan.completed_at,
    })
}

fn deliverable_for(output: &TaskOutput) -> Deliverable {
    match output {
        TaskOutput::ProfileReady { profile, .. } => Deliverable {
            kind: DeliverableKind::Profile,
            title: if profile.name.is_empty() {
                "Candidate profile".to_string()
            } else {
                format!("Candidate profile for {}", profile.name)
            },
            reference: None,
        },
        TaskOutput::JobsFound { count, .. } => Deliverable {
            kind: DeliverableKind::JobMatches,
            title: format!("Found {count} matching jobs"),
            reference: Some(count.to_string()),
        },
        TaskOutput::ResumeCreated(doc) => Deliverable {
            kind: DeliverableKind::Resume,
            title: format!("Tailored resume for {} at {}", doc.job_title, doc.company),
            reference: doc.document_key.clone(),
        },
        TaskOutput::CoverLetterCreated(doc) => Deliverable {
            kind: DeliverableKind::CoverLetter,
            title: format!("Cover letter for {} at {}", doc.job_title, doc.company),
            reference: doc.document_key.clone(),
        },
        TaskOutput::ApplicationsPrepared { applications } => Deliverable {
            kind: DeliverableKind::ApplicationChecklist,
            title: format!("{} applications prepared", applications.len()),
            reference: Some(applications.len().to_string()),
        },
        TaskOutput::InterviewGuideReady(doc) => Deliverable {
            kind: DeliverableKind::InterviewGuide,
            title: format!("Interview guide for {} at {}", doc.job_title, doc.company),
            reference: doc.document_key.clone(),
        },
        TaskOutput::FollowUpsScheduled { reminders } => Deliverable {
            kind: DeliverableKind::FollowUpSchedule,
            title: format!("{} follow-up reminders scheduled", reminders.len()),
            reference: Some(reminders.len().to_string()),
        },
    }
}

fn next_steps(plan: &WorkflowPlan) -> Vec<String> {
    let with_status = |status: TaskStatus| -> BTreeSet<TaskType> {
        plan.tasks
            .iter()
            .filter(|t| t.status == status)
            .map(|t| t.task_type)
            .collect()
    };
    let done = with_status(TaskStatus::Completed);
    let failed = with_status(TaskStatus::Failed);

    let mut steps = Vec::new();

    if !done.contains(&TaskType::ProfileSetup) {
        steps.push("Upload your resume so we can build your candidate profile".to_string());
    }
    match (
        done.contains(&TaskType::JobSearch),
        done.contains(&TaskType::ResumeCreation),
    ) {
        (true, true) => steps.push(
            "Review your tailored resume and submit applications to your top matches".to_string(),
        ),
        (true, false) => steps.push(
            "Review the job matches and shortlist roles worth tailoring a resume for".to_string(),
        ),
        _ => {}
    }
    if done.contains(&TaskType::CoverLetter) {
        steps.push("Personalize the cover letter's opening paragraph before sending".to_string());
    }
    if done.contains(&TaskType::ApplicationPrep) {
        steps.push("Work through the application checklist for each role".to_string());
    }
    if done.contains(&TaskType::InterviewPrep) {
        steps.push("Rehearse your answers to the interview questions out loud".to_string());
    }
    if done.contains(&TaskType::FollowUp) {
        steps.push("Follow up with each company on the scheduled dates".to_string());
    }
    if !failed.is_empty() {
        let names: Vec<&str> = failed.iter().map(TaskType::as_str).collect();
        steps.push(format!("Retry the steps that failed: {}", names.join(", ")));
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::classifier::GoalClassification;
    use crate::workflow::executor::testing::canned_output;
    use crate::workflow::models::{Task, UserData};

    fn chain_plan() -> WorkflowPlan {
        WorkflowPlan::new(
            "goal",
            "first_time_job_search",
            GoalClassification::fallback("goal"),
            UserData::default(),
            vec![
                Task::new("p", TaskType::ProfileSetup, "profile"),
                Task::new("s", TaskType::JobSearch, "search").depending_on(["p"]),
                Task::new("r", TaskType::ResumeCreation, "resume").depending_on(["s"]),
            ],
        )
        .unwrap()
    }

    fn complete(plan: &mut WorkflowPlan, index: usize) {
        let task_type = plan.tasks[index].task_type;
        plan.tasks[index].complete(canned_output(task_type));
    }

    #[test]
    fn test_progress_truncates() {
        let mut plan = chain_plan();
        complete(&mut plan, 0);
        let progress = Progress::of(&plan);
        assert_eq!(progress.percentage, 33);
        assert_eq!(progress.completed_tasks, 1);
        assert_eq!(progress.total_tasks, 3);
    }

    #[test]
    fn test_results_not_ready_until_terminal() {
        let mut plan = chain_plan();
        complete(&mut plan, 0);
        plan.mark_running();
        match combine_results(&plan) {
            PlanResults::Pending { status, progress, .. } => {
                assert_eq!(status, PlanStatus::Running);
                assert_eq!(progress.completed_tasks, 1);
            }
            PlanResults::Ready(_) => panic!("running plan must not expose results"),
        }
    }

    #[test]
    fn test_completed_plan_lists_resume_and_job_count() {
        let mut plan = chain_plan();
        for i in 0..3 {
            complete(&mut plan, i);
        }
        plan.finalize();

        let PlanResults::Ready(combined) = combine_results(&plan) else {
            panic!("completed plan must be ready");
        };
        let kinds: Vec<_> = combined.deliverables.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DeliverableKind::Profile,
                DeliverableKind::JobMatches,
                DeliverableKind::Resume
            ]
        );
        assert_eq!(combined.deliverables[1].title, "Found 2 matching jobs");
        assert_eq!(
            combined.deliverables[2].reference.as_deref(),
            Some("documents/u/p/resume.md")
        );
        assert!(combined
            .next_steps
            .iter()
            .any(|s| s.contains("submit applications")));
        assert_eq!(combined.progress.percentage, 100);
    }

    #[test]
    fn test_submit_suggestion_requires_resume() {
        let mut plan = chain_plan();
        complete(&mut plan, 0);
        complete(&mut plan, 1);
        plan.tasks[2].fail("writer unavailable".to_string());
        plan.finalize();

        let PlanResults::Ready(combined) = combine_results(&plan) else {
            panic!("terminal plan must be ready");
        };
        assert!(!combined.next_steps.iter().any(|s| s.contains("submit applications")));
        assert!(combined.next_steps.iter().any(|s| s.contains("shortlist")));
        assert!(combined
            .next_steps
            .iter()
            .any(|s| s == "Retry the steps that failed: resume_creation"));
        assert_eq!(combined.results.len(), 2);
    }

    #[test]
    fn test_summary_reports_blocked_tasks() {
        let mut plan = chain_plan();
        complete(&mut plan, 0);
        plan.tasks[1].fail("search backend down".to_string());
        plan.finalize();

        let summary = execution_summary(&plan);
        assert_eq!(summary.status, PlanStatus::PartiallyCompleted);
        assert_eq!(summary.completed_tasks, vec!["p".to_string()]);
        assert_eq!(summary.failed_tasks[0].error, "search backend down");
        assert!(summary.stalled);
        assert_eq!(summary.blocked_tasks[0].task_id, "r");
    }

    #[test]
    fn test_status_report_lists_every_task() {
        let plan = chain_plan();
        let report = status_report(&plan);
        assert_eq!(report.tasks.len(), 3);
        assert_eq!(report.status, PlanStatus::Pending);
        assert_eq!(report.progress.percentage, 0);
    }
}
