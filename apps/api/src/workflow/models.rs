//! Plan and task data model.
//!
//! A `WorkflowPlan` is created once by the planner, then mutated in place by the
//! orchestrator only. Once its status is terminal it is never written again.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::jobs::JobRecord;
use crate::workflow::classifier::GoalClassification;
use crate::workflow::payload::TaskOutput;
use crate::workflow::WorkflowError;

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    ProfileSetup,
    JobSearch,
    ResumeCreation,
    CoverLetter,
    ApplicationPrep,
    InterviewPrep,
    FollowUp,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::ProfileSetup => "profile_setup",
            TaskType::JobSearch => "job_search",
            TaskType::ResumeCreation => "resume_creation",
            TaskType::CoverLetter => "cover_letter",
            TaskType::ApplicationPrep => "application_prep",
            TaskType::InterviewPrep => "interview_prep",
            TaskType::FollowUp => "follow_up",
        }
    }

    /// Static duration estimate used for `estimated_completion`.
    pub fn estimated_minutes(&self) -> i64 {
        match self {
            TaskType::ProfileSetup => 2,
            TaskType::JobSearch => 5,
            TaskType::ResumeCreation => 10,
            TaskType::CoverLetter => 8,
            TaskType::ApplicationPrep => 15,
            TaskType::InterviewPrep => 20,
            TaskType::FollowUp => 5,
        }
    }

    /// Name of the agent that executes this task type by default.
    pub fn default_handler(&self) -> &'static str {
        match self {
            TaskType::ProfileSetup => "profile_agent",
            TaskType::JobSearch => "job_scout_agent",
            TaskType::ResumeCreation => "resume_writer",
            TaskType::CoverLetter => "cover_letter_writer",
            TaskType::ApplicationPrep => "application_agent",
            TaskType::InterviewPrep => "interview_coach",
            TaskType::FollowUp => "follow_up_agent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }
}

/// Recorded as a hint only. Scheduling is strictly declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

impl Urgency {
    pub fn task_priority(&self) -> TaskPriority {
        match self {
            Urgency::High => TaskPriority::High,
            Urgency::Low | Urgency::Medium => TaskPriority::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Pending,
    Running,
    Completed,
    PartiallyCompleted,
    Failed,
}

impl PlanStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PlanStatus::Completed | PlanStatus::PartiallyCompleted | PlanStatus::Failed
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// User data (request boundary)
// ────────────────────────────────────────────────────────────────────────────

/// Caller-supplied data attached to a plan and handed to every task.
/// Known keys are typed; anything else is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub search_terms: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub target_job: Option<JobRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Task
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub description: String,
    pub handler: String,
    pub status: TaskStatus,
    pub depends_on: BTreeSet<String>,
    pub priority: TaskPriority,
    pub estimated_minutes: i64,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub input_data: UserData,
    pub output_data: Option<TaskOutput>,
    pub error_message: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, task_type: TaskType, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            task_type,
            description: description.into(),
            handler: task_type.default_handler().to_string(),
            status: TaskStatus::Pending,
            depends_on: BTreeSet::new(),
            priority: TaskPriority::Medium,
            estimated_minutes: task_type.estimated_minutes(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            input_data: UserData::default(),
            output_data: None,
            error_message: None,
        }
    }

    pub fn depending_on<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub(crate) fn start(&mut self) {
        self.status = TaskStatus::InProgress;
        self.started_at = Some(Utc::now());
    }

    pub(crate) fn complete(&mut self, output: TaskOutput) {
        self.status = TaskStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.output_data = Some(output);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.status = TaskStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error_message = Some(message);
    }

    pub(crate) fn cancel(&mut self, reason: String) {
        self.status = TaskStatus::Cancelled;
        self.completed_at = Some(Utc::now());
        self.error_message = Some(reason);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// WorkflowPlan
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowPlan {
    pub id: String,
    pub goal: String,
    pub template_name: String,
    pub classification: GoalClassification,
    pub user_data: UserData,
    /// Template order, not execution order.
    pub tasks: Vec<Task>,
    /// task id → depends_on, derived from `tasks`.
    pub dependency_graph: BTreeMap<String, BTreeSet<String>>,
    pub estimated_completion: DateTime<Utc>,
    pub status: PlanStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkflowPlan {
    /// Assembles a plan from concrete tasks.
    ///
    /// Rejects empty plans, duplicate task ids, self-dependencies and
    /// references to ids that are not in the plan. Cycles between distinct
    /// tasks are accepted here and surface as a stalled execution.
    pub fn new(
        goal: impl Into<String>,
        template_name: impl Into<String>,
        classification: GoalClassification,
        user_data: UserData,
        tasks: Vec<Task>,
    ) -> Result<Self, WorkflowError> {
        if tasks.is_empty() {
            return Err(WorkflowError::InvalidPlan("plan has no tasks".to_string()));
        }

        let mut ids = HashSet::new();
        for task in &tasks {
            if !ids.insert(task.id.as_str()) {
                return Err(WorkflowError::InvalidPlan(format!(
                    "duplicate task id '{}'",
                    task.id
                )));
            }
        }

        for task in &tasks {
            if task.depends_on.contains(&task.id) {
                return Err(WorkflowError::InvalidPlan(format!(
                    "task '{}' depends on itself",
                    task.id
                )));
            }
            if let Some(missing) = task.depends_on.iter().find(|d| !ids.contains(d.as_str())) {
                return Err(WorkflowError::InvalidPlan(format!(
                    "task '{}' depends on unknown task '{}'",
                    task.id, missing
                )));
            }
        }

        let dependency_graph = tasks
            .iter()
            .map(|t| (t.id.clone(), t.depends_on.clone()))
            .collect();

        let created_at = Utc::now();
        let total_minutes: i64 = tasks.iter().map(|t| t.estimated_minutes).sum();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            goal: goal.into(),
            template_name: template_name.into(),
            classification,
            user_data,
            tasks,
            dependency_graph,
            estimated_completion: created_at + Duration::minutes(total_minutes),
            status: PlanStatus::Pending,
            created_at,
            completed_at: None,
        })
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn count_with_status(&self, status: TaskStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    pub fn is_settled(&self) -> bool {
        self.tasks.iter().all(Task::is_terminal)
    }

    /// Whether `id` can reach itself by following `depends_on` edges.
    pub fn is_on_cycle(&self, id: &str) -> bool {
        let mut stack: Vec<&str> = self
            .dependency_graph
            .get(id)
            .map(|deps| deps.iter().map(String::as_str).collect())
            .unwrap_or_default();
        let mut seen = HashSet::new();

        while let Some(current) = stack.pop() {
            if current == id {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            if let Some(deps) = self.dependency_graph.get(current) {
                stack.extend(deps.iter().map(String::as_str));
            }
        }
        false
    }

    /// All tasks that depend on `id`, directly or transitively, in plan order.
    pub fn dependents_of(&self, id: &str) -> Vec<String> {
        let mut reached: HashSet<&str> = HashSet::from([id]);
        let mut changed = true;
        while changed {
            changed = false;
            for task in &self.tasks {
                if reached.contains(task.id.as_str()) {
                    continue;
                }
                if task.depends_on.iter().any(|d| reached.contains(d.as_str())) {
                    reached.insert(task.id.as_str());
                    changed = true;
                }
            }
        }
        self.tasks
            .iter()
            .filter(|t| t.id != id && reached.contains(t.id.as_str()))
            .map(|t| t.id.clone())
            .collect()
    }

    pub(crate) fn mark_running(&mut self) {
        if !self.status.is_terminal() {
            self.status = PlanStatus::Running;
        }
    }

    /// Cancels every non-terminal task downstream of `failed_id`.
    /// Returns the ids that were cancelled.
    pub(crate) fn cancel_dependents(&mut self, failed_id: &str) -> Vec<String> {
        let dependents = self.dependents_of(failed_id);
        let mut cancelled = Vec::new();
        for task in self.tasks.iter_mut() {
            if !task.is_terminal() && dependents.contains(&task.id) {
                task.cancel(format!("cancelled: prerequisite '{failed_id}' failed"));
                cancelled.push(task.id.clone());
            }
        }
        cancelled
    }

    /// Derives the terminal plan status from task outcomes and stamps `completed_at`.
    pub(crate) fn finalize(&mut self) {
        let total = self.tasks.len();
        let completed = self.count_with_status(TaskStatus::Completed);

        self.status = if completed == total {
            PlanStatus::Completed
        } else if completed > 0 {
            PlanStatus::PartiallyCompleted
        } else {
            PlanStatus::Failed
        };
        self.completed_at = Some(Utc::now());
    }
}
