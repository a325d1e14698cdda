//! Task execution: dispatches a single task to the handler named on it.
//!
//! Handlers never take the orchestrator down: errors, panics and timeouts all
//! come back as `TaskOutcome::Failed` with a message for the task record.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::jobs::JobRecord;
use crate::profile::models::Profile;
use crate::workflow::classifier::GoalClassification;
use crate::workflow::models::{Task, TaskStatus, TaskType, UserData, WorkflowPlan};
use crate::workflow::payload::TaskOutput;

/// Everything a handler may read besides the task itself.
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub plan_id: String,
    pub goal: String,
    pub classification: GoalClassification,
    pub user_data: UserData,
    /// Outputs of tasks already completed in this plan, in plan order.
    pub completed: Vec<TaskOutput>,
}

impl TaskContext {
    pub fn for_plan(plan: &WorkflowPlan) -> Self {
        Self {
            plan_id: plan.id.clone(),
            goal: plan.goal.clone(),
            classification: plan.classification.clone(),
            user_data: plan.user_data.clone(),
            completed: plan
                .tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Completed)
                .filter_map(|t| t.output_data.clone())
                .collect(),
        }
    }

    pub fn output_of(&self, task_type: TaskType) -> Option<&TaskOutput> {
        self.completed.iter().find(|o| o.task_type() == task_type)
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.completed.iter().find_map(|o| match o {
            TaskOutput::ProfileReady { profile, .. } => Some(profile),
            _ => None,
        })
    }

    pub fn jobs(&self) -> &[JobRecord] {
        self.completed
            .iter()
            .find_map(|o| match o {
                TaskOutput::JobsFound { jobs, .. } => Some(jobs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// The job documents are tailored to: best search match, else the
    /// caller-supplied target job.
    pub fn target_job(&self) -> Option<&JobRecord> {
        self.jobs().first().or(self.user_data.target_job.as_ref())
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_data.user_id.as_deref()
    }
}

/// A pluggable agent. One implementation per task type, registered by name.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    /// Name matched against `Task::handler`.
    fn name(&self) -> &'static str;

    async fn execute(&self, task: &Task, ctx: &TaskContext) -> anyhow::Result<TaskOutput>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Completed(TaskOutput),
    Failed(String),
}

pub struct TaskExecutor {
    handlers: HashMap<String, Arc<dyn TaskHandler>>,
    timeout: Option<Duration>,
}

impl TaskExecutor {
    /// `timeout` of `None` lets handlers run unbounded.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            handlers: HashMap::new(),
            timeout,
        }
    }

    /// Registers a handler under its own name, replacing any previous one.
    pub fn register(&mut self, handler: Arc<dyn TaskHandler>) {
        self.handlers.insert(handler.name().to_string(), handler);
    }

    pub fn handler_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Runs one task to an outcome. The handler runs on its own tokio task so a
    /// panic or an expired timeout is contained.
    pub async fn run(&self, task: &Task, ctx: &TaskContext) -> TaskOutcome {
        let Some(handler) = self.handlers.get(&task.handler).cloned() else {
            return TaskOutcome::Failed(format!(
                "no handler registered for '{}'",
                task.handler
            ));
        };

        let owned_task = task.clone();
        let owned_ctx = ctx.clone();
        let mut join = tokio::spawn(async move { handler.execute(&owned_task, &owned_ctx).await });

        let joined = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut join).await {
                Ok(joined) => joined,
                Err(_) => {
                    join.abort();
                    warn!("Task {} timed out after {:?}", task.id, limit);
                    return TaskOutcome::Failed(format!("timed out after {limit:?}"));
                }
            },
            None => join.await,
        };

        match joined {
            Ok(Ok(output)) => TaskOutcome::Completed(output),
            Ok(Err(e)) => TaskOutcome::Failed(format!("{e:#}")),
            Err(e) if e.is_panic() => TaskOutcome::Failed(format!("handler '{}' panicked", task.handler)),
            Err(_) => TaskOutcome::Failed(format!("handler '{}' was cancelled", task.handler)),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Stub handlers shared by orchestrator and agent tests.

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::workflow::payload::TailoredDocument;

    pub enum StubBehavior {
        Succeed,
        Fail(&'static str),
        Panic,
        Sleep(Duration),
    }

    /// Handler with a call counter and a canned output for its task type.
    pub struct StubHandler {
        pub name: &'static str,
        pub task_type: TaskType,
        pub behavior: StubBehavior,
        pub calls: Arc<AtomicUsize>,
    }

    impl StubHandler {
        pub fn new(task_type: TaskType, behavior: StubBehavior) -> Self {
            Self {
                name: task_type.default_handler(),
                task_type,
                behavior,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    pub fn canned_output(task_type: TaskType) -> TaskOutput {
        let doc = |text: &str| TailoredDocument {
            job_id: "job-1".to_string(),
            job_title: "Senior Python Engineer".to_string(),
            company: "Insight Analytics".to_string(),
            text: text.to_string(),
            document_key: Some(format!("documents/u/p/{text}.md")),
        };
        match task_type {
            TaskType::ProfileSetup => TaskOutput::ProfileReady {
                profile: Profile {
                    name: "Jane Smith".to_string(),
                    ..Default::default()
                },
                validation_issues: vec![],
            },
            TaskType::JobSearch => TaskOutput::jobs_found(
                vec![
                    JobRecord::new("job-1", "Senior Python Engineer", "Insight Analytics"),
                    JobRecord::new("job-2", "Python Developer", "TechWave"),
                ],
                vec!["python".to_string()],
            ),
            TaskType::ResumeCreation => TaskOutput::ResumeCreated(doc("resume")),
            TaskType::CoverLetter => TaskOutput::CoverLetterCreated(doc("cover-letter")),
            TaskType::ApplicationPrep => TaskOutput::ApplicationsPrepared {
                applications: vec![],
            },
            TaskType::InterviewPrep => TaskOutput::InterviewGuideReady(doc("interview")),
            TaskType::FollowUp => TaskOutput::FollowUpsScheduled { reminders: vec![] },
        }
    }

    #[async_trait]
    impl TaskHandler for StubHandler {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn execute(&self, _task: &Task, _ctx: &TaskContext) -> anyhow::Result<TaskOutput> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                StubBehavior::Succeed => Ok(canned_output(self.task_type)),
                StubBehavior::Fail(message) => Err(anyhow::anyhow!(*message)),
                StubBehavior::Panic => panic!("stub handler panic"),
                StubBehavior::Sleep(duration) => {
                    tokio::time::sleep(*duration).await;
                    Ok(canned_output(self.task_type))
                }
            }
        }
    }
}
