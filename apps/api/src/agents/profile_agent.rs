use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use tracing::info;

use crate::profile::parser::ResumeParser;
use crate::profile::store::ProfileStore;
use crate::workflow::executor::{TaskContext, TaskHandler};
use crate::workflow::models::Task;
use crate::workflow::payload::TaskOutput;

/// profile_setup: the stored profile, else one parsed from `resume_text`.
pub struct ProfileAgent {
    profiles: Arc<dyn ProfileStore>,
    parser: ResumeParser,
}

impl ProfileAgent {
    pub fn new(profiles: Arc<dyn ProfileStore>, parser: ResumeParser) -> Self {
        Self { profiles, parser }
    }
}

#[async_trait]
impl TaskHandler for ProfileAgent {
    fn name(&self) -> &'static str {
        "profile_agent"
    }

    async fn execute(&self, _task: &Task, ctx: &TaskContext) -> anyhow::Result<TaskOutput> {
        if let Some(user_id) = ctx.user_id() {
            if let Some(profile) = self.profiles.get(user_id).await? {
                info!("Using stored profile for user {user_id}");
                let validation_issues = profile.validate();
                return Ok(TaskOutput::ProfileReady {
                    profile,
                    validation_issues,
                });
            }
        }

        let Some(resume_text) = ctx
            .user_data
            .resume_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        else {
            bail!("no stored profile and no resume_text supplied");
        };

        let (profile, method) = self.parser.parse(resume_text).await;
        info!("Parsed profile from resume text ({method:?})");

        if let Some(user_id) = ctx.user_id() {
            self.profiles.set(user_id, &profile).await?;
        }

        let validation_issues = profile.validate();
        Ok(TaskOutput::ProfileReady {
            profile,
            validation_issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::models::Profile;
    use crate::profile::store::InMemoryProfileStore;
    use crate::workflow::classifier::GoalClassification;
    use crate::workflow::models::{TaskType, UserData};

    fn context(user_data: UserData) -> TaskContext {
        TaskContext {
            plan_id: "plan-1".to_string(),
            goal: "goal".to_string(),
            classification: GoalClassification::fallback("goal"),
            user_data,
            completed: vec![],
        }
    }

    fn task() -> Task {
        Task::new("t", TaskType::ProfileSetup, "profile")
    }

    #[tokio::test]
    async fn test_prefers_stored_profile() {
        let store = Arc::new(InMemoryProfileStore::new());
        let stored = Profile {
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            ..Default::default()
        };
        store.set("u-1", &stored).await.unwrap();
        let agent = ProfileAgent::new(store, ResumeParser::heuristic());

        let output = agent
            .execute(
                &task(),
                &context(UserData {
                    user_id: Some("u-1".to_string()),
                    resume_text: Some("Someone Else\nother@example.com".to_string()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();

        match output {
            TaskOutput::ProfileReady {
                profile,
                validation_issues,
            } => {
                assert_eq!(profile, stored);
                assert!(validation_issues.is_empty());
            }
            other => panic!("unexpected output {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_parses_and_stores_resume_text() {
        let store = Arc::new(InMemoryProfileStore::new());
        let agent = ProfileAgent::new(store.clone(), ResumeParser::heuristic());

        let output = agent
            .execute(
                &task(),
                &context(UserData {
                    user_id: Some("u-2".to_string()),
                    resume_text: Some("Jane Smith\njane@example.com\nPython, SQL".to_string()),
                    ..Default::default()
                }),
            )
            .await
            .unwrap();

        let TaskOutput::ProfileReady { profile, .. } = output else {
            panic!("expected a profile");
        };
        assert_eq!(profile.name, "Jane Smith");
        assert_eq!(profile.technical_skills, vec!["Python", "SQL"]);
        assert_eq!(store.get("u-2").await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn test_fails_without_profile_or_resume() {
        let agent = ProfileAgent::new(Arc::new(InMemoryProfileStore::new()), ResumeParser::heuristic());
        let err = agent
            .execute(&task(), &context(UserData::default()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no resume_text"));
    }
}
