use std::sync::Arc;

use anyhow::bail;
use async_trait::async_trait;
use tracing::info;

use crate::jobs::{normalize_terms, JobSearch};
use crate::workflow::executor::{TaskContext, TaskHandler};
use crate::workflow::models::Task;
use crate::workflow::payload::TaskOutput;

/// Profile skills folded into the search, in profile order.
const MAX_PROFILE_SKILLS: usize = 3;

/// job_search: queries listings for terms gathered from the request and profile.
pub struct JobScoutAgent {
    search: Arc<dyn JobSearch>,
    limit: i64,
}

impl JobScoutAgent {
    pub fn new(search: Arc<dyn JobSearch>, limit: i64) -> Self {
        Self { search, limit }
    }
}

/// User terms, then classifier keywords, then profile title and top skills.
pub fn search_terms(ctx: &TaskContext) -> Vec<String> {
    let mut terms: Vec<String> = ctx.user_data.search_terms.clone();
    terms.extend(ctx.classification.keywords.iter().cloned());
    if let Some(profile) = ctx.profile() {
        terms.push(profile.title.clone());
        terms.extend(profile.skills().into_iter().take(MAX_PROFILE_SKILLS));
    }
    normalize_terms(terms)
}

#[async_trait]
impl TaskHandler for JobScoutAgent {
    fn name(&self) -> &'static str {
        "job_scout_agent"
    }

    async fn execute(&self, _task: &Task, ctx: &TaskContext) -> anyhow::Result<TaskOutput> {
        let terms = search_terms(ctx);
        if terms.is_empty() {
            bail!(
                "no search terms for goal '{}': supply search_terms or complete the profile first",
                ctx.goal
            );
        }

        let jobs = self.search.search(ctx.profile(), &terms, self.limit).await?;
        info!("Job search for plan {} found {} listings", ctx.plan_id, jobs.len());
        Ok(TaskOutput::jobs_found(jobs, terms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::StubJobSearch;
    use crate::jobs::JobRecord;
    use crate::profile::models::Profile;
    use crate::workflow::classifier::GoalClassification;
    use crate::workflow::models::{TaskType, UserData};

    fn context() -> TaskContext {
        let mut classification = GoalClassification::fallback("senior python role");
        classification.keywords = vec!["python".to_string(), "Senior Backend".to_string()];
        TaskContext {
            plan_id: "plan-1".to_string(),
            goal: "senior python role".to_string(),
            classification,
            user_data: UserData {
                search_terms: vec!["Python".to_string(), " ".to_string()],
                ..Default::default()
            },
            completed: vec![TaskOutput::ProfileReady {
                profile: Profile {
                    title: "Data Engineer".to_string(),
                    technical_skills: vec![
                        "SQL".to_string(),
                        "Spark".to_string(),
                        "Airflow".to_string(),
                        "dbt".to_string(),
                    ],
                    ..Default::default()
                },
                validation_issues: vec![],
            }],
        }
    }

    #[test]
    fn test_terms_merge_request_keywords_and_profile() {
        assert_eq!(
            search_terms(&context()),
            vec!["Python", "Senior Backend", "Data Engineer", "SQL", "Spark", "Airflow"]
        );
    }

    #[tokio::test]
    async fn test_outputs_jobs_and_count() {
        let search = Arc::new(StubJobSearch::with_jobs(vec![
            JobRecord::new("job-1", "Senior Python Engineer", "Insight Analytics"),
            JobRecord::new("job-2", "Python Developer", "TechWave"),
        ]));
        let agent = JobScoutAgent::new(search.clone(), 10);
        let task = Task::new("t", TaskType::JobSearch, "search");

        let output = agent.execute(&task, &context()).await.unwrap();
        let TaskOutput::JobsFound { count, jobs, .. } = output else {
            panic!("expected jobs");
        };
        assert_eq!(count, 2);
        assert_eq!(jobs[0].id, "job-1");
        assert_eq!(search.queries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_results_ranked_against_profile_skills() {
        let search = Arc::new(StubJobSearch::with_jobs(vec![
            JobRecord::new("job-1", "Python Developer", "TechWave"),
            JobRecord {
                skills: vec!["Spark".to_string(), "Airflow".to_string()],
                ..JobRecord::new("job-2", "Data Engineer", "Insight Analytics")
            },
        ]));
        let agent = JobScoutAgent::new(search, 10);

        let output = agent
            .execute(&Task::new("t", TaskType::JobSearch, "search"), &context())
            .await
            .unwrap();
        let TaskOutput::JobsFound { jobs, .. } = output else {
            panic!("expected jobs");
        };
        assert_eq!(jobs[0].id, "job-2");
    }

    #[tokio::test]
    async fn test_no_terms_fails_without_querying() {
        let search = Arc::new(StubJobSearch::default());
        let agent = JobScoutAgent::new(search.clone(), 10);
        let ctx = TaskContext {
            completed: vec![],
            classification: GoalClassification::fallback("help"),
            user_data: UserData::default(),
            ..context()
        };

        let result = agent.execute(&Task::new("t", TaskType::JobSearch, "s"), &ctx).await;
        assert!(result.is_err());
        assert!(search.queries.lock().unwrap().is_empty());
    }
}
