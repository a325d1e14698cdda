use anyhow::bail;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::info;

use crate::jobs::JobRecord;
use crate::workflow::executor::{TaskContext, TaskHandler};
use crate::workflow::models::{Task, TaskType};
use crate::workflow::payload::{ApplicationItem, FollowUpReminder, SubmissionMode, TaskOutput};

/// Sources that accept direct submission.
const AUTO_APPLY_SOURCES: &[&str] = &["indeed", "ziprecruiter"];

/// Days after preparation at which follow-ups fall due.
const FOLLOW_UP_DAYS: [i64; 2] = [7, 14];

pub fn submission_mode(source: Option<&str>) -> SubmissionMode {
    match source {
        Some(source) if AUTO_APPLY_SOURCES.contains(&source.to_ascii_lowercase().as_str()) => {
            SubmissionMode::Auto
        }
        _ => SubmissionMode::Checklist,
    }
}

/// Jobs to act on: every search result, else the caller's target job.
fn candidate_jobs(ctx: &TaskContext) -> Vec<&JobRecord> {
    let jobs = ctx.jobs();
    if jobs.is_empty() {
        ctx.user_data.target_job.iter().collect()
    } else {
        jobs.iter().collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// application_prep
// ────────────────────────────────────────────────────────────────────────────

pub struct ApplicationAgent;

impl ApplicationAgent {
    fn prepare(job: &JobRecord, ctx: &TaskContext) -> ApplicationItem {
        let resume_ready = ctx.completed.iter().any(|o| {
            matches!(o, TaskOutput::ResumeCreated(doc) if doc.job_id == job.id)
        });
        let cover_letter_ready = ctx.completed.iter().any(|o| {
            matches!(o, TaskOutput::CoverLetterCreated(doc) if doc.job_id == job.id)
        });

        let mode = submission_mode(job.source.as_deref());
        let mut checklist = vec![if resume_ready {
            "Review the tailored resume".to_string()
        } else {
            format!("Tailor your resume for {}", job.title)
        }];
        if cover_letter_ready {
            checklist.push("Review the cover letter".to_string());
        }
        checklist.push(match mode {
            SubmissionMode::Auto => format!(
                "Confirm consent to submit automatically via {}",
                job.source.as_deref().unwrap_or("the job board")
            ),
            SubmissionMode::Checklist => match &job.url {
                Some(url) => format!("Submit the application at {url}"),
                None => format!("Submit the application on the {} careers page", job.company),
            },
        });
        checklist.push("Record the submission date".to_string());

        ApplicationItem {
            job_id: job.id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            url: job.url.clone(),
            mode,
            materials_ready: resume_ready,
            checklist,
        }
    }
}

#[async_trait]
impl TaskHandler for ApplicationAgent {
    fn name(&self) -> &'static str {
        "application_agent"
    }

    async fn execute(&self, _task: &Task, ctx: &TaskContext) -> anyhow::Result<TaskOutput> {
        let jobs = candidate_jobs(ctx);
        if jobs.is_empty() {
            bail!("no jobs to prepare applications for");
        }

        let applications: Vec<ApplicationItem> =
            jobs.into_iter().map(|job| Self::prepare(job, ctx)).collect();
        info!(
            "Prepared {} applications for plan {}",
            applications.len(),
            ctx.plan_id
        );
        Ok(TaskOutput::ApplicationsPrepared { applications })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// follow_up
// ────────────────────────────────────────────────────────────────────────────

pub struct FollowUpAgent;

#[async_trait]
impl TaskHandler for FollowUpAgent {
    fn name(&self) -> &'static str {
        "follow_up_agent"
    }

    async fn execute(&self, _task: &Task, ctx: &TaskContext) -> anyhow::Result<TaskOutput> {
        let targets: Vec<(String, String, String)> = match ctx.output_of(TaskType::ApplicationPrep) {
            Some(TaskOutput::ApplicationsPrepared { applications }) => applications
                .iter()
                .map(|a| (a.job_id.clone(), a.title.clone(), a.company.clone()))
                .collect(),
            _ => candidate_jobs(ctx)
                .into_iter()
                .map(|j| (j.id.clone(), j.title.clone(), j.company.clone()))
                .collect(),
        };
        if targets.is_empty() {
            bail!("nothing to follow up on: no applications or target job");
        }

        let after_interview = ctx.completed.iter().any(|o| matches!(o, TaskOutput::InterviewGuideReady(_)));
        let now = Utc::now();

        let reminders: Vec<FollowUpReminder> = targets
            .iter()
            .flat_map(|(job_id, title, company)| {
                FOLLOW_UP_DAYS.iter().enumerate().map(move |(i, days)| {
                    let note = match (i, after_interview) {
                        (0, true) => format!("Send {company} a thank-you note about the {title} interview"),
                        (0, false) => format!("Ask {company} for an update on your {title} application"),
                        _ => format!("No reply from {company} about {title}? Follow up once more or move on"),
                    };
                    FollowUpReminder {
                        job_id: job_id.clone(),
                        company: company.clone(),
                        due_at: now + Duration::days(*days),
                        note,
                    }
                })
            })
            .collect();

        info!("Scheduled {} follow-ups for plan {}", reminders.len(), ctx.plan_id);
        Ok(TaskOutput::FollowUpsScheduled { reminders })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::classifier::GoalClassification;
    use crate::workflow::executor::testing::canned_output;
    use crate::workflow::models::UserData;

    fn context(completed: Vec<TaskOutput>) -> TaskContext {
        TaskContext {
            plan_id: "plan-1".to_string(),
            goal: "goal".to_string(),
            classification: GoalClassification::fallback("goal"),
            user_data: UserData::default(),
            completed,
        }
    }

    #[test]
    fn test_submission_mode_by_source() {
        assert_eq!(submission_mode(Some("indeed")), SubmissionMode::Auto);
        assert_eq!(submission_mode(Some("ZipRecruiter")), SubmissionMode::Auto);
        assert_eq!(submission_mode(Some("linkedin")), SubmissionMode::Checklist);
        assert_eq!(submission_mode(None), SubmissionMode::Checklist);
    }

    #[tokio::test]
    async fn test_applications_flag_tailored_materials() {
        let mut search = canned_output(TaskType::JobSearch);
        if let TaskOutput::JobsFound { jobs, .. } = &mut search {
            jobs[0].source = Some("indeed".to_string());
            jobs[1].url = Some("https://techwave.example/jobs/2".to_string());
        }
        let ctx = context(vec![search, canned_output(TaskType::ResumeCreation)]);

        let output = ApplicationAgent
            .execute(&Task::new("t", TaskType::ApplicationPrep, "apply"), &ctx)
            .await
            .unwrap();
        let TaskOutput::ApplicationsPrepared { applications } = output else {
            panic!("expected applications");
        };

        assert_eq!(applications.len(), 2);
        assert_eq!(applications[0].mode, SubmissionMode::Auto);
        assert!(applications[0].materials_ready);
        assert_eq!(applications[0].checklist[0], "Review the tailored resume");
        assert_eq!(applications[1].mode, SubmissionMode::Checklist);
        assert!(!applications[1].materials_ready);
        assert!(applications[1]
            .checklist
            .contains(&"Submit the application at https://techwave.example/jobs/2".to_string()));
    }

    #[tokio::test]
    async fn test_application_prep_fails_without_jobs() {
        let ctx = context(vec![TaskOutput::jobs_found(vec![], vec![])]);
        assert!(ApplicationAgent
            .execute(&Task::new("t", TaskType::ApplicationPrep, "apply"), &ctx)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_follow_ups_at_one_and_two_weeks() {
        let ctx = context(vec![
            canned_output(TaskType::JobSearch),
            TaskOutput::ApplicationsPrepared {
                applications: vec![ApplicationItem {
                    job_id: "job-1".to_string(),
                    title: "Senior Python Engineer".to_string(),
                    company: "Insight Analytics".to_string(),
                    url: None,
                    mode: SubmissionMode::Checklist,
                    materials_ready: true,
                    checklist: vec![],
                }],
            },
        ]);
        let before = Utc::now();

        let output = FollowUpAgent
            .execute(&Task::new("t", TaskType::FollowUp, "follow up"), &ctx)
            .await
            .unwrap();
        let TaskOutput::FollowUpsScheduled { reminders } = output else {
            panic!("expected reminders");
        };

        assert_eq!(reminders.len(), 2);
        assert_eq!((reminders[0].due_at - before).num_days(), 7);
        assert_eq!((reminders[1].due_at - before).num_days(), 14);
        assert!(reminders[0].note.contains("update"));
    }

    #[tokio::test]
    async fn test_follow_up_after_interview_uses_target_job() {
        let mut ctx = context(vec![canned_output(TaskType::InterviewPrep)]);
        ctx.user_data.target_job = Some(JobRecord::new("t-9", "Staff Engineer", "Acme"));

        let output = FollowUpAgent
            .execute(&Task::new("t", TaskType::FollowUp, "follow up"), &ctx)
            .await
            .unwrap();
        let TaskOutput::FollowUpsScheduled { reminders } = output else {
            panic!("expected reminders");
        };
        assert_eq!(reminders[0].job_id, "t-9");
        assert!(reminders[0].note.contains("thank-you"));
    }
}
