//! Static workflow templates. A template is an ordered list of task blueprints;
//! `depends_on` refers to earlier blueprint positions.

use serde::Serialize;

use crate::workflow::models::TaskType;
use crate::workflow::WorkflowError;

/// Template used when classification fails or names an unknown template.
pub const DEFAULT_TEMPLATE: &str = "experienced_job_search";

#[derive(Debug, Clone, Serialize)]
pub struct TaskBlueprint {
    pub task_type: TaskType,
    pub description: &'static str,
    /// Positions of earlier blueprints in the same template.
    pub depends_on: &'static [usize],
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub tasks: &'static [TaskBlueprint],
}

const fn step(
    task_type: TaskType,
    description: &'static str,
    depends_on: &'static [usize],
) -> TaskBlueprint {
    TaskBlueprint {
        task_type,
        description,
        depends_on,
    }
}

static TEMPLATES: &[WorkflowTemplate] = &[
    WorkflowTemplate {
        name: "first_time_job_search",
        description: "First job hunt: build a profile, find roles, tailor one resume, prepare applications",
        tasks: &[
            step(TaskType::ProfileSetup, "Set up your candidate profile from your resume", &[]),
            step(TaskType::JobSearch, "Search for entry-level roles matching your profile", &[0]),
            step(TaskType::ResumeCreation, "Create a resume tailored to the best match", &[1]),
            step(TaskType::ApplicationPrep, "Prepare the application checklist", &[2]),
        ],
    },
    WorkflowTemplate {
        name: "experienced_job_search",
        description: "Full search for experienced candidates with cover letters and follow-ups",
        tasks: &[
            step(TaskType::ProfileSetup, "Refresh your candidate profile", &[]),
            step(TaskType::JobSearch, "Search for roles matching your experience", &[0]),
            step(TaskType::ResumeCreation, "Tailor your resume to the top match", &[1]),
            step(TaskType::CoverLetter, "Write a cover letter for the top match", &[1]),
            step(TaskType::ApplicationPrep, "Prepare applications with tailored materials", &[2, 3]),
            step(TaskType::FollowUp, "Schedule follow-ups for submitted applications", &[4]),
        ],
    },
    WorkflowTemplate {
        name: "career_change",
        description: "Move into a new field: reframe experience and prepare for interviews",
        tasks: &[
            step(TaskType::ProfileSetup, "Map transferable skills in your profile", &[]),
            step(TaskType::JobSearch, "Search for roles in the target field", &[0]),
            step(TaskType::ResumeCreation, "Reframe your resume for the new field", &[1]),
            step(TaskType::CoverLetter, "Explain the career change in a cover letter", &[2]),
            step(TaskType::InterviewPrep, "Prepare for career-change interview questions", &[1]),
            step(TaskType::ApplicationPrep, "Prepare applications", &[2, 3]),
        ],
    },
    WorkflowTemplate {
        name: "interview_preparation",
        description: "Prepare for an upcoming interview and plan the follow-up",
        tasks: &[
            step(TaskType::ProfileSetup, "Load your candidate profile", &[]),
            step(TaskType::InterviewPrep, "Build an interview preparation guide", &[0]),
            step(TaskType::FollowUp, "Plan post-interview follow-up", &[1]),
        ],
    },
    WorkflowTemplate {
        name: "application_materials",
        description: "Produce a tailored resume and cover letter without applying",
        tasks: &[
            step(TaskType::ProfileSetup, "Load your candidate profile", &[]),
            step(TaskType::JobSearch, "Find a target role", &[0]),
            step(TaskType::ResumeCreation, "Tailor your resume", &[1]),
            step(TaskType::CoverLetter, "Write a cover letter", &[1]),
        ],
    },
];

pub fn all_templates() -> &'static [WorkflowTemplate] {
    TEMPLATES
}

pub fn find_template(name: &str) -> Option<&'static WorkflowTemplate> {
    TEMPLATES.iter().find(|t| t.name == name)
}

/// Checks that every blueprint only depends on earlier positions.
/// This rules out dangling references, self-dependencies and cycles.
pub fn validate_template(template: &WorkflowTemplate) -> Result<(), WorkflowError> {
    if template.tasks.is_empty() {
        return Err(WorkflowError::InvalidTemplate {
            template: template.name.to_string(),
            reason: "template has no tasks".to_string(),
        });
    }

    for (index, blueprint) in template.tasks.iter().enumerate() {
        if let Some(dep) = blueprint.depends_on.iter().find(|&&dep| dep >= index) {
            let reason = if *dep >= template.tasks.len() {
                format!("task {index} depends on nonexistent task {dep}")
            } else {
                format!("task {index} depends on task {dep}, which is not an earlier task")
            };
            return Err(WorkflowError::InvalidTemplate {
                template: template.name.to_string(),
                reason,
            });
        }
    }
    Ok(())
}

/// Startup check: every template is well formed and the default exists.
pub fn validate_registry() -> Result<(), WorkflowError> {
    for template in TEMPLATES {
        validate_template(template)?;
    }
    if find_template(DEFAULT_TEMPLATE).is_none() {
        return Err(WorkflowError::UnknownTemplate(DEFAULT_TEMPLATE.to_string()));
    }
    Ok(())
}
