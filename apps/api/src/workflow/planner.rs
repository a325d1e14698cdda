//! Plan builder: materializes a template into concrete tasks.

use tracing::{debug, warn};

use crate::workflow::classifier::GoalClassification;
use crate::workflow::models::{Task, UserData, WorkflowPlan};
use crate::workflow::templates::{find_template, validate_template, WorkflowTemplate, DEFAULT_TEMPLATE};
use crate::workflow::WorkflowError;

/// Resolves the classified template (falling back to the default when the
/// name is unknown) and builds a pending plan from it.
pub fn build_plan(
    goal: &str,
    mut classification: GoalClassification,
    user_data: UserData,
) -> Result<WorkflowPlan, WorkflowError> {
    let template = match find_template(&classification.template_name) {
        Some(template) => template,
        None => {
            warn!(
                "Unknown template '{}' from classifier, using '{}'",
                classification.template_name, DEFAULT_TEMPLATE
            );
            classification.template_name = DEFAULT_TEMPLATE.to_string();
            find_template(DEFAULT_TEMPLATE)
                .ok_or_else(|| WorkflowError::UnknownTemplate(DEFAULT_TEMPLATE.to_string()))?
        }
    };

    build_from_template(template, goal, classification, user_data)
}

/// Builds a plan from an explicit template.
///
/// Task ids are `"{template}_{index}"`; blueprint positions in `depends_on`
/// are rewritten to those ids. Priority follows urgency.
pub fn build_from_template(
    template: &WorkflowTemplate,
    goal: &str,
    classification: GoalClassification,
    user_data: UserData,
) -> Result<WorkflowPlan, WorkflowError> {
    validate_template(template)?;

    let priority = classification.urgency.task_priority();
    let task_id = |index: usize| format!("{}_{}", template.name, index);

    let tasks: Vec<Task> = template
        .tasks
        .iter()
        .enumerate()
        .map(|(index, blueprint)| {
            let mut task = Task::new(task_id(index), blueprint.task_type, blueprint.description)
                .depending_on(blueprint.depends_on.iter().map(|&dep| task_id(dep)));
            task.priority = priority;
            task.input_data = user_data.clone();
            task
        })
        .collect();

    let plan = WorkflowPlan::new(goal, template.name, classification, user_data, tasks)?;
    debug!(
        "Built plan {} from template '{}' with {} tasks",
        plan.id,
        template.name,
        plan.tasks.len()
    );
    Ok(plan)
}
