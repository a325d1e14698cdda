//! Goal classification: maps a free-text request to a workflow template.
//!
//! The LLM-backed classifier may fail or return garbage; the orchestrator
//! recovers with `GoalClassification::fallback`, so classification is never fatal.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::llm_client::{CompletionRequest, LlmClient};
use crate::workflow::models::{Urgency, UserData};
use crate::workflow::prompts::{CLASSIFY_PROMPT_TEMPLATE, CLASSIFY_SYSTEM};
use crate::workflow::templates::{all_templates, DEFAULT_TEMPLATE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalClassification {
    pub primary_goal: String,
    pub template_name: String,
    #[serde(default)]
    pub urgency: Urgency,
    /// Search terms lifted from the request.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl GoalClassification {
    /// Deterministic classification used when the classifier is unavailable.
    pub fn fallback(user_input: &str) -> Self {
        Self {
            primary_goal: user_input.trim().to_string(),
            template_name: DEFAULT_TEMPLATE.to_string(),
            urgency: Urgency::Medium,
            keywords: Vec::new(),
        }
    }
}

#[async_trait]
pub trait GoalClassifier: Send + Sync {
    async fn classify(
        &self,
        user_input: &str,
        context: &UserData,
    ) -> anyhow::Result<GoalClassification>;
}

/// Classifier backed by the LLM client.
pub struct LlmGoalClassifier {
    llm: LlmClient,
}

impl LlmGoalClassifier {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl GoalClassifier for LlmGoalClassifier {
    async fn classify(
        &self,
        user_input: &str,
        context: &UserData,
    ) -> anyhow::Result<GoalClassification> {
        let prompt = build_classify_prompt(user_input, context)?;
        let classification = self
            .llm
            .call_json::<GoalClassification>(&CompletionRequest {
                system: CLASSIFY_SYSTEM,
                prompt: &prompt,
                temperature: 0.0,
                max_tokens: 512,
            })
            .await?;
        Ok(classification)
    }
}

fn build_classify_prompt(user_input: &str, context: &UserData) -> anyhow::Result<String> {
    let templates = all_templates()
        .iter()
        .map(|t| format!("- {}: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    // Resume text can be long and is irrelevant for routing.
    let mut context = context.clone();
    context.resume_text = None;
    let context_json = serde_json::to_string_pretty(&context)?;

    Ok(CLASSIFY_PROMPT_TEMPLATE
        .replace("{templates}", &templates)
        .replace("{context_json}", &context_json)
        .replace("{user_input}", user_input))
}
