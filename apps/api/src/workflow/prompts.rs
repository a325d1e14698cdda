// Prompt constants for goal classification.

/// System prompt for goal classification: enforces JSON-only output.
pub const CLASSIFY_SYSTEM: &str = "You are a career coach routing job-search requests. \
    Classify the user's request into exactly one workflow template. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Replace: {templates}, {user_input}, {context_json}
pub const CLASSIFY_PROMPT_TEMPLATE: &str = r#"Classify the job-search request below.

AVAILABLE TEMPLATES (pick exactly one "template_name"):
{templates}

Return a JSON object with this EXACT schema:
{
  "primary_goal": "one sentence describing what the user wants",
  "template_name": "experienced_job_search",
  "urgency": "medium",
  "keywords": ["python", "senior backend"]
}

Rules:
- "urgency" is one of "low", "medium", "high". Use "high" only for explicit deadlines
  ("this week", "urgent", "interview tomorrow").
- "keywords" are job-search terms taken from the request: role titles, technologies,
  seniority. At most 6. Never invent terms not implied by the request or context.
- Prefer "first_time_job_search" for students, graduates and first jobs.
- Prefer "interview_preparation" when the user already has an interview scheduled.

USER CONTEXT:
{context_json}

REQUEST:
{user_input}"#;
