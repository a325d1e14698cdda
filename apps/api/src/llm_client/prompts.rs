// Shared prompt fragments.
// Each module that calls the LLM keeps its own prompts.rs alongside it;
// this file holds the pieces they have in common.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every document-generation prompt.
pub const FACTUAL_INSTRUCTION: &str = "\
    CRITICAL: Use only facts present in the candidate profile. \
    Do NOT invent employers, titles, dates, degrees, metrics or skills. \
    If the profile does not support a claim, leave it out.";
