use async_trait::async_trait;
use tracing::info;

use crate::documents::prompts::{
    COVER_LETTER_PROMPT_TEMPLATE, INTERVIEW_GUIDE_PROMPT_TEMPLATE, RESUME_PROMPT_TEMPLATE,
    WRITER_SYSTEM,
};
use crate::documents::{DocumentGenerator, DocumentKind};
use crate::jobs::JobRecord;
use crate::llm_client::prompts::FACTUAL_INSTRUCTION;
use crate::llm_client::{CompletionRequest, LlmClient};
use crate::profile::models::Profile;

const MAX_EDUCATION_ENTRIES: usize = 3;
const MAX_WORK_ENTRIES: usize = 5;

pub struct LlmDocumentGenerator {
    llm: LlmClient,
}

impl LlmDocumentGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl DocumentGenerator for LlmDocumentGenerator {
    async fn write(
        &self,
        kind: DocumentKind,
        profile: &Profile,
        job: &JobRecord,
    ) -> anyhow::Result<String> {
        let prompt = build_prompt(kind, profile, job)?;
        let temperature = match kind {
            DocumentKind::Resume => 0.3,
            DocumentKind::CoverLetter => 0.25,
            DocumentKind::InterviewGuide => 0.4,
        };

        let text = self
            .llm
            .complete_text(&CompletionRequest {
                system: WRITER_SYSTEM,
                prompt: &prompt,
                temperature,
                max_tokens: 4096,
            })
            .await?;

        info!(
            "Generated {} for {} at {} ({} chars)",
            kind.as_str(),
            job.title,
            job.company,
            text.len()
        );
        Ok(text)
    }
}

pub fn build_prompt(kind: DocumentKind, profile: &Profile, job: &JobRecord) -> anyhow::Result<String> {
    let template = match kind {
        DocumentKind::Resume => RESUME_PROMPT_TEMPLATE,
        DocumentKind::CoverLetter => COVER_LETTER_PROMPT_TEMPLATE,
        DocumentKind::InterviewGuide => INTERVIEW_GUIDE_PROMPT_TEMPLATE,
    };
    Ok(template
        .replace("{factual}", FACTUAL_INSTRUCTION)
        .replace("{profile}", &format_profile(profile)?)
        .replace("{job}", &format_job(job)))
}

/// Candidate block for prompts. Only the first three education entries and
/// first five roles are included.
pub fn format_profile(profile: &Profile) -> anyhow::Result<String> {
    let education: Vec<_> = profile.education.iter().take(MAX_EDUCATION_ENTRIES).collect();
    let work: Vec<_> = profile.work_experience.iter().take(MAX_WORK_ENTRIES).collect();
    let name = if profile.name.is_empty() {
        "Candidate"
    } else {
        profile.name.as_str()
    };

    Ok(format!(
        "Name: {name}\n\
         Title: {}\n\
         Location: {}\n\
         Years Experience: {}\n\
         Skills: {}\n\
         Education: {}\n\
         Work History: {}\n\
         Summary: {}",
        profile.title,
        profile.location,
        profile.years_experience,
        profile.skills().join(", "),
        serde_json::to_string(&education)?,
        serde_json::to_string(&work)?,
        profile.summary,
    ))
}

pub fn format_job(job: &JobRecord) -> String {
    format!(
        "Job Title: {}\n\
         Company: {}\n\
         Location: {}\n\
         Skills Requested: {}\n\
         Description: {}",
        job.title,
        job.company,
        job.location.as_deref().unwrap_or("Not specified"),
        job.skills.join(", "),
        job.description,
    )
}
