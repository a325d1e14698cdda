// Prompt constants for application documents.

pub const WRITER_SYSTEM: &str = "You are an assistant that writes professional job application \
    materials using only the provided information. Respond in Markdown.";

/// Replace: {profile}, {job}, {factual}
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Using the candidate and job information below, draft a concise, tailored resume in Markdown.
Focus on relevant accomplishments and align the candidate's experience to the job.

{factual}

CANDIDATE:
{profile}

JOB:
{job}"#;

/// Replace: {profile}, {job}, {factual}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a professional cover letter (at most 4 paragraphs) tailored to the job below.
Link the candidate's actual experience to the responsibilities and highlight genuine skills.
Keep the tone confident and respectful.

{factual}

CANDIDATE:
{profile}

JOB:
{job}"#;

/// Replace: {profile}, {job}, {factual}
pub const INTERVIEW_GUIDE_PROMPT_TEMPLATE: &str = r#"Prepare an interview preparation guide in Markdown for the job below.

Include:
- 5 likely technical questions drawn from the job's skills and description
- 3 behavioural questions, each with a suggested STAR answer outline grounded in the candidate's history
- 3 questions the candidate should ask the interviewer

{factual}

CANDIDATE:
{profile}

JOB:
{job}"#;
