// Prompt constants for resume parsing.

/// System prompt for resume extraction.
pub const PARSE_SYSTEM: &str = "You are a professional resume parser. \
    Extract information accurately; leave a field empty rather than guess.";

/// Replace: {resume_text}
pub const PARSE_PROMPT_TEMPLATE: &str = r#"Extract the candidate profile from the resume below.

Return a JSON object with this EXACT schema:
{
  "name": "Full Name",
  "email": "email@example.com",
  "phone": "phone number",
  "location": "City, State/Country",
  "linkedin_url": "LinkedIn URL if mentioned",
  "github_url": "GitHub URL if mentioned",
  "portfolio_url": "Portfolio URL if mentioned",
  "title": "Current or desired job title",
  "years_experience": 0,
  "summary": "Professional summary or objective",
  "technical_skills": ["skill"],
  "frameworks": ["framework"],
  "tools": ["tool"],
  "soft_skills": ["communication"],
  "languages": ["English"],
  "work_experience": [
    {"title": "", "company": "", "start_date": "Month Year", "end_date": "Month Year or Present",
     "location": "", "description": "", "skills": []}
  ],
  "education": [
    {"degree": "", "institution": "", "graduation_date": "Year", "location": "", "gpa": ""}
  ],
  "projects": [
    {"name": "", "duration": "", "description": "", "technologies": [], "url": ""}
  ],
  "certifications": [
    {"name": "", "issuer": "", "date": "", "expiry": ""}
  ]
}

Rules:
- "years_experience" is an integer.
- Use empty strings and empty arrays for anything not in the resume.

RESUME:
{resume_text}"#;
