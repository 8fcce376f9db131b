// All LLM prompt templates for the Enhancement endpoint.
// Reuses cross-cutting fragments from llm_client::prompts.
// Every template has a `{text}` placeholder for the user's original text.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::llm_client::prompts::{FACT_RULES, OUTPUT_ONLY};

/// The resume fields that have an enhancement prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnhanceField {
    ProfileSummary,
    Education,
    WorkExperience,
    Languages,
    Skills,
    Certifications,
}

impl EnhanceField {
    pub const ALL: [EnhanceField; 6] = [
        EnhanceField::ProfileSummary,
        EnhanceField::Education,
        EnhanceField::WorkExperience,
        EnhanceField::Languages,
        EnhanceField::Skills,
        EnhanceField::Certifications,
    ];

    /// Wire name, as sent in the `field` member of an enhance request.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnhanceField::ProfileSummary => "profileSummary",
            EnhanceField::Education => "education",
            EnhanceField::WorkExperience => "workExperience",
            EnhanceField::Languages => "languages",
            EnhanceField::Skills => "skills",
            EnhanceField::Certifications => "certifications",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            EnhanceField::ProfileSummary => PROFILE_SUMMARY_TEMPLATE,
            EnhanceField::Education => EDUCATION_TEMPLATE,
            EnhanceField::WorkExperience => WORK_EXPERIENCE_TEMPLATE,
            EnhanceField::Languages => LANGUAGES_TEMPLATE,
            EnhanceField::Skills => SKILLS_TEMPLATE,
            EnhanceField::Certifications => CERTIFICATIONS_TEMPLATE,
        }
    }

    /// Builds the full instruction prompt with `text` embedded verbatim.
    pub fn prompt(&self, text: &str) -> String {
        self.template()
            .replace("{fact_rules}", FACT_RULES)
            .replace("{output_only}", OUTPUT_ONLY)
            .replace("{text}", text)
    }
}

impl fmt::Display for EnhanceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for EnhanceField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnhanceField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Selects the prompt for a field name, rejecting names without a template.
pub fn select_prompt(field: &str, text: &str) -> Result<String, UnknownField> {
    field.parse::<EnhanceField>().map(|f| f.prompt(text))
}

const PROFILE_SUMMARY_TEMPLATE: &str = r#"You are enhancing a professional summary for a resume.

Rewrite the following professional summary so that:
{fact_rules}
- You improve clarity, grammar, and professionalism.
- You make it compelling and impactful for hiring managers.
- You keep it concise (2-3 sentences, 50-75 words max).
{output_only}

Original summary:
"{text}""#;

const EDUCATION_TEMPLATE: &str = r#"You are enhancing an education entry for a professional resume.

Rewrite the following education description so that:
{fact_rules}
- You keep ALL factual details (degree, institution, dates, location, grades, majors/minors, awards).
- You improve clarity, grammar, and professionalism.
- You highlight honors, projects, or leadership ONLY if the user mentioned them.
- You keep the length similar (do NOT turn it into a long paragraph).
{output_only}

Original education text:
"{text}""#;

const WORK_EXPERIENCE_TEMPLATE: &str = r#"You are enhancing a work experience section for a professional resume.

Rewrite the following responsibilities/experience so that:
{fact_rules}
- You keep company names, job titles, dates, tools, technologies, domains, and metrics exactly.
- You rewrite in strong, action-oriented bullet style (each line starting with a strong verb).
- You highlight impact and outcomes only where the user text suggests them.
- You improve clarity, conciseness, and ATS-friendliness (include relevant keywords naturally).
- You keep roughly the same number of lines and similar length.
- You put one bullet per line.
{output_only}

Original work experience text:
"{text}""#;

const LANGUAGES_TEMPLATE: &str = r#"You are enhancing a language proficiency section for a professional resume.

Rewrite the following language details so that:
{fact_rules}
- You keep every mentioned language and level (do NOT add or remove languages).
- You map vague levels (good, basic, fluent) to standard terms (Native, Professional, Conversational, Basic).
- You keep the format clean and compact (e.g., "English - Native, Hindi - Professional Working Proficiency").
{output_only}

Original language text:
"{text}""#;

const SKILLS_TEMPLATE: &str = r#"You are enhancing a skills section for a professional resume.

Rewrite the following skills so that:
{fact_rules}
- You keep ONLY the skills explicitly mentioned or clearly implied (do NOT add tools or technologies).
- You group related skills logically where useful (e.g., "Frontend: React, Next.js").
- You remove duplicates, filler words, and overly generic terms.
- You use common industry skill names separated by commas or pipes.
- You keep it concise and scannable (1-3 lines max).
{output_only}

Original skills text:
"{text}""#;

const CERTIFICATIONS_TEMPLATE: &str = r#"You are enhancing a certifications section for a professional resume.

Rewrite the following certifications so that:
{fact_rules}
- You keep certification names, issuing bodies, dates, credential IDs, and links exactly as given.
- You normalize the format (e.g., "Salesforce Certified Administrator - Salesforce, 2023").
- You keep each certification on its own line if there are multiple.
{output_only}

Original certification text:
"{text}""#;
