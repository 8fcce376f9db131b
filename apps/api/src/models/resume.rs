use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::rich_text::RichText;

/// The complete in-memory resume being edited.
///
/// Field names serialize in camelCase to match the browser's form state.
/// Every collection is ordered and its order is the display order; entries
/// have no identity beyond their position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDraft {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub website: String,
    /// Image as a data URL.
    pub photo: Option<String>,
    pub profile_summary: String,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub languages: Vec<Language>,
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub job_title: String,
    pub company: String,
    pub duration: String,
    pub responsibilities: RichText,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub year: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub skill: String,
    /// Free text; normally one of `SkillLevel`.
    pub level: String,
}

impl Default for Skill {
    fn default() -> Self {
        Skill {
            skill: String::new(),
            level: SkillLevel::Intermediate.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub language: String,
    /// Free text; normally one of `LanguageLevel`.
    pub level: String,
}

impl Default for Language {
    fn default() -> Self {
        Language {
            language: String::new(),
            level: LanguageLevel::Fluent.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub cert: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Proficiency levels
// ────────────────────────────────────────────────────────────────────────────

/// Bar width used when a skill level is not one of the known values.
pub const SKILL_FALLBACK_PERCENT: u8 = 60;
/// Bar width used when a language level is not one of the known values.
pub const LANGUAGE_FALLBACK_PERCENT: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }

    pub fn percent(&self) -> u8 {
        match self {
            SkillLevel::Beginner => 25,
            SkillLevel::Intermediate => 50,
            SkillLevel::Advanced => 75,
            SkillLevel::Expert => 100,
        }
    }

    /// Display width for a free-text level; unknown levels get the fallback.
    pub fn percent_for(level: &str) -> u8 {
        level
            .parse::<SkillLevel>()
            .map_or(SKILL_FALLBACK_PERCENT, |l| l.percent())
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkillLevel::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageLevel {
    Basic,
    Intermediate,
    Advanced,
    Fluent,
    Native,
}

impl LanguageLevel {
    pub const ALL: [LanguageLevel; 5] = [
        LanguageLevel::Basic,
        LanguageLevel::Intermediate,
        LanguageLevel::Advanced,
        LanguageLevel::Fluent,
        LanguageLevel::Native,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageLevel::Basic => "Basic",
            LanguageLevel::Intermediate => "Intermediate",
            LanguageLevel::Advanced => "Advanced",
            LanguageLevel::Fluent => "Fluent",
            LanguageLevel::Native => "Native",
        }
    }

    pub fn percent(&self) -> u8 {
        match self {
            LanguageLevel::Basic => 20,
            LanguageLevel::Intermediate => 40,
            LanguageLevel::Advanced => 60,
            LanguageLevel::Fluent => 80,
            LanguageLevel::Native => 100,
        }
    }

    pub fn percent_for(level: &str) -> u8 {
        level
            .parse::<LanguageLevel>()
            .map_or(LANGUAGE_FALLBACK_PERCENT, |l| l.percent())
    }
}

impl fmt::Display for LanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageLevel::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_percentages() {
        assert_eq!(SkillLevel::percent_for("Beginner"), 25);
        assert_eq!(SkillLevel::percent_for("Intermediate"), 50);
        assert_eq!(SkillLevel::percent_for("Advanced"), 75);
        assert_eq!(SkillLevel::percent_for("Expert"), 100);
    }

    #[test]
    fn test_language_percentages() {
        assert_eq!(LanguageLevel::percent_for("Basic"), 20);
        assert_eq!(LanguageLevel::percent_for("Intermediate"), 40);
        assert_eq!(LanguageLevel::percent_for("Advanced"), 60);
        assert_eq!(LanguageLevel::percent_for("Fluent"), 80);
        assert_eq!(LanguageLevel::percent_for("Native"), 100);
    }

    #[test]
    fn test_unknown_levels_fall_back() {
        assert_eq!(SkillLevel::percent_for("Guru"), SKILL_FALLBACK_PERCENT);
        assert_eq!(SkillLevel::percent_for(""), SKILL_FALLBACK_PERCENT);
        assert_eq!(SkillLevel::percent_for("expert"), SKILL_FALLBACK_PERCENT);
        assert_eq!(LanguageLevel::percent_for("Conversational"), LANGUAGE_FALLBACK_PERCENT);
    }

    #[test]
    fn test_blank_entry_defaults() {
        assert_eq!(Skill::default().level, "Intermediate");
        assert_eq!(Language::default().level, "Fluent");
    }

    #[test]
    fn test_draft_uses_camel_case_schema() {
        let json = r#"{
            "name": "Jane Doe",
            "profileSummary": "Builder",
            "workExperience": [
                {"jobTitle": "Engineer", "company": "Acme", "duration": "2020-2024",
                 "responsibilities": ["Shipped things", "Fixed things"]}
            ],
            "skills": [{"skill": "Rust", "level": "Expert"}]
        }"#;
        let draft: ResumeDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.name, "Jane Doe");
        assert_eq!(draft.profile_summary, "Builder");
        assert_eq!(draft.work_experience[0].job_title, "Engineer");
        assert_eq!(
            draft.work_experience[0].responsibilities.to_plain_text(),
            "Shipped things\nFixed things"
        );
        assert_eq!(draft.skills[0].level, "Expert");
        assert!(draft.photo.is_none());
        assert!(draft.languages.is_empty());

        let out = serde_json::to_value(&draft).unwrap();
        assert_eq!(out["profileSummary"], "Builder");
        assert_eq!(out["workExperience"][0]["jobTitle"], "Engineer");
    }
}
