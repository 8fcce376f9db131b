// Preview Renderer: a pure mapping from a draft to the two-column resume
// layout. Blank fields and empty collections produce no section at all.
// The HTML and PDF outputs both render from `ResumeLayout`.

pub mod handlers;
pub mod html;

use crate::models::{LanguageLevel, ResumeDraft, RichText, SkillLevel};

pub const PLACEHOLDER_TITLE: &str = "Your Resume Preview";
pub const PLACEHOLDER_HINT: &str =
    "Start filling in your details on the left to see your professional resume come to life here";

pub const CONTACT_HEADING: &str = "CONTACT";
pub const SKILLS_HEADING: &str = "SKILLS";
pub const LANGUAGES_HEADING: &str = "LANGUAGES";
pub const CERTIFICATIONS_HEADING: &str = "CERTIFICATIONS";
pub const SUMMARY_HEADING: &str = "PROFESSIONAL SUMMARY";
pub const EXPERIENCE_HEADING: &str = "WORK EXPERIENCE";
pub const EDUCATION_HEADING: &str = "EDUCATION";

#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// Nothing has been entered yet.
    Placeholder,
    Resume(ResumeLayout),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeLayout {
    pub sidebar: Sidebar,
    pub main: MainColumn,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sidebar {
    pub photo: Option<String>,
    /// Phone, email, LinkedIn, website; blank ones omitted.
    pub contact: Vec<String>,
    pub skills: Vec<ProficiencyBar>,
    pub languages: Vec<ProficiencyBar>,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProficiencyBar {
    pub label: String,
    pub level: String,
    pub percent: u8,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MainColumn {
    pub header: Option<Header>,
    pub summary: Option<String>,
    pub experience: Vec<JobBlock>,
    pub education: Vec<EducationBlock>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub name: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobBlock {
    pub job_title: String,
    pub company: Option<String>,
    pub duration: Option<String>,
    pub responsibilities: Option<RichText>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EducationBlock {
    pub institution: String,
    pub degree: Option<String>,
    pub year: Option<String>,
    pub details: Option<String>,
}

impl Preview {
    pub fn layout(&self) -> Option<&ResumeLayout> {
        match self {
            Preview::Placeholder => None,
            Preview::Resume(layout) => Some(layout),
        }
    }
}

/// Renders the preview of `draft`.
pub fn render(draft: &ResumeDraft) -> Preview {
    if is_empty(draft) {
        return Preview::Placeholder;
    }
    Preview::Resume(ResumeLayout {
        sidebar: sidebar(draft),
        main: main_column(draft),
    })
}

/// The placeholder replaces the resume until one of these has content.
/// LinkedIn, website, languages and certifications alone do not count.
pub fn is_empty(draft: &ResumeDraft) -> bool {
    [&draft.name, &draft.title, &draft.email, &draft.phone, &draft.profile_summary]
        .iter()
        .all(|s| s.trim().is_empty())
        && draft.work_experience.is_empty()
        && draft.education.is_empty()
        && draft.skills.is_empty()
}

fn sidebar(draft: &ResumeDraft) -> Sidebar {
    let contact = [&draft.phone, &draft.email, &draft.linkedin, &draft.website]
        .into_iter()
        .filter_map(|s| present(s))
        .collect();

    Sidebar {
        photo: draft.photo.clone().filter(|p| !p.is_empty()),
        contact,
        skills: draft
            .skills
            .iter()
            .map(|s| ProficiencyBar {
                label: s.skill.clone(),
                level: s.level.clone(),
                percent: SkillLevel::percent_for(&s.level),
            })
            .collect(),
        languages: draft
            .languages
            .iter()
            .map(|l| ProficiencyBar {
                label: l.language.clone(),
                level: l.level.clone(),
                percent: LanguageLevel::percent_for(&l.level),
            })
            .collect(),
        certifications: draft.certifications.iter().map(|c| c.cert.clone()).collect(),
    }
}

fn main_column(draft: &ResumeDraft) -> MainColumn {
    let header = if present(&draft.name).is_some() || present(&draft.title).is_some() {
        Some(Header {
            name: draft.name.clone(),
            title: present(&draft.title),
        })
    } else {
        None
    };

    MainColumn {
        header,
        summary: present(&draft.profile_summary),
        experience: draft
            .work_experience
            .iter()
            .map(|job| JobBlock {
                job_title: job.job_title.clone(),
                company: present(&job.company),
                duration: present(&job.duration),
                responsibilities: (!job.responsibilities.is_blank())
                    .then(|| job.responsibilities.clone()),
            })
            .collect(),
        education: draft
            .education
            .iter()
            .map(|edu| EducationBlock {
                institution: edu.institution.clone(),
                degree: present(&edu.degree),
                year: present(&edu.year),
                details: present(&edu.details),
            })
            .collect(),
    }
}

fn present(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}
