pub mod resume;
pub mod rich_text;

pub use resume::{
    Certification, Education, Language, LanguageLevel, ResumeDraft, Skill, SkillLevel,
    WorkExperience,
};
pub use rich_text::RichText;
