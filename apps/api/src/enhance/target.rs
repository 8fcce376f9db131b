//! What an enhancement reads from and writes back to.

use crate::editor::actions::{
    DraftAction, EducationField, EntryField, ScalarField, SkillField, LanguageField, WorkField,
};
use crate::enhance::prompts::EnhanceField;
use crate::models::{ResumeDraft, RichText};

/// Index segment of a loading key for targets outside any collection.
const MAIN_INDEX: &str = "main";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnhanceTarget {
    ProfileSummary,
    WorkExperience { index: usize },
    Education { index: usize, field: EducationField },
    Skill { index: usize },
    Language { index: usize },
    Certification { index: usize },
}

impl EnhanceTarget {
    /// Prompt selected for this target.
    pub fn field(&self) -> EnhanceField {
        match self {
            EnhanceTarget::ProfileSummary => EnhanceField::ProfileSummary,
            EnhanceTarget::WorkExperience { .. } => EnhanceField::WorkExperience,
            EnhanceTarget::Education { .. } => EnhanceField::Education,
            EnhanceTarget::Skill { .. } => EnhanceField::Skills,
            EnhanceTarget::Language { .. } => EnhanceField::Languages,
            EnhanceTarget::Certification { .. } => EnhanceField::Certifications,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match *self {
            EnhanceTarget::ProfileSummary => None,
            EnhanceTarget::WorkExperience { index }
            | EnhanceTarget::Education { index, .. }
            | EnhanceTarget::Skill { index }
            | EnhanceTarget::Language { index }
            | EnhanceTarget::Certification { index } => Some(index),
        }
    }

    /// The entry sub-field written by this target; `None` for the summary.
    pub fn entry_field(&self) -> Option<EntryField> {
        match *self {
            EnhanceTarget::ProfileSummary => None,
            EnhanceTarget::WorkExperience { .. } => {
                Some(EntryField::Work(WorkField::Responsibilities))
            }
            EnhanceTarget::Education { field, .. } => Some(EntryField::Education(field)),
            EnhanceTarget::Skill { .. } => Some(EntryField::Skill(SkillField::Skill)),
            EnhanceTarget::Language { .. } => Some(EntryField::Language(LanguageField::Language)),
            EnhanceTarget::Certification { .. } => Some(EntryField::Certification),
        }
    }

    /// Loading-flag key: `field_index_subfield`, with `main` when there is no
    /// index and an empty subfield when there is no sub-field.
    pub fn key(&self) -> String {
        let index = self
            .index()
            .map_or_else(|| MAIN_INDEX.to_string(), |i| i.to_string());
        let subfield = self.entry_field().map_or("", |f| f.name());
        format!("{}_{}_{}", self.field(), index, subfield)
    }

    /// Current text of the target, or `None` when its entry no longer exists.
    pub fn source_text(&self, draft: &ResumeDraft) -> Option<String> {
        match (self.entry_field(), self.index()) {
            (Some(field), Some(index)) => draft.entry_text(field, index),
            _ => Some(draft.profile_summary.clone()),
        }
    }

    pub fn exists_in(&self, draft: &ResumeDraft) -> bool {
        match (self.entry_field(), self.index()) {
            (Some(field), Some(index)) => index < draft.len_of(field.collection()),
            _ => true,
        }
    }

    /// The store update that writes `text` into the target.
    pub fn merge_action(&self, text: &str) -> DraftAction {
        match (self.entry_field(), self.index()) {
            (Some(field @ EntryField::Work(WorkField::Responsibilities)), Some(index)) => {
                DraftAction::SetEntryField {
                    field,
                    index,
                    value: RichText::from_plain_text(text).as_html().to_string(),
                }
            }
            (Some(field), Some(index)) => DraftAction::SetEntryField {
                field,
                index,
                value: text.to_string(),
            },
            _ => DraftAction::SetField {
                field: ScalarField::ProfileSummary,
                value: text.to_string(),
            },
        }
    }
}
