//! Reducer-style updates of a `ResumeDraft`.
//!
//! `ResumeDraft::reduce` never mutates its receiver: every action produces a
//! new snapshot. Sub-fields are typed per collection, so an action cannot
//! address a field the addressed entry does not have.

use crate::models::{
    Certification, Education, Language, ResumeDraft, RichText, Skill, WorkExperience,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    Name,
    Title,
    Email,
    Phone,
    Linkedin,
    Website,
    ProfileSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    WorkExperience,
    Education,
    Skills,
    Languages,
    Certifications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkField {
    JobTitle,
    Company,
    Duration,
    /// Value is the editable region's HTML.
    Responsibilities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EducationField {
    Institution,
    Degree,
    Year,
    Details,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillField {
    Skill,
    Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageField {
    Language,
    Level,
}

/// One sub-field of one kind of entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryField {
    Work(WorkField),
    Education(EducationField),
    Skill(SkillField),
    Language(LanguageField),
    Certification,
}

impl EntryField {
    pub fn collection(&self) -> Collection {
        match self {
            EntryField::Work(_) => Collection::WorkExperience,
            EntryField::Education(_) => Collection::Education,
            EntryField::Skill(_) => Collection::Skills,
            EntryField::Language(_) => Collection::Languages,
            EntryField::Certification => Collection::Certifications,
        }
    }

    /// Wire name of the sub-field, as used in loading-flag keys.
    pub fn name(&self) -> &'static str {
        match self {
            EntryField::Work(WorkField::JobTitle) => "jobTitle",
            EntryField::Work(WorkField::Company) => "company",
            EntryField::Work(WorkField::Duration) => "duration",
            EntryField::Work(WorkField::Responsibilities) => "responsibilities",
            EntryField::Education(EducationField::Institution) => "institution",
            EntryField::Education(EducationField::Degree) => "degree",
            EntryField::Education(EducationField::Year) => "year",
            EntryField::Education(EducationField::Details) => "details",
            EntryField::Skill(SkillField::Skill) => "skill",
            EntryField::Skill(SkillField::Level) => "level",
            EntryField::Language(LanguageField::Language) => "language",
            EntryField::Language(LanguageField::Level) => "level",
            EntryField::Certification => "cert",
        }
    }
}

/// A whole record of one of the repeated-entry collections.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Work(WorkExperience),
    Education(Education),
    Skill(Skill),
    Language(Language),
    Certification(Certification),
}

impl Entry {
    /// The blank record the editor appends for "add".
    pub fn template(collection: Collection) -> Entry {
        match collection {
            Collection::WorkExperience => Entry::Work(WorkExperience::default()),
            Collection::Education => Entry::Education(Education::default()),
            Collection::Skills => Entry::Skill(Skill::default()),
            Collection::Languages => Entry::Language(Language::default()),
            Collection::Certifications => Entry::Certification(Certification::default()),
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            Entry::Work(_) => Collection::WorkExperience,
            Entry::Education(_) => Collection::Education,
            Entry::Skill(_) => Collection::Skills,
            Entry::Language(_) => Collection::Languages,
            Entry::Certification(_) => Collection::Certifications,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DraftAction {
    SetField { field: ScalarField, value: String },
    SetPhoto(Option<String>),
    ReplaceEntry { index: usize, entry: Entry },
    SetEntryField { field: EntryField, index: usize, value: String },
    AddEntry(Entry),
    RemoveEntry { collection: Collection, index: usize },
}

impl ResumeDraft {
    /// Returns the snapshot that results from applying `action`.
    ///
    /// # Panics
    /// If the action addresses an entry index past the end of its collection.
    pub fn reduce(&self, action: &DraftAction) -> ResumeDraft {
        let mut next = self.clone();
        next.apply(action);
        next
    }

    fn apply(&mut self, action: &DraftAction) {
        match action {
            DraftAction::SetField { field, value } => *self.scalar_mut(*field) = value.clone(),
            DraftAction::SetPhoto(photo) => self.photo = photo.clone(),
            DraftAction::ReplaceEntry { index, entry } => match entry.clone() {
                Entry::Work(e) => self.work_experience[*index] = e,
                Entry::Education(e) => self.education[*index] = e,
                Entry::Skill(e) => self.skills[*index] = e,
                Entry::Language(e) => self.languages[*index] = e,
                Entry::Certification(e) => self.certifications[*index] = e,
            },
            DraftAction::SetEntryField { field, index, value } => {
                self.set_entry_field(*field, *index, value.clone())
            }
            DraftAction::AddEntry(entry) => match entry.clone() {
                Entry::Work(e) => self.work_experience.push(e),
                Entry::Education(e) => self.education.push(e),
                Entry::Skill(e) => self.skills.push(e),
                Entry::Language(e) => self.languages.push(e),
                Entry::Certification(e) => self.certifications.push(e),
            },
            DraftAction::RemoveEntry { collection, index } => {
                let index = *index;
                match collection {
                    Collection::WorkExperience => {
                        self.work_experience.remove(index);
                    }
                    Collection::Education => {
                        self.education.remove(index);
                    }
                    Collection::Skills => {
                        self.skills.remove(index);
                    }
                    Collection::Languages => {
                        self.languages.remove(index);
                    }
                    Collection::Certifications => {
                        self.certifications.remove(index);
                    }
                }
            }
        }
    }

    fn set_entry_field(&mut self, field: EntryField, index: usize, value: String) {
        match field {
            EntryField::Work(f) => {
                let job = &mut self.work_experience[index];
                match f {
                    WorkField::JobTitle => job.job_title = value,
                    WorkField::Company => job.company = value,
                    WorkField::Duration => job.duration = value,
                    WorkField::Responsibilities => job.responsibilities = RichText::from_html(value),
                }
            }
            EntryField::Education(f) => {
                let edu = &mut self.education[index];
                match f {
                    EducationField::Institution => edu.institution = value,
                    EducationField::Degree => edu.degree = value,
                    EducationField::Year => edu.year = value,
                    EducationField::Details => edu.details = value,
                }
            }
            EntryField::Skill(f) => {
                let skill = &mut self.skills[index];
                match f {
                    SkillField::Skill => skill.skill = value,
                    SkillField::Level => skill.level = value,
                }
            }
            EntryField::Language(f) => {
                let language = &mut self.languages[index];
                match f {
                    LanguageField::Language => language.language = value,
                    LanguageField::Level => language.level = value,
                }
            }
            EntryField::Certification => self.certifications[index].cert = value,
        }
    }

    pub fn scalar(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::Name => &self.name,
            ScalarField::Title => &self.title,
            ScalarField::Email => &self.email,
            ScalarField::Phone => &self.phone,
            ScalarField::Linkedin => &self.linkedin,
            ScalarField::Website => &self.website,
            ScalarField::ProfileSummary => &self.profile_summary,
        }
    }

    fn scalar_mut(&mut self, field: ScalarField) -> &mut String {
        match field {
            ScalarField::Name => &mut self.name,
            ScalarField::Title => &mut self.title,
            ScalarField::Email => &mut self.email,
            ScalarField::Phone => &mut self.phone,
            ScalarField::Linkedin => &mut self.linkedin,
            ScalarField::Website => &mut self.website,
            ScalarField::ProfileSummary => &mut self.profile_summary,
        }
    }

    pub fn len_of(&self, collection: Collection) -> usize {
        match collection {
            Collection::WorkExperience => self.work_experience.len(),
            Collection::Education => self.education.len(),
            Collection::Skills => self.skills.len(),
            Collection::Languages => self.languages.len(),
            Collection::Certifications => self.certifications.len(),
        }
    }

    /// Text of one sub-field, or `None` when the entry does not exist.
    /// Responsibilities are returned as plain text lines.
    pub fn entry_text(&self, field: EntryField, index: usize) -> Option<String> {
        let text = match field {
            EntryField::Work(f) => {
                let job = self.work_experience.get(index)?;
                match f {
                    WorkField::JobTitle => job.job_title.clone(),
                    WorkField::Company => job.company.clone(),
                    WorkField::Duration => job.duration.clone(),
                    WorkField::Responsibilities => job.responsibilities.to_plain_text(),
                }
            }
            EntryField::Education(f) => {
                let edu = self.education.get(index)?;
                match f {
                    EducationField::Institution => edu.institution.clone(),
                    EducationField::Degree => edu.degree.clone(),
                    EducationField::Year => edu.year.clone(),
                    EducationField::Details => edu.details.clone(),
                }
            }
            EntryField::Skill(f) => {
                let skill = self.skills.get(index)?;
                match f {
                    SkillField::Skill => skill.skill.clone(),
                    SkillField::Level => skill.level.clone(),
                }
            }
            EntryField::Language(f) => {
                let language = self.languages.get(index)?;
                match f {
                    LanguageField::Language => language.language.clone(),
                    LanguageField::Level => language.level.clone(),
                }
            }
            EntryField::Certification => self.certifications.get(index)?.cert.clone(),
        };
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert(text: &str) -> Entry {
        Entry::Certification(Certification {
            cert: text.to_string(),
        })
    }

    fn draft_with_certs(certs: &[&str]) -> ResumeDraft {
        certs
            .iter()
            .fold(ResumeDraft::default(), |d, c| d.reduce(&DraftAction::AddEntry(cert(c))))
    }

    fn cert_names(draft: &ResumeDraft) -> Vec<&str> {
        draft.certifications.iter().map(|c| c.cert.as_str()).collect()
    }

    #[test]
    fn test_set_field_replaces_value() {
        let draft = ResumeDraft::default().reduce(&DraftAction::SetField {
            field: ScalarField::Name,
            value: "Jane Doe".to_string(),
        });
        assert_eq!(draft.name, "Jane Doe");
        assert_eq!(draft.scalar(ScalarField::Name), "Jane Doe");
    }

    #[test]
    fn test_set_photo_then_clear() {
        let url = "data:image/png;base64,iVBORw0KGgo=".to_string();
        let with_photo = ResumeDraft::default().reduce(&DraftAction::SetPhoto(Some(url.clone())));
        assert_eq!(with_photo.photo.as_deref(), Some(url.as_str()));

        let cleared = with_photo.reduce(&DraftAction::SetPhoto(None));
        assert!(cleared.photo.is_none());
        assert_eq!(with_photo.photo, Some(url));
    }

    #[test]
    fn test_reduce_leaves_prior_snapshot_untouched() {
        let before = draft_with_certs(&["AWS"]);
        let after = before.reduce(&DraftAction::SetEntryField {
            field: EntryField::Certification,
            index: 0,
            value: "GCP".to_string(),
        });
        assert_eq!(cert_names(&before), vec!["AWS"]);
        assert_eq!(cert_names(&after), vec!["GCP"]);
    }

    #[test]
    fn test_remove_shifts_later_entries_down() {
        let draft = draft_with_certs(&["a", "b", "c", "d"]);
        let after = draft.reduce(&DraftAction::RemoveEntry {
            collection: Collection::Certifications,
            index: 1,
        });
        assert_eq!(after.len_of(Collection::Certifications), 3);
        assert_eq!(cert_names(&after), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_remove_each_position_preserves_order() {
        let names = ["a", "b", "c", "d", "e"];
        let draft = draft_with_certs(&names);
        for i in 0..names.len() {
            let after = draft.reduce(&DraftAction::RemoveEntry {
                collection: Collection::Certifications,
                index: i,
            });
            let expected: Vec<&str> = names
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, n)| *n)
                .collect();
            assert_eq!(cert_names(&after), expected);
        }
    }

    #[test]
    fn test_add_then_remove_round_trips_to_empty() {
        for collection in [
            Collection::WorkExperience,
            Collection::Education,
            Collection::Skills,
            Collection::Languages,
            Collection::Certifications,
        ] {
            let empty = ResumeDraft::default();
            let added = empty.reduce(&DraftAction::AddEntry(Entry::template(collection)));
            assert_eq!(added.len_of(collection), 1);
            let removed = added.reduce(&DraftAction::RemoveEntry {
                collection,
                index: 0,
            });
            assert_eq!(removed, empty);
        }
    }

    #[test]
    fn test_add_uses_caller_template() {
        let draft = ResumeDraft::default().reduce(&DraftAction::AddEntry(Entry::template(
            Collection::Languages,
        )));
        assert_eq!(draft.languages[0].level, "Fluent");
        for collection in [Collection::WorkExperience, Collection::Skills, Collection::Certifications] {
            assert_eq!(Entry::template(collection).collection(), collection);
        }
    }

    #[test]
    fn test_replace_entry() {
        let draft = draft_with_certs(&["a", "b"]);
        let after = draft.reduce(&DraftAction::ReplaceEntry {
            index: 1,
            entry: cert("z"),
        });
        assert_eq!(cert_names(&after), vec!["a", "z"]);
    }

    #[test]
    fn test_set_responsibilities_stores_html() {
        let draft = ResumeDraft::default()
            .reduce(&DraftAction::AddEntry(Entry::template(Collection::WorkExperience)))
            .reduce(&DraftAction::SetEntryField {
                field: EntryField::Work(WorkField::Responsibilities),
                index: 0,
                value: "<b>Led</b> team".to_string(),
            });
        assert_eq!(draft.work_experience[0].responsibilities.as_html(), "<b>Led</b> team");
        assert_eq!(
            draft.entry_text(EntryField::Work(WorkField::Responsibilities), 0),
            Some("Led team".to_string())
        );
    }

    #[test]
    fn test_entry_text_out_of_range_is_none() {
        let draft = ResumeDraft::default();
        assert_eq!(draft.entry_text(EntryField::Certification, 0), None);
    }

    #[test]
    #[should_panic]
    fn test_remove_out_of_range_panics() {
        ResumeDraft::default().reduce(&DraftAction::RemoveEntry {
            collection: Collection::Skills,
            index: 0,
        });
    }

    #[test]
    fn test_entry_field_names() {
        assert_eq!(EntryField::Work(WorkField::Responsibilities).name(), "responsibilities");
        assert_eq!(EntryField::Education(EducationField::Details).name(), "details");
        assert_eq!(EntryField::Certification.collection(), Collection::Certifications);
    }
}
