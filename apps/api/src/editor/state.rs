use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::editor::actions::DraftAction;
use crate::enhance::target::EnhanceTarget;
use crate::models::ResumeDraft;
use crate::preview::{self, Preview};

/// Collapsible form sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Profile,
    Summary,
    Experience,
    Education,
    Skills,
    Languages,
    Certifications,
}

/// Which pane is visible on narrow screens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveTab {
    #[default]
    Edit,
    Preview,
}

/// Proof that an enhancement run owns its key. A newer run on the same key
/// invalidates older tickets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementTicket {
    pub key: String,
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct InFlight {
    target: EnhanceTarget,
    generation: u64,
}

/// The draft plus the UI state that surrounds it.
#[derive(Debug, Clone)]
pub struct EditorState {
    draft: ResumeDraft,
    expanded: HashSet<SectionId>,
    active_tab: ActiveTab,
    loading: HashSet<String>,
    in_flight: HashMap<String, InFlight>,
    next_generation: u64,
    alerts: Vec<String>,
}

impl Default for EditorState {
    fn default() -> Self {
        EditorState::new(ResumeDraft::default())
    }
}

impl EditorState {
    pub fn new(draft: ResumeDraft) -> Self {
        EditorState {
            draft,
            expanded: HashSet::from([SectionId::Profile, SectionId::Summary]),
            active_tab: ActiveTab::default(),
            loading: HashSet::new(),
            in_flight: HashMap::new(),
            next_generation: 0,
            alerts: Vec::new(),
        }
    }

    pub fn draft(&self) -> &ResumeDraft {
        &self.draft
    }

    /// Applies `action` to the draft. Removing an entry supersedes any
    /// enhancement aimed at that entry or a later one in the same collection,
    /// since their indices no longer address the same record.
    pub fn dispatch(&mut self, action: DraftAction) {
        if let DraftAction::RemoveEntry { collection, index } = &action {
            let stale: Vec<String> = self
                .in_flight
                .iter()
                .filter(|(_, run)| {
                    run.target
                        .entry_field()
                        .is_some_and(|f| f.collection() == *collection)
                        && run.target.index().is_some_and(|i| i >= *index)
                })
                .map(|(key, _)| key.clone())
                .collect();
            for key in stale {
                debug!(%key, "entry removed, superseding enhancement");
                self.cancel_enhancement(&key);
            }
        }
        self.draft = self.draft.reduce(&action);
    }

    pub fn toggle_section(&mut self, section: SectionId) {
        if !self.expanded.remove(&section) {
            self.expanded.insert(section);
        }
    }

    pub fn is_expanded(&self, section: SectionId) -> bool {
        self.expanded.contains(&section)
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: ActiveTab) {
        self.active_tab = tab;
    }

    pub fn is_loading(&self, key: &str) -> bool {
        self.loading.contains(key)
    }

    /// Marks the target's key as loading and issues a fresh ticket for it,
    /// superseding whatever run held the key before.
    pub fn begin_enhancement(&mut self, target: &EnhanceTarget) -> EnhancementTicket {
        let key = target.key();
        self.next_generation += 1;
        let generation = self.next_generation;
        self.in_flight.insert(
            key.clone(),
            InFlight {
                target: *target,
                generation,
            },
        );
        self.loading.insert(key.clone());
        EnhancementTicket { key, generation }
    }

    pub fn is_current(&self, ticket: &EnhancementTicket) -> bool {
        self.in_flight
            .get(&ticket.key)
            .is_some_and(|run| run.generation == ticket.generation)
    }

    /// Writes `text` into the ticket's target. Returns `false` without
    /// touching the draft when the ticket has been superseded.
    pub fn merge_enhancement(&mut self, ticket: &EnhancementTicket, text: &str) -> bool {
        let Some(run) = self.in_flight.get(&ticket.key) else {
            return false;
        };
        if run.generation != ticket.generation || !run.target.exists_in(&self.draft) {
            return false;
        }
        let action = run.target.merge_action(text);
        self.draft = self.draft.reduce(&action);
        true
    }

    /// Releases the key if the ticket still owns it. A superseded ticket
    /// leaves the newer run's loading flag alone.
    pub fn finish_enhancement(&mut self, ticket: &EnhancementTicket) {
        if self.is_current(ticket) {
            self.in_flight.remove(&ticket.key);
            self.loading.remove(&ticket.key);
        }
    }

    /// Supersedes the run on `key`, if any.
    pub fn cancel_enhancement(&mut self, key: &str) -> bool {
        self.loading.remove(key);
        self.in_flight.remove(key).is_some()
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub fn preview(&self) -> Preview {
        preview::render(&self.draft)
    }
}

/// Cloneable handle to one editor. The lock is only ever taken for short
/// synchronous sections and never across an await.
#[derive(Debug, Clone, Default)]
pub struct SharedEditor(Arc<Mutex<EditorState>>);

impl SharedEditor {
    pub fn new(state: EditorState) -> Self {
        SharedEditor(Arc::new(Mutex::new(state)))
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut EditorState) -> R) -> R {
        f(&mut self.0.lock())
    }

    pub fn snapshot(&self) -> ResumeDraft {
        self.0.lock().draft.clone()
    }

    pub fn dispatch(&self, action: DraftAction) {
        self.0.lock().dispatch(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::actions::{Collection, Entry, ScalarField};

    fn with_skills(n: usize) -> EditorState {
        let mut state = EditorState::default();
        for _ in 0..n {
            state.dispatch(DraftAction::AddEntry(Entry::template(Collection::Skills)));
        }
        state
    }

    #[test]
    fn test_default_sections() {
        let mut state = EditorState::default();
        assert!(state.is_expanded(SectionId::Profile));
        assert!(state.is_expanded(SectionId::Summary));
        assert!(!state.is_expanded(SectionId::Experience));

        state.toggle_section(SectionId::Profile);
        state.toggle_section(SectionId::Skills);
        assert!(!state.is_expanded(SectionId::Profile));
        assert!(state.is_expanded(SectionId::Skills));
        assert_eq!(state.active_tab(), ActiveTab::Edit);
        state.set_active_tab(ActiveTab::Preview);
        assert_eq!(state.active_tab(), ActiveTab::Preview);
    }

    #[test]
    fn test_ticket_lifecycle() {
        let mut state = EditorState::default();
        let ticket = state.begin_enhancement(&EnhanceTarget::ProfileSummary);
        assert!(state.is_loading("profileSummary_main_"));

        assert!(state.merge_enhancement(&ticket, "Hello"));
        assert_eq!(state.draft().profile_summary, "Hello");

        state.finish_enhancement(&ticket);
        assert!(!state.is_loading("profileSummary_main_"));
        assert!(!state.is_current(&ticket));
    }

    #[test]
    fn test_newer_run_supersedes_older() {
        let mut state = EditorState::default();
        let old = state.begin_enhancement(&EnhanceTarget::ProfileSummary);
        let new = state.begin_enhancement(&EnhanceTarget::ProfileSummary);

        assert!(!state.merge_enhancement(&old, "stale"));
        assert!(state.merge_enhancement(&new, "fresh"));

        // The stale run finishing must not clear the newer run's flag.
        state.finish_enhancement(&old);
        assert!(state.is_loading(&new.key));
        assert_eq!(state.draft().profile_summary, "fresh");
    }

    #[test]
    fn test_cancel() {
        let mut state = EditorState::default();
        let ticket = state.begin_enhancement(&EnhanceTarget::ProfileSummary);
        assert!(state.cancel_enhancement(&ticket.key));
        assert!(!state.is_loading(&ticket.key));
        assert!(!state.merge_enhancement(&ticket, "late"));
        assert!(state.draft().profile_summary.is_empty());
        assert!(!state.cancel_enhancement(&ticket.key));
    }

    #[test]
    fn test_remove_supersedes_same_and_later_indices() {
        let mut state = with_skills(3);
        let before = state.begin_enhancement(&EnhanceTarget::Skill { index: 0 });
        let at = state.begin_enhancement(&EnhanceTarget::Skill { index: 1 });
        let after = state.begin_enhancement(&EnhanceTarget::Skill { index: 2 });
        let other = state.begin_enhancement(&EnhanceTarget::Certification { index: 1 });

        state.dispatch(DraftAction::RemoveEntry {
            collection: Collection::Skills,
            index: 1,
        });

        assert!(state.is_current(&before));
        assert!(!state.is_current(&at));
        assert!(!state.is_current(&after));
        assert!(state.is_current(&other));
        assert_eq!(state.draft().skills.len(), 2);
    }

    #[test]
    fn test_merge_ignores_missing_entry() {
        let mut state = EditorState::default();
        let ticket = state.begin_enhancement(&EnhanceTarget::Skill { index: 0 });
        assert!(!state.merge_enhancement(&ticket, "Rust"));
    }

    #[test]
    fn test_alerts_drain() {
        let mut state = EditorState::default();
        state.alert("one");
        state.alert(String::from("two"));
        assert_eq!(state.take_alerts(), vec!["one", "two"]);
        assert!(state.take_alerts().is_empty());
    }

    #[test]
    fn test_shared_handle_sees_dispatch() {
        let shared = SharedEditor::default();
        let other = shared.clone();
        shared.dispatch(DraftAction::SetField {
            field: ScalarField::Name,
            value: "Jane".to_string(),
        });
        assert_eq!(other.snapshot().name, "Jane");
        assert!(other.with(|s| matches!(s.preview(), Preview::Resume(_))));
    }
}
