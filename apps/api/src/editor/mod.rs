// Form state: the draft reducer and the editor container that owns the draft
// alongside loading flags, section toggles and alerts.

pub mod actions;
pub mod state;

pub use actions::{Collection, DraftAction, Entry, EntryField, ScalarField};
pub use state::{ActiveTab, EditorState, EnhancementTicket, SectionId, SharedEditor};
