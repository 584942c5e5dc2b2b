//! Edit-session state machine for menu entries.
//!
//! At most one entry may be in edit mode at a time. Starting a new session
//! silently discards any unsaved draft of a prior one; there is no
//! confirmation step and no terminal state — the session is reusable.

use crate::menu::{MealEntry, MenuStore};

/// `Idle` or `Editing(id, draft)`. `Save` and `Cancel` both return to
/// `Idle`; only `Save` writes through to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    editing: Option<(u32, String)>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin editing `entry`, seeding the draft with its current meal text.
    /// Any prior unsaved draft is discarded.
    pub fn start(&mut self, entry: &MealEntry) {
        self.editing = Some((entry.id, entry.meal.clone()));
    }

    /// Replace the draft text. No-op when idle.
    pub fn set_draft(&mut self, text: &str) {
        if let Some((_, draft)) = self.editing.as_mut() {
            *draft = text.to_owned();
        }
    }

    /// Commit the trimmed draft through `store.update` and return to idle.
    ///
    /// Returns the edited id when a session was active. If the entry was
    /// deleted mid-edit the update is a store-level no-op and no error is
    /// surfaced; the session still ends.
    pub fn save(&mut self, store: &mut MenuStore) -> Option<u32> {
        let (id, draft) = self.editing.take()?;
        store.update(id, draft.trim());
        Some(id)
    }

    /// Discard the draft and return to idle without touching the store.
    pub fn cancel(&mut self) {
        self.editing = None;
    }

    /// Id of the entry being edited, if any.
    pub fn editing_id(&self) -> Option<u32> {
        self.editing.as_ref().map(|(id, _)| *id)
    }

    /// Current draft text, if a session is active.
    pub fn draft(&self) -> Option<&str> {
        self.editing.as_ref().map(|(_, draft)| draft.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_entry() -> (MenuStore, u32) {
        let mut store = MenuStore::new();
        let id = store.add("Monday", "Chicken Adobo").unwrap();
        (store, id)
    }

    #[test]
    fn start_seeds_draft_from_entry() {
        let (store, id) = store_with_entry();
        let mut session = EditSession::new();
        session.start(store.get(id).unwrap());
        assert_eq!(session.editing_id(), Some(id));
        assert_eq!(session.draft(), Some("Chicken Adobo"));
    }

    #[test]
    fn save_trims_and_writes_through() {
        let (mut store, id) = store_with_entry();
        let mut session = EditSession::new();
        session.start(store.get(id).unwrap());
        session.set_draft("  Pancit Canton  ");
        assert_eq!(session.save(&mut store), Some(id));
        assert_eq!(store.get(id).unwrap().meal, "Pancit Canton");
        assert_eq!(session.editing_id(), None, "save must return to idle");
    }

    #[test]
    fn cancel_discards_draft_without_mutating_store() {
        let (mut store, id) = store_with_entry();
        let mut session = EditSession::new();
        session.start(store.get(id).unwrap());
        session.set_draft("Something else");
        session.cancel();
        assert_eq!(session.editing_id(), None);
        assert_eq!(store.get(id).unwrap().meal, "Chicken Adobo");
    }

    #[test]
    fn starting_a_second_session_discards_the_first_draft() {
        let mut store = MenuStore::new();
        let a = store.add("Monday", "Adobo").unwrap();
        let b = store.add("Tuesday", "Sinigang").unwrap();

        let mut session = EditSession::new();
        session.start(store.get(a).unwrap());
        session.set_draft("Unsaved edit");
        session.start(store.get(b).unwrap());

        assert_eq!(session.editing_id(), Some(b));
        assert_eq!(session.draft(), Some("Sinigang"));
        assert_eq!(
            store.get(a).unwrap().meal,
            "Adobo",
            "abandoned draft must not reach the store"
        );
    }

    #[test]
    fn save_after_entry_deleted_ends_session_silently() {
        let (mut store, id) = store_with_entry();
        let mut session = EditSession::new();
        session.start(store.get(id).unwrap());
        session.set_draft("Edited");
        store.remove(id);

        assert_eq!(session.save(&mut store), Some(id));
        assert!(store.is_empty(), "update on a removed id must be a no-op");
        assert_eq!(session.editing_id(), None);
    }

    #[test]
    fn save_when_idle_is_a_no_op() {
        let (mut store, id) = store_with_entry();
        let mut session = EditSession::new();
        assert_eq!(session.save(&mut store), None);
        assert_eq!(store.get(id).unwrap().meal, "Chicken Adobo");
    }

    #[test]
    fn set_draft_when_idle_is_a_no_op() {
        let mut session = EditSession::new();
        session.set_draft("ghost");
        assert_eq!(session.draft(), None);
    }

    #[test]
    fn session_is_reusable_after_save() {
        let (mut store, id) = store_with_entry();
        let mut session = EditSession::new();
        session.start(store.get(id).unwrap());
        session.set_draft("First");
        session.save(&mut store);
        session.start(store.get(id).unwrap());
        assert_eq!(session.draft(), Some("First"));
    }
}
