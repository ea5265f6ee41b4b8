//! Owned draft slot surviving navigation between wizard steps.
//!
//! The console's previous incarnation kept this in an ambient cross-page
//! store that was never emptied after a successful submit. Here the store
//! is owned by the wizard session, initialized when the wizard is entered
//! and cleared explicitly when the submit resolves successfully.

use crate::model::Draft;

/// Single-slot store for the in-progress draft.
#[derive(Debug, Default)]
pub struct DraftStore {
    slot: Draft,
}

impl DraftStore {
    /// Empty store, used when the wizard is entered in create mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with an existing record, for edit mode.
    pub fn seeded(draft: Draft) -> Self {
        Self { slot: draft }
    }

    /// Current draft snapshot.
    pub fn read(&self) -> &Draft {
        &self.slot
    }

    /// Replace the stored draft; called on every field-level change.
    pub fn write(&mut self, draft: Draft) {
        self.slot = draft;
    }

    /// Reset the slot to an empty draft.
    pub fn clear(&mut self) {
        self.slot = Draft::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips_and_clear_resets() {
        let mut store = DraftStore::new();
        assert_eq!(store.read(), &Draft::default());

        let draft = Draft {
            code: "S0007".to_string(),
            ..Draft::default()
        };
        store.write(draft.clone());
        assert_eq!(store.read(), &draft);

        store.clear();
        assert_eq!(store.read(), &Draft::default());
    }
}
