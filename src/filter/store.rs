//! Persistence of the search and filter state under a single storage key.

use std::sync::Arc;

use crate::filter::state::SearchFilterState;
use crate::storage::{Storage, load_json, save_json};

pub const FILTERS_KEY: &str = "bugdeck.filters";

/// Persisted [`SearchFilterState`].
///
/// Loads once at construction and writes the full state back after every
/// mutation.
pub struct FilterStore {
    storage: Arc<dyn Storage>,
    state: SearchFilterState,
}

impl FilterStore {
    /// Load the stored state, or the default when none is stored or the
    /// stored blob cannot be decoded.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let state = load_json(storage.as_ref(), FILTERS_KEY).unwrap_or_default();
        Self { storage, state }
    }

    pub fn state(&self) -> &SearchFilterState {
        &self.state
    }

    /// Apply a mutation and persist the result.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut SearchFilterState) -> R) -> R {
        let result = f(&mut self.state);
        self.persist();
        result
    }

    /// Restore the default state and persist it.
    pub fn reset(&mut self) {
        self.update(|state| *state = SearchFilterState::default());
    }

    fn persist(&self) {
        save_json(self.storage.as_ref(), FILTERS_KEY, &self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::state::{FilterDimension, SortField, SortOrder};
    use crate::storage::MemoryStorage;

    #[test]
    fn test_load_without_stored_state_is_default() {
        let store = FilterStore::load(Arc::new(MemoryStorage::new()));
        assert_eq!(store.state(), &SearchFilterState::default());
    }

    #[test]
    fn test_malformed_blob_falls_back_to_default() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(FILTERS_KEY, "][").unwrap();
        let store = FilterStore::load(storage);
        assert_eq!(store.state(), &SearchFilterState::default());
    }

    #[test]
    fn test_mutations_persist_and_reload() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = FilterStore::load(Arc::clone(&storage));
        store.update(|s| s.set_search_term("crash"));
        store
            .update(|s| s.toggle(FilterDimension::Severity, "critical"))
            .unwrap();
        store.update(|s| s.set_sort(SortField::Priority, SortOrder::Asc));

        let reloaded = FilterStore::load(storage);
        assert_eq!(reloaded.state(), store.state());
        assert_eq!(reloaded.state().search_term, "crash");
        assert_eq!(reloaded.state().sort_by, SortField::Priority);
    }

    #[test]
    fn test_reset_persists_default() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = FilterStore::load(Arc::clone(&storage));
        store.update(|s| s.set_search_term("modal"));
        store.reset();
        let reloaded = FilterStore::load(storage);
        assert!(!reloaded.state().has_active_filters());
    }
}
