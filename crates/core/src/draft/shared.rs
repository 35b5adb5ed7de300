#![allow(missing_docs)]

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    models::{Constructor, Driver},
    money::Price,
    storage::{KeyValueStore, StorageError},
};

use super::{outcome::DraftResult, state::DraftRosterState, store::DraftStore};

/// Thread-safe handle to a single roster.
///
/// Every call holds the lock for its whole check-then-act sequence, so two
/// racing adds against the same budget cannot both pass the budget check.
pub struct SharedDraftStore<S: KeyValueStore> {
    inner: Arc<Mutex<DraftStore<S>>>,
}

impl<S: KeyValueStore> Clone for SharedDraftStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> SharedDraftStore<S> {
    pub fn new(store: DraftStore<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `f` with exclusive access to the store.
    pub fn with<R>(&self, f: impl FnOnce(&mut DraftStore<S>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    pub fn add_driver(&self, driver: Driver) -> DraftResult {
        self.with(|store| store.add_driver(driver))
    }

    pub fn remove_driver(&self, id: u32) {
        self.with(|store| store.remove_driver(id))
    }

    pub fn is_driver_drafted(&self, id: u32) -> bool {
        self.inner.lock().is_driver_drafted(id)
    }

    pub fn add_constructor(&self, constructor: Constructor) -> DraftResult {
        self.with(|store| store.add_constructor(constructor))
    }

    pub fn remove_constructor(&self, id: u32) {
        self.with(|store| store.remove_constructor(id))
    }

    pub fn is_constructor_drafted(&self, id: u32) -> bool {
        self.inner.lock().is_constructor_drafted(id)
    }

    pub fn reorder_drivers(&self, source: usize, dest: usize) -> bool {
        self.with(|store| store.reorder_drivers(source, dest))
    }

    pub fn clear_draft(&self) {
        self.with(|store| store.clear_draft())
    }

    pub fn total_cost(&self) -> Price {
        self.inner.lock().total_cost()
    }

    pub fn remaining_budget(&self) -> Price {
        self.inner.lock().remaining_budget()
    }

    pub fn snapshot(&self) -> DraftRosterState {
        self.inner.lock().snapshot()
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.with(|store| store.flush())
    }

    pub fn take_persist_warning(&self) -> Option<String> {
        self.with(|store| store.take_persist_warning())
    }
}
