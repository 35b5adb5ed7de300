use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    models::{Constructor, Driver},
    money::Price,
    storage::{self, KeyValueStore, StorageError},
};

use super::{
    outcome::{admit, DraftResult},
    state::{DraftRosterState, MAX_CONSTRUCTORS, MAX_DRIVERS, TOTAL_BUDGET},
};

/// When roster changes reach the persistence backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitMode {
    /// Write after every change.
    #[default]
    Immediate,
    /// Mark dirty and write on [`DraftStore::flush`].
    Deferred,
}

/// Owns one user's roster and enforces the draft rules on every change.
///
/// Each operation either succeeds with every rule intact or changes nothing.
/// Business failures come back as [`DraftResult`] values; storage failures are
/// logged and kept as a warning while the in-memory roster stays authoritative.
pub struct DraftStore<S: KeyValueStore> {
    state: DraftRosterState,
    storage: S,
    mode: CommitMode,
    dirty: bool,
    persist_warning: Option<String>,
}

impl<S: KeyValueStore> DraftStore<S> {
    /// Empty roster persisting through `storage`.
    pub fn new(storage: S) -> Self {
        Self {
            state: DraftRosterState::default(),
            storage,
            mode: CommitMode::default(),
            dirty: false,
            persist_warning: None,
        }
    }

    /// Roster restored from `storage`, or empty when nothing usable is stored.
    pub fn restore(storage: S) -> Self {
        let state = storage::load_state(&storage);
        info!(
            drivers = state.drafted_drivers.len(),
            constructors = state.drafted_constructors.len(),
            "Draft restored"
        );
        Self {
            state,
            ..Self::new(storage)
        }
    }

    /// Switch how changes are committed.
    pub fn with_commit_mode(mut self, mode: CommitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Current commit policy.
    pub fn commit_mode(&self) -> CommitMode {
        self.mode
    }

    /// Append `driver` to the draft order if it passes every rule.
    pub fn add_driver(&mut self, driver: Driver) -> DraftResult {
        let remaining = self.remaining_budget();
        let driver_id = driver.id;
        let result = admit(&mut self.state.drafted_drivers, driver, MAX_DRIVERS, remaining);
        debug!(driver_id, outcome = ?result.outcome, "add driver");
        if result.success {
            self.commit();
        }
        result
    }

    /// Remove the driver with `id`. Unknown ids are ignored.
    pub fn remove_driver(&mut self, id: u32) {
        let before = self.state.drafted_drivers.len();
        self.state.drafted_drivers.retain(|driver| driver.id != id);
        if self.state.drafted_drivers.len() != before {
            self.commit();
        }
    }

    /// Whether a driver with `id` is drafted.
    pub fn is_driver_drafted(&self, id: u32) -> bool {
        self.state.drafted_drivers.iter().any(|driver| driver.id == id)
    }

    /// Draft `constructor` against the shared budget.
    pub fn add_constructor(&mut self, constructor: Constructor) -> DraftResult {
        let remaining = self.remaining_budget();
        let constructor_id = constructor.id;
        let result = admit(
            &mut self.state.drafted_constructors,
            constructor,
            MAX_CONSTRUCTORS,
            remaining,
        );
        debug!(constructor_id, outcome = ?result.outcome, "add constructor");
        if result.success {
            self.commit();
        }
        result
    }

    /// Remove the constructor with `id`. Unknown ids are ignored.
    pub fn remove_constructor(&mut self, id: u32) {
        let before = self.state.drafted_constructors.len();
        self.state.drafted_constructors.retain(|team| team.id != id);
        if self.state.drafted_constructors.len() != before {
            self.commit();
        }
    }

    /// Whether a constructor with `id` is drafted.
    pub fn is_constructor_drafted(&self, id: u32) -> bool {
        self.state.drafted_constructors.iter().any(|team| team.id == id)
    }

    /// Move the driver at position `source` to position `dest`.
    ///
    /// Returns `false` without touching the roster when either index is out
    /// of range or both are equal.
    pub fn reorder_drivers(&mut self, source: usize, dest: usize) -> bool {
        let len = self.state.drafted_drivers.len();
        if source >= len || dest >= len {
            debug!(source, dest, len, "ignoring out-of-range reorder");
            return false;
        }
        if source == dest {
            return false;
        }
        let driver = self.state.drafted_drivers.remove(source);
        self.state.drafted_drivers.insert(dest, driver);
        self.commit();
        true
    }

    /// Empty both collections.
    pub fn clear_draft(&mut self) {
        if self.state.drafted_drivers.is_empty() && self.state.drafted_constructors.is_empty() {
            return;
        }
        self.state.drafted_drivers.clear();
        self.state.drafted_constructors.clear();
        self.commit();
    }

    /// Combined price of everything drafted.
    pub fn total_cost(&self) -> Price {
        self.state.total_cost()
    }

    /// Budget left after [`total_cost`](Self::total_cost).
    pub fn remaining_budget(&self) -> Price {
        self.state.remaining_budget()
    }

    /// Share of the budget already spent, from 0 to 100.
    pub fn budget_spent_percent(&self) -> f64 {
        f64::from(self.total_cost().tenths()) * 100.0 / f64::from(TOTAL_BUDGET.tenths())
    }

    /// Drivers in draft order.
    pub fn drafted_drivers(&self) -> &[Driver] {
        &self.state.drafted_drivers
    }

    /// Drafted constructors.
    pub fn drafted_constructors(&self) -> &[Constructor] {
        &self.state.drafted_constructors
    }

    /// Drivers plus constructors drafted.
    pub fn drafted_count(&self) -> usize {
        self.state.drafted_drivers.len() + self.state.drafted_constructors.len()
    }

    /// Every driver and constructor slot is filled.
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    /// Owned copy of the roster.
    pub fn snapshot(&self) -> DraftRosterState {
        self.state.clone()
    }

    /// Whether changes are waiting for [`flush`](Self::flush).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Most recent persistence failure, cleared once read.
    pub fn take_persist_warning(&mut self) -> Option<String> {
        self.persist_warning.take()
    }

    /// Backend the roster persists through.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Write pending changes to the backend.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        if !self.dirty {
            return Ok(());
        }
        match storage::save_state(&mut self.storage, &self.state) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(err) => {
                warn!("Failed to persist draft: {err}");
                self.persist_warning = Some(format!("Draft not saved: {err}"));
                Err(err)
            }
        }
    }

    fn commit(&mut self) {
        self.dirty = true;
        if self.mode == CommitMode::Immediate {
            // A failed write is already recorded as a warning.
            let _ = self.flush();
        }
    }
}
