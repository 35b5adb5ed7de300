use std::collections::HashSet;

use proptest::prelude::*;

use super::{
    test_gens::{self, Op},
    DraftOutcome, DraftStore, MAX_CONSTRUCTORS, MAX_DRIVERS, TOTAL_BUDGET,
};
use crate::{
    money::Price,
    storage::{decode_state, encode_state, MemoryStore},
};

fn apply(store: &mut DraftStore<MemoryStore>, op: Op) {
    match op {
        Op::AddDriver(driver) => {
            store.add_driver(driver);
        }
        Op::RemoveDriver(id) => store.remove_driver(id),
        Op::AddConstructor(team) => {
            store.add_constructor(team);
        }
        Op::RemoveConstructor(id) => store.remove_constructor(id),
        Op::Reorder(source, dest) => {
            store.reorder_drivers(source, dest);
        }
        Op::Clear => store.clear_draft(),
    }
}

fn unique<I: Iterator<Item = u32>>(ids: I) -> bool {
    let mut seen = HashSet::new();
    ids.into_iter().all(|id| seen.insert(id))
}

proptest! {
    /// Property: every roster rule holds after every operation.
    #[test]
    fn prop_rules_hold_after_each_operation(ops in test_gens::ops()) {
        let mut store = DraftStore::new(MemoryStore::new());
        for op in ops {
            apply(&mut store, op);
            prop_assert!(store.drafted_drivers().len() <= MAX_DRIVERS);
            prop_assert!(store.drafted_constructors().len() <= MAX_CONSTRUCTORS);
            prop_assert!(unique(store.drafted_drivers().iter().map(|d| d.id)));
            prop_assert!(unique(store.drafted_constructors().iter().map(|c| c.id)));
            prop_assert!(store.total_cost() <= TOTAL_BUDGET);
            prop_assert_eq!(
                store.remaining_budget().tenths() + store.total_cost().tenths(),
                TOTAL_BUDGET.tenths()
            );
        }
    }

    /// Property: a rejected add leaves the roster exactly as it was.
    #[test]
    fn prop_rejected_adds_change_nothing(
        ops in test_gens::ops(),
        driver in test_gens::driver(),
    ) {
        let mut store = DraftStore::new(MemoryStore::new());
        for op in ops {
            apply(&mut store, op);
        }
        let before = store.snapshot();
        let result = store.add_driver(driver);
        if !result.success {
            prop_assert_eq!(store.snapshot(), before);
        }
    }

    /// Property: a duplicate id is reported as a duplicate even when over budget.
    #[test]
    fn prop_duplicate_reported_first(driver in test_gens::driver()) {
        let mut store = DraftStore::new(MemoryStore::new());
        prop_assume!(store.add_driver(driver.clone()).success);
        let mut pricier = driver.clone();
        pricier.price = Price::from_tenths(1001);
        let result = store.add_driver(pricier);
        prop_assert_eq!(result.outcome, DraftOutcome::AlreadyDrafted);
        prop_assert_eq!(result.message, format!("{} is already in your draft.", driver.name));
    }

    /// Property: removing an id that is not drafted changes nothing.
    #[test]
    fn prop_remove_absent_is_idempotent(ops in test_gens::ops(), id in test_gens::id()) {
        let mut store = DraftStore::new(MemoryStore::new());
        for op in ops {
            apply(&mut store, op);
        }
        prop_assume!(!store.is_driver_drafted(id));
        let before = store.snapshot();
        store.remove_driver(id);
        prop_assert_eq!(store.snapshot(), before);
    }

    /// Property: encoding then decoding keeps members and driver order.
    #[test]
    fn prop_stored_roster_round_trips(ops in test_gens::ops()) {
        let mut store = DraftStore::new(MemoryStore::new());
        for op in ops {
            apply(&mut store, op);
        }
        let snapshot = store.snapshot();
        let encoded = encode_state(&snapshot).unwrap();
        prop_assert_eq!(decode_state(&encoded), Some(snapshot.clone()));

        let restored = DraftStore::restore(store.storage().clone());
        prop_assert_eq!(restored.snapshot(), snapshot);
    }
}
