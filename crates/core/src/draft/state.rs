#![allow(missing_docs)]

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    models::{Constructor, Draftable, Driver},
    money::Price,
};

/// Shared spending ceiling across drivers and constructors.
pub const TOTAL_BUDGET: Price = Price::from_tenths(1000);
/// Driver slots on a roster.
pub const MAX_DRIVERS: usize = 5;
/// Constructor slots on a roster.
pub const MAX_CONSTRUCTORS: usize = 2;

/// The drafted drivers (in draft order) and constructors for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRosterState {
    pub drafted_drivers: Vec<Driver>,
    pub drafted_constructors: Vec<Constructor>,
}

/// A broken roster rule, reported when validating restored state.
#[derive(Debug, Error, PartialEq)]
pub enum RosterViolation {
    #[error("{count} drivers exceeds the driver limit")]
    TooManyDrivers { count: usize },
    #[error("{count} constructors exceeds the constructor limit")]
    TooManyConstructors { count: usize },
    #[error("driver {0} appears more than once")]
    DuplicateDriver(u32),
    #[error("constructor {0} appears more than once")]
    DuplicateConstructor(u32),
    #[error("total cost {total} exceeds the budget")]
    OverBudget { total: Price },
}

impl DraftRosterState {
    /// Sum of every drafted price.
    pub fn total_cost(&self) -> Price {
        let drivers: Price = self.drafted_drivers.iter().map(|d| d.price).sum();
        let constructors: Price = self.drafted_constructors.iter().map(|c| c.price).sum();
        drivers + constructors
    }

    /// Budget left to spend.
    pub fn remaining_budget(&self) -> Price {
        TOTAL_BUDGET.saturating_sub(self.total_cost())
    }

    /// Whether every slot on the roster is filled.
    pub fn is_complete(&self) -> bool {
        self.drafted_drivers.len() == MAX_DRIVERS
            && self.drafted_constructors.len() == MAX_CONSTRUCTORS
    }

    /// Check every roster rule, returning the first one broken.
    pub fn validate(&self) -> Result<(), RosterViolation> {
        if self.drafted_drivers.len() > MAX_DRIVERS {
            return Err(RosterViolation::TooManyDrivers {
                count: self.drafted_drivers.len(),
            });
        }
        if self.drafted_constructors.len() > MAX_CONSTRUCTORS {
            return Err(RosterViolation::TooManyConstructors {
                count: self.drafted_constructors.len(),
            });
        }
        if let Some(id) = first_duplicate(&self.drafted_drivers) {
            return Err(RosterViolation::DuplicateDriver(id));
        }
        if let Some(id) = first_duplicate(&self.drafted_constructors) {
            return Err(RosterViolation::DuplicateConstructor(id));
        }
        let total = self.total_cost();
        if total > TOTAL_BUDGET {
            return Err(RosterViolation::OverBudget { total });
        }
        Ok(())
    }
}

fn first_duplicate<T: Draftable>(items: &[T]) -> Option<u32> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(Draftable::id)
        .find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(id: u32, tenths: u32) -> Driver {
        Driver::new(id, format!("Driver {id}"), "Team", Price::from_tenths(tenths))
    }

    #[test]
    fn derived_values_track_members() {
        let mut state = DraftRosterState::default();
        assert_eq!(state.total_cost(), Price::ZERO);
        assert_eq!(state.remaining_budget(), TOTAL_BUDGET);

        state.drafted_drivers.push(driver(1, 305));
        state
            .drafted_constructors
            .push(Constructor::new(2, "Ferrari", Price::from_tenths(270)));
        assert_eq!(state.total_cost(), Price::from_tenths(575));
        assert_eq!(state.remaining_budget(), Price::from_tenths(425));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn validate_reports_each_rule() {
        let mut state = DraftRosterState::default();
        state.drafted_drivers = (0..6).map(|id| driver(id, 10)).collect();
        assert_eq!(
            state.validate(),
            Err(RosterViolation::TooManyDrivers { count: 6 })
        );

        state.drafted_drivers = vec![driver(1, 10), driver(1, 10)];
        assert_eq!(state.validate(), Err(RosterViolation::DuplicateDriver(1)));

        state.drafted_drivers = vec![driver(1, 600), driver(2, 401)];
        assert_eq!(
            state.validate(),
            Err(RosterViolation::OverBudget {
                total: Price::from_tenths(1001)
            })
        );

        state.drafted_drivers.clear();
        state.drafted_constructors = vec![
            Constructor::new(1, "A", Price::ZERO),
            Constructor::new(2, "B", Price::ZERO),
            Constructor::new(3, "C", Price::ZERO),
        ];
        assert_eq!(
            state.validate(),
            Err(RosterViolation::TooManyConstructors { count: 3 })
        );
    }

    #[test]
    fn missing_collections_are_rejected() {
        let parsed = serde_json::from_str::<DraftRosterState>(r#"{"draftedDrivers": []}"#);
        assert!(parsed.is_err());
    }
}
