//! Draft roster state and the rules that guard it.

mod outcome;
mod shared;
mod state;
mod store;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_props;

pub use outcome::{DraftOutcome, DraftResult};
pub use shared::SharedDraftStore;
pub use state::{DraftRosterState, RosterViolation, MAX_CONSTRUCTORS, MAX_DRIVERS, TOTAL_BUDGET};
pub use store::{CommitMode, DraftStore};
