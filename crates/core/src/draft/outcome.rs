#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::{models::Draftable, money::Price};

/// Why an add was accepted or turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftOutcome {
    Added,
    AlreadyDrafted,
    RosterFull,
    OverBudget,
}

/// Result of an add, carrying a message ready to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftResult {
    pub success: bool,
    pub message: String,
    pub outcome: DraftOutcome,
}

impl DraftResult {
    fn added(message: String) -> Self {
        Self {
            success: true,
            message,
            outcome: DraftOutcome::Added,
        }
    }

    fn rejected(outcome: DraftOutcome, message: String) -> Self {
        Self {
            success: false,
            message,
            outcome,
        }
    }
}

/// Append `item` to `roster` if it passes the duplicate, capacity and budget
/// checks, in that order. The first failing check wins and leaves `roster` untouched.
pub(crate) fn admit<T: Draftable>(
    roster: &mut Vec<T>,
    item: T,
    capacity: usize,
    remaining: Price,
) -> DraftResult {
    if roster.iter().any(|entry| entry.id() == item.id()) {
        return DraftResult::rejected(
            DraftOutcome::AlreadyDrafted,
            format!("{} is already in your draft.", item.name()),
        );
    }
    if roster.len() >= capacity {
        return DraftResult::rejected(
            DraftOutcome::RosterFull,
            format!("You can only have {capacity} {}s.", T::KIND),
        );
    }
    // Spending exactly down to zero is allowed.
    if remaining < item.price() {
        return DraftResult::rejected(
            DraftOutcome::OverBudget,
            format!("Not enough budget to draft this {}.", T::KIND),
        );
    }

    let message = format!("{} added to your draft!", item.name());
    roster.push(item);
    DraftResult::added(message)
}
