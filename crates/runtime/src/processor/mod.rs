//! Event processing: kills, consumptions and quest rewards.
//!
//! [`KillEventProcessor`] resolves participants, computes each gain with the
//! pure formulas in `progression_core::gain`, applies it through the
//! experience ledger and publishes notifications.
mod kill;
mod quest;
mod report;

pub use kill::KillEventProcessor;
pub use report::{Credit, CreditOutcome, IgnoreReason, KillReport};
