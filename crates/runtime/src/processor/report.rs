//! Per-event crediting outcomes.

use std::collections::BTreeSet;

use progression_core::{PlayerId, TrackId};

use crate::api::EngineError;
use crate::repository::LevelChange;

/// What happened to one player on one track.
#[derive(Debug)]
pub enum CreditOutcome {
    /// Experience was applied (possibly zero after multipliers).
    Credited(LevelChange),
    /// Player already sits at the track cap; kill credit is skipped.
    AlreadyAtCap,
    /// Reading or writing this player's state failed. Other players were still
    /// credited; a persistence failure keeps the in-memory change.
    Failed(EngineError),
}

impl CreditOutcome {
    pub fn change(&self) -> Option<&LevelChange> {
        match self {
            Self::Credited(change) => Some(change),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug)]
pub struct Credit {
    pub player: PlayerId,
    pub track: TrackId,
    pub outcome: CreditOutcome,
}

/// Why an event credited nobody.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Victim has no level attribute.
    NoLevel,
    /// Victim is a summoned minion.
    Minion,
}

/// Result of processing one kill event.
#[derive(Debug, Default)]
pub struct KillReport {
    pub ignored: Option<IgnoreReason>,
    /// Players resolved to share the master-level credit.
    pub participants: BTreeSet<PlayerId>,
    pub group_multiplier: f64,
    pub credits: Vec<Credit>,
}

impl KillReport {
    pub(crate) fn ignored(reason: IgnoreReason) -> Self {
        Self {
            ignored: Some(reason),
            ..Self::default()
        }
    }

    pub(crate) fn push(&mut self, player: PlayerId, track: TrackId, outcome: CreditOutcome) {
        self.credits.push(Credit {
            player,
            track,
            outcome,
        });
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored.is_some()
    }

    /// Outcome for one player on one track, if the event touched it.
    pub fn outcome(&self, player: PlayerId, track: TrackId) -> Option<&CreditOutcome> {
        self.credits
            .iter()
            .find(|credit| credit.player == player && credit.track == track)
            .map(|credit| &credit.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Credit> {
        self.credits.iter().filter(|credit| credit.outcome.is_failed())
    }

    pub fn level_ups(&self) -> impl Iterator<Item = &Credit> {
        self.credits.iter().filter(|credit| {
            credit
                .outcome
                .change()
                .is_some_and(LevelChange::leveled_up)
        })
    }
}
