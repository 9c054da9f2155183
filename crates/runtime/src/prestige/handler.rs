//! Per-track prestige handler.

use progression_core::{PlayerId, PlayerProgression, TrackId, TrackKind};

use super::registry::PrestigeRegistry;
use crate::api::{EngineError, Ineligibility, Result};
use crate::events::{Event, PrestigeAppliedNotification};

/// Prestige operations of one track.
///
/// Track-specific rules are an exhaustive match on [`TrackId`]; Exo reads
/// and resets the Experience pair and additionally requires a maxed
/// Experience prestige.
pub struct PrestigeHandler<'a> {
    registry: &'a PrestigeRegistry,
    track: TrackId,
}

impl<'a> PrestigeHandler<'a> {
    pub(super) fn new(registry: &'a PrestigeRegistry, track: TrackId) -> Self {
        Self { registry, track }
    }

    pub fn track(&self) -> TrackId {
        self.track
    }

    pub fn track_kind(&self) -> TrackKind {
        self.track.kind()
    }

    /// The `(level, xp)` pair this track prestiges from.
    pub fn current_state(&self, player: PlayerId) -> Result<PlayerProgression> {
        self.registry.experience.get(player, self.track)
    }

    pub fn prestige_count(&self, player: PlayerId) -> Result<u32> {
        self.registry.prestige.get(player, self.track)
    }

    /// First unmet precondition, if any. Reads only.
    pub fn check_eligibility(&self, player: PlayerId) -> Result<Option<Ineligibility>> {
        let registry = self.registry;

        let count = registry.prestige.get(player, self.track)?;
        let max = registry.prestige.max_prestige(self.track);
        if count >= max {
            return Ok(Some(Ineligibility::AtMaxPrestige { count, max }));
        }

        let level = self.current_state(player)?.level;
        let required = registry.experience.max_level(self.track);
        if level < required {
            return Ok(Some(Ineligibility::LevelTooLow { level, required }));
        }

        match self.track {
            TrackId::Exo => {
                let count = registry.prestige.get(player, TrackId::Experience)?;
                let required = registry.prestige.max_prestige(TrackId::Experience);
                if count < required {
                    return Ok(Some(Ineligibility::ExperiencePrestigeRequired {
                        count,
                        required,
                    }));
                }
            }
            TrackId::Experience | TrackId::Expertise(_) | TrackId::Legacy(_) => {}
        }

        Ok(None)
    }

    /// Reset the track's pair to `(0, 0)` and increment its prestige count.
    ///
    /// Returns the new count. An unmet precondition yields
    /// [`EngineError::NotEligible`] without mutating anything. A persistence
    /// failure is returned after both in-memory changes are applied.
    pub fn prestige(&self, player: PlayerId) -> Result<u32> {
        let registry = self.registry;
        let track = self.track;

        if let Some(reason) = self.check_eligibility(player)? {
            tracing::debug!(
                target: "progression::prestige",
                %player,
                %track,
                %reason,
                "prestige rejected"
            );
            return Err(EngineError::NotEligible { track, reason });
        }

        let mut write_failure = None;

        match registry.prestige.increment_capped(player, track) {
            Ok(_) => {}
            Err(err @ EngineError::PersistenceWriteFailure { .. }) => write_failure = Some(err),
            Err(err) => return Err(err),
        }
        let count = registry.prestige.get(player, track)?;

        match registry.experience.reset(player, track) {
            Ok(_) => {}
            Err(err @ EngineError::PersistenceWriteFailure { .. }) => {
                if write_failure.is_none() {
                    write_failure = Some(err);
                }
            }
            Err(err) => return Err(err),
        }

        let experience_prestige = registry.prestige.get(player, TrackId::Experience)?;
        let modifiers = registry.rates.modifiers(track, experience_prestige, count);

        tracing::info!(
            target: "progression::prestige",
            %player,
            %track,
            count,
            stat_bonus = modifiers.stat_bonus,
            "prestige applied"
        );
        registry
            .events
            .publish(Event::PrestigeApplied(PrestigeAppliedNotification {
                player,
                track,
                new_prestige_level: count,
                stat_bonus: modifiers.stat_bonus,
            }));

        match write_failure {
            Some(err) => Err(err),
            None => Ok(count),
        }
    }

    /// Flush this track's pair and prestige counts to the store.
    pub fn save(&self) -> Result<()> {
        let registry = self.registry;
        match self.track {
            TrackId::Experience | TrackId::Exo => {
                registry.experience.flush_track(TrackId::Experience)?;
            }
            TrackId::Expertise(_) | TrackId::Legacy(_) => {
                registry.experience.flush_track(self.track)?;
            }
        }
        registry.prestige.flush_track(self.track)?;
        Ok(())
    }
}
