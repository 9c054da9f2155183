//! Kill and consumption crediting.

use std::collections::BTreeSet;
use std::sync::Arc;

use progression_core::gain::{self, ParticipantStanding};
use progression_core::{
    PlayerId, ProgressionConfig, RateModifierCalculator, TrackId, VictimDescriptor,
};

use super::report::{CreditOutcome, IgnoreReason, KillReport};
use crate::api::{EngineError, KillEvent};
use crate::events::{Event, EventBus, ExperienceGainNotice, LevelUpNotification};
use crate::group::GroupResolver;
use crate::oracle::PlayerDirectory;
use crate::repository::{ExperienceLedger, LevelChange, PrestigeLedger};

/// Turns kill, consumption and quest events into ledger credit.
///
/// Crediting is isolated per player: a failure for one participant is
/// recorded in the [`KillReport`] and the remaining participants are still
/// credited.
pub struct KillEventProcessor {
    pub(super) config: Arc<ProgressionConfig>,
    pub(super) experience: Arc<ExperienceLedger>,
    pub(super) prestige: Arc<PrestigeLedger>,
    pub(super) directory: Arc<dyn PlayerDirectory>,
    pub(super) events: EventBus,
    rates: RateModifierCalculator,
}

impl KillEventProcessor {
    pub fn new(
        config: Arc<ProgressionConfig>,
        experience: Arc<ExperienceLedger>,
        prestige: Arc<PrestigeLedger>,
        directory: Arc<dyn PlayerDirectory>,
        events: EventBus,
    ) -> Self {
        let rates = RateModifierCalculator::new(config.prestige);
        Self {
            config,
            experience,
            prestige,
            directory,
            events,
            rates,
        }
    }

    pub fn process_kill(&self, event: &KillEvent) -> KillReport {
        let victim = &event.victim;
        let Some(victim_level) = victim.levelable_level() else {
            let reason = if victim.is_minion() {
                IgnoreReason::Minion
            } else {
                IgnoreReason::NoLevel
            };
            tracing::trace!(
                target: "progression::kill",
                killer = %event.killer,
                ?reason,
                "victim not levelable"
            );
            return KillReport::ignored(reason);
        };

        let participants = if victim.is_boss() {
            BTreeSet::from([event.killer])
        } else {
            GroupResolver::new(&self.config.group, self.directory.as_ref()).resolve(event.killer)
        };

        let mut report = KillReport {
            group_multiplier: gain::group_multiplier(
                self.config.leveling.group_multiplier,
                participants.len(),
            ),
            ..KillReport::default()
        };

        for &player in &participants {
            let outcome = self.credit_participant(player, victim, victim_level, participants.len());
            report.push(player, TrackId::Experience, outcome);
        }
        report.participants = participants;

        if let Some((track, outcome)) = self.credit_expertise(event.killer, victim) {
            report.push(event.killer, track, outcome);
        }
        if event.consumed
            && let Some((track, outcome)) = self.credit_legacy(event.killer, victim, victim_level)
        {
            report.push(event.killer, track, outcome);
        }

        report
    }

    fn credit_participant(
        &self,
        player: PlayerId,
        victim: &VictimDescriptor,
        victim_level: u32,
        participants: usize,
    ) -> CreditOutcome {
        let standing = match self.standing(player) {
            Ok(standing) => standing,
            Err(err) => return Self::unresolvable(player, TrackId::Experience, err),
        };

        let max_level = self.experience.max_level(TrackId::Experience);
        if standing.level >= max_level {
            tracing::trace!(
                target: "progression::kill",
                %player,
                level = standing.level,
                "already at level cap"
            );
            return CreditOutcome::AlreadyAtCap;
        }

        let gain = gain::kill_experience(&self.config, victim, victim_level, standing, participants);
        tracing::debug!(
            target: "progression::kill",
            %player,
            base = gain.base,
            bonus = gain.bonus,
            taper = gain.taper,
            prestige = gain.prestige,
            environment = gain.environment,
            group = gain.group,
            total = gain.total,
            "kill experience"
        );

        self.apply(player, TrackId::Experience, gain.total)
    }

    fn credit_expertise(
        &self,
        killer: PlayerId,
        victim: &VictimDescriptor,
    ) -> Option<(TrackId, CreditOutcome)> {
        if !self.config.expertise.enabled {
            return None;
        }
        let weapon = self.directory.equipped_weapon(killer)?;
        let track = TrackId::Expertise(weapon);
        let raw = gain::expertise_experience(&self.config.expertise, victim);
        Some((track, self.credit_track(killer, track, raw)))
    }

    fn credit_legacy(
        &self,
        killer: PlayerId,
        victim: &VictimDescriptor,
        victim_level: u32,
    ) -> Option<(TrackId, CreditOutcome)> {
        if !self.config.legacy.enabled {
            return None;
        }
        let legacy = self.directory.blood_legacy(killer)?;
        let track = TrackId::Legacy(legacy);
        let raw = gain::legacy_experience(&self.config.legacy, victim, victim_level);
        Some((track, self.credit_track(killer, track, raw)))
    }

    /// Credit a weapon or blood track, scaled by its net prestige rate.
    fn credit_track(&self, player: PlayerId, track: TrackId, raw: f64) -> CreditOutcome {
        let counts = self
            .experience
            .get(player, track)
            .and_then(|current| {
                let experience_prestige = self.prestige.get(player, TrackId::Experience)?;
                let track_prestige = self.prestige.get(player, track)?;
                Ok((current, experience_prestige, track_prestige))
            });
        let (current, experience_prestige, track_prestige) = match counts {
            Ok(counts) => counts,
            Err(err) => return Self::unresolvable(player, track, err),
        };

        if current.level >= self.experience.max_level(track) {
            tracing::trace!(
                target: "progression::kill",
                %player,
                %track,
                "already at track cap"
            );
            return CreditOutcome::AlreadyAtCap;
        }

        let modifiers = self
            .rates
            .modifiers(track, experience_prestige, track_prestige);
        let amount = gain::apply_rate(raw, modifiers.net_rate_delta);
        tracing::debug!(
            target: "progression::kill",
            %player,
            %track,
            raw,
            net_rate_delta = modifiers.net_rate_delta,
            amount,
            "track experience"
        );

        self.apply(player, track, amount)
    }

    fn standing(&self, player: PlayerId) -> crate::api::Result<ParticipantStanding> {
        Ok(ParticipantStanding {
            level: self.experience.get(player, TrackId::Experience)?.level,
            experience_prestige: self.prestige.get(player, TrackId::Experience)?,
            exo_prestige: self.prestige.get(player, TrackId::Exo)?,
        })
    }

    /// Add experience and publish notifications for a successful write.
    pub(super) fn apply(&self, player: PlayerId, track: TrackId, amount: f64) -> CreditOutcome {
        match self.experience.add_experience(player, track, amount) {
            Ok(change) => {
                self.notify(player, track, &change);
                CreditOutcome::Credited(change)
            }
            Err(err @ EngineError::PersistenceWriteFailure { .. }) => {
                tracing::warn!(
                    target: "progression::kill",
                    %player,
                    %track,
                    error = %err,
                    "credit applied in memory but not persisted"
                );
                CreditOutcome::Failed(err)
            }
            Err(err) => Self::unresolvable(player, track, err),
        }
    }

    fn notify(&self, player: PlayerId, track: TrackId, change: &LevelChange) {
        if change.leveled_up() {
            tracing::info!(
                target: "progression::kill",
                %player,
                %track,
                from = change.before.level,
                to = change.after.level,
                "level up"
            );
            self.events.publish(Event::LevelUp(LevelUpNotification {
                player,
                track,
                previous_level: change.before.level,
                new_level: change.after.level,
            }));
        }

        if self.directory.experience_log_enabled(player) {
            let progress_percent = self
                .experience
                .curve()
                .progress_percent(change.after.experience, self.experience.max_level(track));
            self.events
                .publish(Event::ExperienceGained(ExperienceGainNotice {
                    player,
                    track,
                    amount: change.gained,
                    level: change.after.level,
                    progress_percent,
                }));
        }
    }

    fn unresolvable(player: PlayerId, track: TrackId, err: EngineError) -> CreditOutcome {
        tracing::warn!(
            target: "progression::kill",
            %player,
            %track,
            error = %err,
            "participant state unreadable, skipping"
        );
        CreditOutcome::Failed(EngineError::ParticipantUnresolvable(player))
    }
}
