//! Quest reward crediting.

use progression_core::TrackId;
use progression_core::gain;

use super::kill::KillEventProcessor;
use super::report::CreditOutcome;
use crate::api::{EngineError, QuestRewardExperienceEvent};

impl KillEventProcessor {
    /// Credit a quest reward of `fraction × level_to_xp(level) × multiplier`.
    ///
    /// Unlike kill credit this does not skip players at the cap; the ledger
    /// still clamps the result.
    pub fn process_quest_experience_gain(&self, event: &QuestRewardExperienceEvent) -> CreditOutcome {
        let player = event.player;
        let current = match self.experience.get(player, TrackId::Experience) {
            Ok(current) => current,
            Err(err) => {
                tracing::warn!(
                    target: "progression::kill",
                    %player,
                    error = %err,
                    "quest reward skipped, state unreadable"
                );
                return CreditOutcome::Failed(EngineError::ParticipantUnresolvable(player));
            }
        };

        let amount = gain::quest_experience(
            self.experience.curve(),
            self.config.leveling.quest_reward_fraction,
            current.level,
            event.multiplier,
        );
        tracing::debug!(
            target: "progression::kill",
            %player,
            level = current.level,
            multiplier = event.multiplier,
            amount,
            "quest experience"
        );

        self.apply(player, TrackId::Experience, amount)
    }
}
