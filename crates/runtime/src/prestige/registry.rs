//! Track resolution and registry-wide prestige operations.

use std::sync::Arc;

use progression_core::{PlayerId, ProgressionConfig, RateModifierCalculator, TrackId};

use super::handler::PrestigeHandler;
use crate::api::{PrestigeCommand, Result};
use crate::events::EventBus;
use crate::repository::{ExperienceLedger, PrestigeLedger};

/// Resolves prestige handlers by track name and runs prestige commands.
pub struct PrestigeRegistry {
    pub(super) config: Arc<ProgressionConfig>,
    pub(super) experience: Arc<ExperienceLedger>,
    pub(super) prestige: Arc<PrestigeLedger>,
    pub(super) events: EventBus,
    pub(super) rates: RateModifierCalculator,
}

impl PrestigeRegistry {
    pub fn new(
        config: Arc<ProgressionConfig>,
        experience: Arc<ExperienceLedger>,
        prestige: Arc<PrestigeLedger>,
        events: EventBus,
    ) -> Self {
        let rates = RateModifierCalculator::new(config.prestige);
        Self {
            config,
            experience,
            prestige,
            events,
            rates,
        }
    }

    /// Handler for a track name such as `"experience"`, `"exo"` or `"great_sword"`.
    pub fn resolve(&self, name: &str) -> Result<PrestigeHandler<'_>> {
        let track: TrackId = name.parse()?;
        Ok(self.handler(track))
    }

    pub fn handler(&self, track: TrackId) -> PrestigeHandler<'_> {
        PrestigeHandler::new(self, track)
    }

    /// Parse the command's track and prestige it. Returns the new count.
    pub fn prestige(&self, command: &PrestigeCommand) -> Result<u32> {
        self.resolve(&command.track)?.prestige(command.player)
    }

    /// Admin reset of a prestige count to zero. Returns the previous count.
    ///
    /// Level pairs are left untouched and nothing is published.
    pub fn reset_prestige(&self, player: PlayerId, track: TrackId) -> Result<u32> {
        let previous = self.prestige.set(player, track, 0)?;
        tracing::info!(
            target: "progression::prestige",
            %player,
            %track,
            previous,
            "prestige reset"
        );
        Ok(previous)
    }

    /// Flush every track of both ledgers.
    pub fn save_all(&self) -> Result<()> {
        for track in TrackId::levelled() {
            self.experience.flush_track(track)?;
        }
        for track in TrackId::all() {
            self.prestige.flush_track(track)?;
        }
        tracing::debug!(target: "progression::prestige", "all tracks saved");
        Ok(())
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }
}
