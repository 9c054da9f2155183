//! Persistence contract for progression ledgers.

use progression_core::{PlayerId, PlayerProgression, TrackId};

use super::error::Result;

/// Per-track key-value store backing the ledgers.
///
/// The on-disk layout is the implementation's concern. Ledgers write through
/// every mutated entry and bulk-save a whole track on flush.
pub trait ProgressionStore: Send + Sync {
    /// Load every stored `(level, xp)` pair of a levelled track.
    fn load_levels(&self, track: TrackId) -> Result<Vec<(PlayerId, PlayerProgression)>>;

    /// Store one player's pair on a track.
    fn save_level(
        &self,
        track: TrackId,
        player: PlayerId,
        progression: &PlayerProgression,
    ) -> Result<()>;

    /// Store many pairs of a track at once.
    fn save_levels(&self, track: TrackId, entries: &[(PlayerId, PlayerProgression)]) -> Result<()> {
        for (player, progression) in entries {
            self.save_level(track, *player, progression)?;
        }
        Ok(())
    }

    /// Load every stored prestige count of a track.
    fn load_prestiges(&self, track: TrackId) -> Result<Vec<(PlayerId, u32)>>;

    /// Store one player's prestige count on a track.
    fn save_prestige(&self, track: TrackId, player: PlayerId, count: u32) -> Result<()>;

    /// Store many prestige counts of a track at once.
    fn save_prestiges(&self, track: TrackId, entries: &[(PlayerId, u32)]) -> Result<()> {
        for (player, count) in entries {
            self.save_prestige(track, *player, *count)?;
        }
        Ok(())
    }
}
