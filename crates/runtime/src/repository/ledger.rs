//! Experience ledger: authoritative `(level, xp)` pairs per player and track.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use progression_core::{LevelCurve, PlayerId, PlayerProgression, ProgressionConfig, TrackId};

use crate::api::{EngineError, Result};
use crate::repository::{ProgressionStore, RepositoryError};

/// Outcome of a single [`ExperienceLedger::add_experience`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelChange {
    pub before: PlayerProgression,
    pub after: PlayerProgression,
    /// Experience actually applied after clamping to the track cap.
    pub gained: f64,
}

impl LevelChange {
    pub fn leveled_up(&self) -> bool {
        self.after.level > self.before.level
    }
}

/// Per-player level state for every levelled track.
///
/// Exo shares the Experience pair; every track argument is folded through
/// [`TrackId::level_track`]. Each mutation happens under the write lock and
/// is written through to the store before the lock is released, so a
/// player's pair has a single writer and its store writes stay ordered.
pub struct ExperienceLedger {
    config: Arc<ProgressionConfig>,
    curve: LevelCurve,
    entries: RwLock<HashMap<(PlayerId, TrackId), PlayerProgression>>,
    store: Arc<dyn ProgressionStore>,
}

impl ExperienceLedger {
    /// Load every levelled track from `store`.
    ///
    /// Stored levels are re-derived from stored experience so entries written
    /// under a different curve still satisfy the level invariant.
    pub fn load(config: Arc<ProgressionConfig>, store: Arc<dyn ProgressionStore>) -> Result<Self> {
        let curve = LevelCurve::from_config(&config.curve);
        let mut entries = HashMap::new();

        for track in TrackId::levelled() {
            let max_level = config.max_level_for(track);
            for (player, stored) in store.load_levels(track)? {
                let level = curve.xp_to_level(stored.experience).min(max_level);
                entries.insert(
                    (player, track),
                    PlayerProgression::new(level, stored.experience.max(0.0)),
                );
            }
        }

        tracing::debug!(
            target: "progression::ledger",
            entries = entries.len(),
            "experience ledger loaded"
        );

        Ok(Self {
            config,
            curve,
            entries: RwLock::new(entries),
            store,
        })
    }

    pub fn curve(&self) -> &LevelCurve {
        &self.curve
    }

    pub fn max_level(&self, track: TrackId) -> u32 {
        self.config.max_level_for(track)
    }

    /// Current pair; `(0, 0)` when the player has none on this track.
    pub fn get(&self, player: PlayerId, track: TrackId) -> Result<PlayerProgression> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(entries
            .get(&(player, track.level_track()))
            .copied()
            .unwrap_or(PlayerProgression::ZERO))
    }

    pub fn contains(&self, player: PlayerId, track: TrackId) -> Result<bool> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(entries.contains_key(&(player, track.level_track())))
    }

    /// Progress towards the next level of the player's current pair.
    pub fn progress_percent(&self, player: PlayerId, track: TrackId) -> Result<f64> {
        let progression = self.get(player, track)?;
        Ok(self
            .curve
            .progress_percent(progression.experience, self.max_level(track)))
    }

    /// Add `delta` experience and re-derive the level, clamping at the cap.
    ///
    /// Negative or NaN deltas leave the pair untouched. The caller decides
    /// whether a player already at the cap should be credited at all.
    pub fn add_experience(
        &self,
        player: PlayerId,
        track: TrackId,
        delta: f64,
    ) -> Result<LevelChange> {
        let track = track.level_track();
        let max_level = self.max_level(track);

        let mut entries = self
            .entries
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let before = entries
            .get(&(player, track))
            .copied()
            .unwrap_or(PlayerProgression::ZERO);

        if delta.is_nan() || delta <= 0.0 {
            return Ok(LevelChange {
                before,
                after: before,
                gained: 0.0,
            });
        }

        let mut experience = before.experience + delta;
        let mut level = self.curve.xp_to_level(experience);
        if level > max_level {
            level = max_level;
            experience = self.curve.level_to_xp(max_level);
        }

        let after = PlayerProgression::new(level, experience);
        entries.insert((player, track), after);
        self.write_through(track, player, &after)?;

        Ok(LevelChange {
            before,
            after,
            gained: (after.experience - before.experience).max(0.0),
        })
    }

    /// Create the pair at `starting_level` if the player has none yet.
    ///
    /// Returns `true` when a new entry was created.
    pub fn ensure(&self, player: PlayerId, track: TrackId, starting_level: u32) -> Result<bool> {
        let track = track.level_track();
        let level = starting_level.min(self.max_level(track));

        let mut entries = self
            .entries
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        if entries.contains_key(&(player, track)) {
            return Ok(false);
        }

        let progression = PlayerProgression::new(level, self.curve.level_to_xp(level));
        entries.insert((player, track), progression);
        self.write_through(track, player, &progression)?;

        tracing::debug!(
            target: "progression::ledger",
            %player,
            %track,
            level,
            "progression created"
        );
        Ok(true)
    }

    /// Reset the pair to `(0, 0)` and return the previous value.
    pub fn reset(&self, player: PlayerId, track: TrackId) -> Result<PlayerProgression> {
        let track = track.level_track();

        let mut entries = self
            .entries
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let previous = entries
            .insert((player, track), PlayerProgression::ZERO)
            .unwrap_or(PlayerProgression::ZERO);
        self.write_through(track, player, &PlayerProgression::ZERO)?;

        Ok(previous)
    }

    /// Every stored pair of a track, ordered by player.
    pub fn snapshot(&self, track: TrackId) -> Result<Vec<(PlayerId, PlayerProgression)>> {
        let track = track.level_track();
        let entries = self
            .entries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut snapshot: Vec<_> = entries
            .iter()
            .filter(|((_, entry_track), _)| *entry_track == track)
            .map(|((player, _), progression)| (*player, *progression))
            .collect();
        snapshot.sort_unstable_by_key(|(player, _)| *player);
        Ok(snapshot)
    }

    /// Save every pair of a track to the store.
    pub fn flush_track(&self, track: TrackId) -> Result<usize> {
        let track = track.level_track();
        let snapshot = self.snapshot(track)?;
        self.store
            .save_levels(track, &snapshot)
            .map_err(|source| EngineError::PersistenceWriteFailure { track, source })?;

        tracing::debug!(
            target: "progression::ledger",
            %track,
            entries = snapshot.len(),
            "track flushed"
        );
        Ok(snapshot.len())
    }

    /// Poison the lock by panicking while holding it.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.entries.write();
            panic!("poisoning experience ledger");
        }));
    }

    fn write_through(
        &self,
        track: TrackId,
        player: PlayerId,
        progression: &PlayerProgression,
    ) -> Result<()> {
        self.store
            .save_level(track, player, progression)
            .map_err(|source| {
                tracing::warn!(
                    target: "progression::ledger",
                    %player,
                    %track,
                    error = %source,
                    "failed to persist progression"
                );
                EngineError::PersistenceWriteFailure { track, source }
            })
    }
}
