//! Prestige ledger: per-player, per-track prestige counters.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use progression_core::{PlayerId, PrestigeRecord, ProgressionConfig, TrackId};

use crate::api::{EngineError, Ineligibility, Result};
use crate::repository::{ProgressionStore, RepositoryError};

/// Prestige counts for all 23 tracks.
///
/// Counts stay within `[0, MaxPrestige(track)]`; the cap is checked under the
/// same write lock that increments.
pub struct PrestigeLedger {
    config: Arc<ProgressionConfig>,
    counts: RwLock<HashMap<(PlayerId, TrackId), u32>>,
    store: Arc<dyn ProgressionStore>,
}

impl PrestigeLedger {
    pub fn load(config: Arc<ProgressionConfig>, store: Arc<dyn ProgressionStore>) -> Result<Self> {
        let mut counts = HashMap::new();
        for track in TrackId::all() {
            let max = config.max_prestige_for(track);
            for (player, count) in store.load_prestiges(track)? {
                counts.insert((player, track), count.min(max));
            }
        }

        tracing::debug!(
            target: "progression::ledger",
            records = counts.len(),
            "prestige ledger loaded"
        );

        Ok(Self {
            config,
            counts: RwLock::new(counts),
            store,
        })
    }

    pub fn max_prestige(&self, track: TrackId) -> u32 {
        self.config.max_prestige_for(track)
    }

    /// Prestige count; 0 when no record exists.
    pub fn get(&self, player: PlayerId, track: TrackId) -> Result<u32> {
        let counts = self
            .counts
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(counts.get(&(player, track)).copied().unwrap_or(0))
    }

    pub fn record(&self, player: PlayerId, track: TrackId) -> Result<PrestigeRecord> {
        Ok(PrestigeRecord {
            track,
            prestige_count: self.get(player, track)?,
        })
    }

    /// Records of every track for one player, in track order.
    pub fn records(&self, player: PlayerId) -> Result<Vec<PrestigeRecord>> {
        let counts = self
            .counts
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(TrackId::all()
            .map(|track| PrestigeRecord {
                track,
                prestige_count: counts.get(&(player, track)).copied().unwrap_or(0),
            })
            .collect())
    }

    /// Create a zero record on every track the player has none for.
    ///
    /// Returns the number of records created. Every record is created in
    /// memory even when a write fails; the first write failure is returned.
    pub fn ensure_player(&self, player: PlayerId) -> Result<usize> {
        let mut counts = self
            .counts
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let mut created = 0;
        let mut write_failure = None;
        for track in TrackId::all() {
            if counts.contains_key(&(player, track)) {
                continue;
            }
            counts.insert((player, track), 0);
            created += 1;
            if let Err(err) = self.write_through(track, player, 0)
                && write_failure.is_none()
            {
                write_failure = Some(err);
            }
        }

        match write_failure {
            Some(err) => Err(err),
            None => Ok(created),
        }
    }

    /// Increment by one unless the count already sits at the track cap.
    pub fn increment_capped(&self, player: PlayerId, track: TrackId) -> Result<u32> {
        let max = self.max_prestige(track);

        let mut counts = self
            .counts
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let count = counts.entry((player, track)).or_insert(0);
        if *count >= max {
            return Err(EngineError::NotEligible {
                track,
                reason: Ineligibility::AtMaxPrestige { count: *count, max },
            });
        }

        *count += 1;
        let updated = *count;
        self.write_through(track, player, updated)?;
        Ok(updated)
    }

    /// Overwrite a count, clamped to the track cap. Returns the previous count.
    pub fn set(&self, player: PlayerId, track: TrackId, count: u32) -> Result<u32> {
        let count = count.min(self.max_prestige(track));

        let mut counts = self
            .counts
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let previous = counts.insert((player, track), count).unwrap_or(0);
        self.write_through(track, player, count)?;
        Ok(previous)
    }

    /// Every stored count of a track, ordered by player.
    pub fn snapshot(&self, track: TrackId) -> Result<Vec<(PlayerId, u32)>> {
        let counts = self
            .counts
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut snapshot: Vec<_> = counts
            .iter()
            .filter(|((_, entry_track), _)| *entry_track == track)
            .map(|((player, _), count)| (*player, *count))
            .collect();
        snapshot.sort_unstable_by_key(|(player, _)| *player);
        Ok(snapshot)
    }

    pub fn flush_track(&self, track: TrackId) -> Result<usize> {
        let snapshot = self.snapshot(track)?;
        self.store
            .save_prestiges(track, &snapshot)
            .map_err(|source| EngineError::PersistenceWriteFailure { track, source })?;
        Ok(snapshot.len())
    }

    /// Poison the lock by panicking while holding it.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.counts.write();
            panic!("poisoning prestige ledger");
        }));
    }

    fn write_through(&self, track: TrackId, player: PlayerId, count: u32) -> Result<()> {
        self.store
            .save_prestige(track, player, count)
            .map_err(|source| {
                tracing::warn!(
                    target: "progression::ledger",
                    %player,
                    %track,
                    count,
                    error = %source,
                    "failed to persist prestige"
                );
                EngineError::PersistenceWriteFailure { track, source }
            })
    }
}
