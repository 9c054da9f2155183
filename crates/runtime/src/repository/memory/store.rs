//! In-memory ProgressionStore implementation for tests and local runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use progression_core::{PlayerId, PlayerProgression, TrackId};

use crate::repository::{ProgressionStore, RepositoryError, Result};

/// In-memory implementation of ProgressionStore.
///
/// Keeps one map per track; contents vanish with the process.
pub struct InMemoryStore {
    levels: RwLock<HashMap<TrackId, BTreeMap<PlayerId, PlayerProgression>>>,
    prestiges: RwLock<HashMap<TrackId, BTreeMap<PlayerId, u32>>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            levels: RwLock::new(HashMap::new()),
            prestiges: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored level entries across all tracks.
    pub fn level_entries(&self) -> usize {
        self.levels
            .read()
            .map(|levels| levels.values().map(BTreeMap::len).sum())
            .unwrap_or(0)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionStore for InMemoryStore {
    fn load_levels(&self, track: TrackId) -> Result<Vec<(PlayerId, PlayerProgression)>> {
        let levels = self
            .levels
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(levels
            .get(&track)
            .map(|entries| entries.iter().map(|(p, v)| (*p, *v)).collect())
            .unwrap_or_default())
    }

    fn save_level(
        &self,
        track: TrackId,
        player: PlayerId,
        progression: &PlayerProgression,
    ) -> Result<()> {
        let mut levels = self
            .levels
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        levels.entry(track).or_default().insert(player, *progression);
        Ok(())
    }

    fn load_prestiges(&self, track: TrackId) -> Result<Vec<(PlayerId, u32)>> {
        let prestiges = self
            .prestiges
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(prestiges
            .get(&track)
            .map(|entries| entries.iter().map(|(p, c)| (*p, *c)).collect())
            .unwrap_or_default())
    }

    fn save_prestige(&self, track: TrackId, player: PlayerId, count: u32) -> Result<()> {
        let mut prestiges = self
            .prestiges
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        prestiges.entry(track).or_default().insert(player, count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use progression_core::LegacyKind;

    #[test]
    fn tracks_are_isolated() {
        let store = InMemoryStore::new();
        let player = PlayerId(7);
        store
            .save_level(TrackId::Experience, player, &PlayerProgression::new(3, 900.0))
            .unwrap();

        assert_eq!(store.load_levels(TrackId::Experience).unwrap().len(), 1);
        assert!(
            store
                .load_levels(TrackId::Legacy(LegacyKind::Rogue))
                .unwrap()
                .is_empty()
        );
        assert_eq!(store.level_entries(), 1);
    }

    #[test]
    fn prestige_overwrites() {
        let store = InMemoryStore::new();
        let player = PlayerId(7);
        store.save_prestige(TrackId::Exo, player, 1).unwrap();
        store.save_prestige(TrackId::Exo, player, 2).unwrap();
        assert_eq!(store.load_prestiges(TrackId::Exo).unwrap(), vec![(player, 2)]);
    }
}
