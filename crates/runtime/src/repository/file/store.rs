//! File-based ProgressionStore implementation.

use std::fs;
use std::path::{Path, PathBuf};

use progression_core::{PlayerId, PlayerProgression, TrackId};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::{ProgressionStore, RepositoryError, Result};

/// File-based implementation of ProgressionStore.
///
/// Stores one bincode file per player per track:
///
/// ```text
/// {base_dir}/levels/{track}/{player_id}.bin     PlayerProgression
/// {base_dir}/prestige/{track}/{player_id}.bin   u32
/// ```
///
/// Every write goes to a temp file first and is renamed into place.
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a new file-based store rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding a track's level files.
    pub fn levels_dir(&self, track: TrackId) -> PathBuf {
        self.base_dir.join("levels").join(track.to_string())
    }

    /// Directory holding a track's prestige files.
    pub fn prestige_dir(&self, track: TrackId) -> PathBuf {
        self.base_dir.join("prestige").join(track.to_string())
    }

    fn write_entry<T: Serialize>(dir: &Path, player: PlayerId, value: &T) -> Result<()> {
        fs::create_dir_all(dir)?;

        let path = dir.join(format!("{}.bin", player.0));
        let temp_path = path.with_extension("bin.tmp");

        let bytes =
            bincode::serialize(value).map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::trace!(target: "progression::store", path = %path.display(), "entry written");

        Ok(())
    }

    fn read_entries<T: DeserializeOwned>(dir: &Path) -> Result<Vec<(PlayerId, T)>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            let Some(player) = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|name| name.strip_suffix(".bin"))
                .and_then(|id| id.parse::<u64>().ok())
            else {
                continue;
            };

            let bytes = fs::read(&path)?;
            let value: T = bincode::deserialize(&bytes).map_err(|e| {
                RepositoryError::CorruptedData(format!("{}: {}", path.display(), e))
            })?;
            entries.push((PlayerId(player), value));
        }

        entries.sort_unstable_by_key(|(player, _)| *player);
        tracing::debug!(
            target: "progression::store",
            dir = %dir.display(),
            entries = entries.len(),
            "entries loaded"
        );

        Ok(entries)
    }
}

impl ProgressionStore for FileStore {
    fn load_levels(&self, track: TrackId) -> Result<Vec<(PlayerId, PlayerProgression)>> {
        Self::read_entries(&self.levels_dir(track))
    }

    fn save_level(
        &self,
        track: TrackId,
        player: PlayerId,
        progression: &PlayerProgression,
    ) -> Result<()> {
        Self::write_entry(&self.levels_dir(track), player, progression)
    }

    fn load_prestiges(&self, track: TrackId) -> Result<Vec<(PlayerId, u32)>> {
        Self::read_entries(&self.prestige_dir(track))
    }

    fn save_prestige(&self, track: TrackId, player: PlayerId, count: u32) -> Result<()> {
        Self::write_entry(&self.prestige_dir(track), player, &count)
    }
}
