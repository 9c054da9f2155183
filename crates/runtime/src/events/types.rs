//! Notification payloads published by the engine.

use progression_core::{PlayerId, TrackId};
use serde::{Deserialize, Serialize};

/// A player's level on a track went up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelUpNotification {
    pub player: PlayerId,
    pub track: TrackId,
    pub previous_level: u32,
    pub new_level: u32,
}

/// Experience credited to a player; only published when the player opted in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceGainNotice {
    pub player: PlayerId,
    pub track: TrackId,
    pub amount: f64,
    pub level: u32,
    /// Progress towards the next level, `0..=100`.
    pub progress_percent: f64,
}

/// A prestige succeeded; the buff collaborator applies `stat_bonus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrestigeAppliedNotification {
    pub player: PlayerId,
    pub track: TrackId,
    pub new_prestige_level: u32,
    pub stat_bonus: f64,
}
