//! Inbound requests raised by host adapters.

use progression_core::{PlayerId, VictimDescriptor};
use serde::{Deserialize, Serialize};

/// A player killed (or fed on) a victim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillEvent {
    pub killer: PlayerId,
    pub victim: VictimDescriptor,
    /// The victim was consumed rather than just killed; feeds legacy tracks.
    #[serde(default)]
    pub consumed: bool,
}

impl KillEvent {
    pub fn new(killer: PlayerId, victim: VictimDescriptor) -> Self {
        Self {
            killer,
            victim,
            consumed: false,
        }
    }

    pub fn consumed(mut self) -> Self {
        self.consumed = true;
        self
    }
}

/// Experience reward for a completed quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRewardExperienceEvent {
    pub player: PlayerId,
    pub multiplier: i32,
}

/// Prestige request as typed by a player; `track` is parsed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrestigeCommand {
    pub player: PlayerId,
    pub track: String,
}

impl PrestigeCommand {
    pub fn new(player: PlayerId, track: impl Into<String>) -> Self {
        Self {
            player,
            track: track.into(),
        }
    }
}
