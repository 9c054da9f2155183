//! Persistent progression state shared by the runtime and tooling.

use core::fmt;

use crate::track::TrackId;

/// Stable platform identifier of a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PlayerId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// World position used for shared-credit proximity checks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// `(level, experience)` pair of one player on one levelled track.
///
/// `level` is always derived from `experience`; the two are written together.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerProgression {
    pub level: u32,
    pub experience: f64,
}

impl PlayerProgression {
    pub const ZERO: Self = Self {
        level: 0,
        experience: 0.0,
    };

    pub const fn new(level: u32, experience: f64) -> Self {
        Self { level, experience }
    }
}

/// Prestige counter of one player on one track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrestigeRecord {
    pub track: TrackId,
    pub prestige_count: u32,
}

impl PrestigeRecord {
    pub const fn new(track: TrackId) -> Self {
        Self {
            track,
            prestige_count: 0,
        }
    }
}
