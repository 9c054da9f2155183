//! Progression tracks.
//!
//! A player advances along 23 independent tracks: the master leveling track,
//! the Exo meta-track, 13 weapon-expertise tracks, and 8 blood-legacy tracks.
//! Each track carries its own prestige counter.

use core::fmt;
use core::str::FromStr;

use strum::IntoEnumIterator;

/// Weapon families that accumulate expertise.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WeaponKind {
    Sword,
    Axe,
    Mace,
    Spear,
    Crossbow,
    GreatSword,
    Slashers,
    Pistols,
    Reaper,
    Longbow,
    Whip,
    Unarmed,
    FishingPole,
}

/// Blood types that accumulate legacy.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LegacyKind {
    Worker,
    Warrior,
    Scholar,
    Rogue,
    Mutant,
    Draculin,
    Creature,
    Brute,
}

/// Family a track belongs to; selects caps and rate rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TrackKind {
    Experience,
    Exo,
    Expertise,
    Legacy,
}

/// Identifier of a single progression track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackId {
    /// Master player level.
    Experience,
    /// Meta-track unlocked once Experience prestige is maxed.
    Exo,
    Expertise(WeaponKind),
    Legacy(LegacyKind),
}

impl TrackId {
    /// Number of distinct tracks.
    pub const COUNT: usize = 2 + <WeaponKind as strum::EnumCount>::COUNT
        + <LegacyKind as strum::EnumCount>::COUNT;

    pub const fn kind(self) -> TrackKind {
        match self {
            Self::Experience => TrackKind::Experience,
            Self::Exo => TrackKind::Exo,
            Self::Expertise(_) => TrackKind::Expertise,
            Self::Legacy(_) => TrackKind::Legacy,
        }
    }

    /// Track whose `(level, xp)` pair this track reads and resets.
    ///
    /// Exo has no pair of its own and shares the master level.
    pub const fn level_track(self) -> TrackId {
        match self {
            Self::Exo => Self::Experience,
            other => other,
        }
    }

    /// Whether this track owns a `(level, xp)` pair.
    pub const fn is_levelled(self) -> bool {
        !matches!(self, Self::Exo)
    }

    /// All 23 tracks in a stable order.
    pub fn all() -> impl Iterator<Item = TrackId> {
        [Self::Experience, Self::Exo]
            .into_iter()
            .chain(WeaponKind::iter().map(Self::Expertise))
            .chain(LegacyKind::iter().map(Self::Legacy))
    }

    /// Tracks that own a `(level, xp)` pair.
    pub fn levelled() -> impl Iterator<Item = TrackId> {
        Self::all().filter(|track| track.is_levelled())
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Experience => f.write_str("experience"),
            Self::Exo => f.write_str("exo"),
            Self::Expertise(weapon) => f.write_str(weapon.as_ref()),
            Self::Legacy(legacy) => f.write_str(legacy.as_ref()),
        }
    }
}

/// Returned when a string names no known track.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown track '{0}'")]
pub struct UnknownTrack(pub String);

impl FromStr for TrackId {
    type Err = UnknownTrack;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("experience") || trimmed.eq_ignore_ascii_case("level") {
            return Ok(Self::Experience);
        }
        if trimmed.eq_ignore_ascii_case("exo") {
            return Ok(Self::Exo);
        }
        if let Ok(weapon) = WeaponKind::from_str(trimmed) {
            return Ok(Self::Expertise(weapon));
        }
        if let Ok(legacy) = LegacyKind::from_str(trimmed) {
            return Ok(Self::Legacy(legacy));
        }
        Err(UnknownTrack(s.to_string()))
    }
}
