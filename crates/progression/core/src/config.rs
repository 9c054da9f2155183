//! Tunable parameters for leveling, grouping, and prestige.
//!
//! Every section carries its own defaults so a partial TOML file only needs to
//! list the values it overrides.

use crate::error::ConfigError;
use crate::track::{TrackId, TrackKind};

/// Complete engine configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressionConfig {
    pub curve: CurveConfig,
    pub leveling: LevelingConfig,
    pub group: GroupConfig,
    pub environment: EnvironmentConfig,
    pub prestige: PrestigeConfig,
    pub expertise: TrackLevelingConfig,
    pub legacy: TrackLevelingConfig,
}

/// Shape of the experience curve shared by every levelled track.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CurveConfig {
    /// `C` in `level = floor(C * sqrt(xp))`.
    pub scale: f64,
    /// `E` in `xp = (level / C)^E`.
    pub power: f64,
}

impl CurveConfig {
    pub const DEFAULT_SCALE: f64 = 0.1;
    pub const DEFAULT_POWER: f64 = 2.0;
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
            power: Self::DEFAULT_POWER,
        }
    }
}

/// Player (master track) leveling rules.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelingConfig {
    pub max_level: u32,
    /// Level granted on first connection.
    pub starting_level: u32,
    pub unit_multiplier: f64,
    pub boss_multiplier: f64,
    /// Applied to every participant when more than one player shares a kill.
    pub group_multiplier: f64,
    /// Decay constant `k` of the overlevel taper. `0.0` disables tapering.
    pub overlevel_taper: f64,
    /// Victim max health is divided by this to produce bonus experience.
    pub health_divisor: f64,
    /// Fraction of the current level threshold granted per quest multiplier.
    pub quest_reward_fraction: f64,
}

impl LevelingConfig {
    pub const DEFAULT_MAX_LEVEL: u32 = 90;
}

impl Default for LevelingConfig {
    fn default() -> Self {
        Self {
            max_level: Self::DEFAULT_MAX_LEVEL,
            starting_level: 0,
            unit_multiplier: 7.5,
            boss_multiplier: 15.0,
            group_multiplier: 1.0,
            overlevel_taper: 0.025,
            health_divisor: 2.5,
            quest_reward_fraction: 0.025,
        }
    }
}

/// Shared-credit rules.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GroupConfig {
    pub parties_enabled: bool,
    /// Maximum distance from the killer for a member to share credit.
    pub share_distance: f32,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            parties_enabled: false,
            share_distance: 25.0,
        }
    }
}

/// Victim-origin penalties. Each applies only while its toggle is set.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnvironmentConfig {
    pub unit_spawner_enabled: bool,
    pub unit_spawner_multiplier: f64,
    pub war_event_enabled: bool,
    pub war_event_multiplier: f64,
    pub docile_enabled: bool,
}

impl EnvironmentConfig {
    /// Docile victims always grant this fraction when the penalty is on.
    pub const DOCILE_MULTIPLIER: f64 = 0.2;

    /// All penalties switched off.
    pub fn disabled() -> Self {
        Self {
            unit_spawner_enabled: false,
            war_event_enabled: false,
            docile_enabled: false,
            ..Self::default()
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            unit_spawner_enabled: true,
            unit_spawner_multiplier: 0.0,
            war_event_enabled: true,
            war_event_multiplier: 0.2,
            docile_enabled: true,
        }
    }
}

/// Prestige caps and the constants feeding the rate modifiers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrestigeConfig {
    /// Fraction removed from master-track gains per Experience prestige.
    pub leveling_reducer: f64,
    /// Fraction removed from a track's own rate per prestige on that track.
    pub rates_reducer: f64,
    /// Fraction added to every other track's rate per Experience prestige.
    pub rate_multiplier: f64,
    /// Stat bonus fraction per prestige on a track.
    pub stat_multiplier: f64,
    pub max_leveling: u32,
    pub max_exo: u32,
    pub max_expertise: u32,
    pub max_legacy: u32,
}

impl Default for PrestigeConfig {
    fn default() -> Self {
        Self {
            leveling_reducer: 0.05,
            rates_reducer: 0.10,
            rate_multiplier: 0.10,
            stat_multiplier: 0.10,
            max_leveling: 10,
            max_exo: 100,
            max_expertise: 10,
            max_legacy: 10,
        }
    }
}

/// Leveling rules for the weapon-expertise and blood-legacy families.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackLevelingConfig {
    pub enabled: bool,
    pub max_level: u32,
    pub unit_multiplier: f64,
    pub boss_multiplier: f64,
}

impl Default for TrackLevelingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_level: 100,
            unit_multiplier: 2.0,
            boss_multiplier: 5.0,
        }
    }
}

impl ProgressionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level cap of the `(level, xp)` pair a track reads and resets.
    pub fn max_level_for(&self, track: TrackId) -> u32 {
        match track.kind() {
            TrackKind::Experience | TrackKind::Exo => self.leveling.max_level,
            TrackKind::Expertise => self.expertise.max_level,
            TrackKind::Legacy => self.legacy.max_level,
        }
    }

    pub fn max_prestige_for(&self, track: TrackId) -> u32 {
        match track.kind() {
            TrackKind::Experience => self.prestige.max_leveling,
            TrackKind::Exo => self.prestige.max_exo,
            TrackKind::Expertise => self.prestige.max_expertise,
            TrackKind::Legacy => self.prestige.max_legacy,
        }
    }

    /// Rejects values that would make the curve or the gain math undefined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.curve.scale > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "curve.scale",
                value: self.curve.scale,
            });
        }
        if !(self.curve.power > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "curve.power",
                value: self.curve.power,
            });
        }
        if !(self.leveling.health_divisor > 0.0) {
            return Err(ConfigError::NonPositive {
                field: "leveling.health_divisor",
                value: self.leveling.health_divisor,
            });
        }

        let non_negative = [
            ("leveling.unit_multiplier", self.leveling.unit_multiplier),
            ("leveling.boss_multiplier", self.leveling.boss_multiplier),
            ("leveling.group_multiplier", self.leveling.group_multiplier),
            ("leveling.overlevel_taper", self.leveling.overlevel_taper),
            ("leveling.quest_reward_fraction", self.leveling.quest_reward_fraction),
            ("environment.unit_spawner_multiplier", self.environment.unit_spawner_multiplier),
            ("environment.war_event_multiplier", self.environment.war_event_multiplier),
            ("prestige.leveling_reducer", self.prestige.leveling_reducer),
            ("prestige.rates_reducer", self.prestige.rates_reducer),
            ("prestige.rate_multiplier", self.prestige.rate_multiplier),
            ("prestige.stat_multiplier", self.prestige.stat_multiplier),
            ("expertise.unit_multiplier", self.expertise.unit_multiplier),
            ("expertise.boss_multiplier", self.expertise.boss_multiplier),
            ("legacy.unit_multiplier", self.legacy.unit_multiplier),
            ("legacy.boss_multiplier", self.legacy.boss_multiplier),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if !(self.group.share_distance >= 0.0) {
            return Err(ConfigError::Negative {
                field: "group.share_distance",
                value: f64::from(self.group.share_distance),
            });
        }

        if self.leveling.starting_level > self.leveling.max_level {
            return Err(ConfigError::StartingLevelAboveCap {
                starting: self.leveling.starting_level,
                max: self.leveling.max_level,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{LegacyKind, WeaponKind};

    #[test]
    fn defaults_validate() {
        assert!(ProgressionConfig::default().validate().is_ok());
    }

    #[test]
    fn caps_follow_track_family() {
        let config = ProgressionConfig::default();
        assert_eq!(config.max_level_for(TrackId::Experience), 90);
        assert_eq!(config.max_level_for(TrackId::Exo), 90);
        assert_eq!(config.max_level_for(TrackId::Expertise(WeaponKind::Sword)), 100);
        assert_eq!(config.max_level_for(TrackId::Legacy(LegacyKind::Brute)), 100);

        assert_eq!(config.max_prestige_for(TrackId::Experience), 10);
        assert_eq!(config.max_prestige_for(TrackId::Exo), 100);
    }

    #[test]
    fn rejects_zero_scale() {
        let mut config = ProgressionConfig::default();
        config.curve.scale = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "curve.scale",
                value: 0.0
            })
        );
    }

    #[test]
    fn rejects_negative_multiplier() {
        let mut config = ProgressionConfig::default();
        config.leveling.group_multiplier = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "leveling.group_multiplier",
                ..
            })
        ));
    }

    #[test]
    fn rejects_starting_level_above_cap() {
        let mut config = ProgressionConfig::default();
        config.leveling.starting_level = 91;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartingLevelAboveCap { starting: 91, max: 90 })
        ));
    }
}
