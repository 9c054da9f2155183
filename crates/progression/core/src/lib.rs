//! Deterministic progression rules shared across the runtime and tooling.
//!
//! `progression-core` defines the canonical leveling math (curve, kill and
//! quest gains, prestige rate modifiers), the 23 progression tracks, and the
//! persistent state types. Everything here is pure; ledgers, persistence and
//! event routing live in `progression-runtime`.
pub mod config;
pub mod curve;
pub mod error;
pub mod gain;
pub mod rates;
pub mod state;
pub mod track;
pub mod victim;

pub use config::{
    CurveConfig, EnvironmentConfig, GroupConfig, LevelingConfig, PrestigeConfig,
    ProgressionConfig, TrackLevelingConfig,
};
pub use curve::LevelCurve;
pub use error::{ConfigError, ErrorSeverity, ProgressionError};
pub use gain::{KillGain, ParticipantStanding};
pub use rates::{RateModifierCalculator, RateModifiers};
pub use state::{PlayerId, PlayerProgression, Position, PrestigeRecord};
pub use track::{LegacyKind, TrackId, TrackKind, UnknownTrack, WeaponKind};
pub use victim::{VictimDescriptor, VictimFlags};
