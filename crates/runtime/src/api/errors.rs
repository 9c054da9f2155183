//! Unified error types surfaced by the engine API.
//!
//! Wraps failures from ledgers, persistence, and prestige validation so hosts
//! can bubble them up with consistent context. Prestige rejections carry the
//! failed precondition so the command collaborator can show it verbatim.

use progression_core::{
    ConfigError, ErrorSeverity, PlayerId, ProgressionError, TrackId, UnknownTrack,
};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    InvalidTrack(#[from] UnknownTrack),

    #[error("cannot prestige {track}: {reason}")]
    NotEligible {
        track: TrackId,
        reason: Ineligibility,
    },

    #[error("progression state of player {0} could not be read")]
    ParticipantUnresolvable(PlayerId),

    #[error("failed to persist {track} progression")]
    PersistenceWriteFailure {
        track: TrackId,
        #[source]
        source: RepositoryError,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("invalid engine configuration")]
    InvalidConfig(#[from] ConfigError),

    #[error("engine requires a player directory before building")]
    MissingDirectory,
}

impl EngineError {
    /// Human-readable reason for a rejected prestige, if this is one.
    pub fn ineligibility(&self) -> Option<Ineligibility> {
        match self {
            Self::NotEligible { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

impl ProgressionError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidTrack(_)
            | Self::NotEligible { .. }
            | Self::InvalidConfig(_)
            | Self::MissingDirectory => ErrorSeverity::Validation,
            Self::PersistenceWriteFailure { .. } => ErrorSeverity::Recoverable,
            Self::ParticipantUnresolvable(_) | Self::Repository(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTrack(_) => "INVALID_TRACK",
            Self::NotEligible { .. } => "NOT_ELIGIBLE",
            Self::ParticipantUnresolvable(_) => "PARTICIPANT_UNRESOLVABLE",
            Self::PersistenceWriteFailure { .. } => "PERSISTENCE_WRITE_FAILURE",
            Self::Repository(_) => "REPOSITORY",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::MissingDirectory => "MISSING_DIRECTORY",
        }
    }
}

/// Prestige precondition that was not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Ineligibility {
    #[error("level {level} has not reached the required level {required}")]
    LevelTooLow { level: u32, required: u32 },

    #[error("prestige {count} is already at the maximum of {max}")]
    AtMaxPrestige { count: u32, max: u32 },

    #[error("experience prestige {count} must reach {required} first")]
    ExperiencePrestigeRequired { count: u32, required: u32 },
}
