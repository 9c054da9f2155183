//! Common error infrastructure for progression-core.
//!
//! Domain errors (configuration, prestige eligibility, persistence) are defined
//! next to the code that raises them. This module provides the shared
//! classification used by the runtime when deciding whether to log, skip, or
//! surface a failure.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Nothing in the progression engine is fatal to the host process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Retrying the triggering event may succeed (I/O, lock contention).
    Recoverable,

    /// Invalid input; retrying without changes fails again.
    ///
    /// Examples: unknown track, prestige preconditions unmet
    Validation,

    /// Unexpected state inconsistency worth investigating.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Uniform classification across progression error types.
pub trait ProgressionError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier of the error variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Invalid configuration values.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("starting level {starting} exceeds max level {max}")]
    StartingLevelAboveCap { starting: u32, max: u32 },
}

impl ProgressionError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositive { .. } => "CONFIG_NON_POSITIVE",
            Self::Negative { .. } => "CONFIG_NEGATIVE",
            Self::StartingLevelAboveCap { .. } => "CONFIG_STARTING_LEVEL",
        }
    }
}
