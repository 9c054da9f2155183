//! Public engine API surface.
//!
//! Inbound commands and the error types returned to hosts.

pub mod commands;
pub mod errors;

pub use commands::{KillEvent, PrestigeCommand, QuestRewardExperienceEvent};
pub use errors::{EngineError, Ineligibility, Result};
