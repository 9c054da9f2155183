//! Oracles over host-owned player facts.
//!
//! The engine never owns connectivity, positions, names or gear; it reads them
//! through [`PlayerDirectory`] per event. [`InMemoryDirectory`] and
//! [`PartyRegistry`] cover hosts without a player service of their own.
mod directory;
mod party;

pub use directory::{InMemoryDirectory, PlayerDirectory, PlayerEntry};
pub use party::{DEFAULT_MAX_PARTY_SIZE, PartyError, PartyRegistry};
