//! Repository layer for dynamic progression data.
//!
//! Ledgers hold the authoritative in-memory state and write every mutation
//! through to a [`ProgressionStore`]:
//! - [`ExperienceLedger`] keeps `(level, xp)` pairs per player and track
//! - [`PrestigeLedger`] keeps prestige counts per player and track
//!
//! Static tuning lives in `ProgressionConfig`; player facts owned by the host
//! are read through oracles, not repositories.

mod error;
mod file;
mod ledger;
mod memory;
mod prestige;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileStore;
pub use ledger::{ExperienceLedger, LevelChange};
pub use memory::InMemoryStore;
pub use prestige::PrestigeLedger;
pub use traits::ProgressionStore;
