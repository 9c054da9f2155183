//! Data-driven configuration for the progression engine.
//!
//! This crate houses the bundled default tuning file and the loader that turns
//! TOML into a validated [`progression_core::ProgressionConfig`]. Content is
//! consumed once at engine construction and never appears in ledger state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult};

/// The tuning file shipped with the crate (`data/progression.toml`).
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../data/progression.toml");
