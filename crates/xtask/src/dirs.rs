//! Platform-specific directory utilities
//!
//! Provides consistent directory paths across different operating systems,
//! following platform conventions for data directories.

use std::path::PathBuf;

/// Environment variable overriding the ledger data directory.
pub const DATA_DIR_ENV: &str = "PROGRESSION_DATA_DIR";

/// Get the ledger data directory
///
/// Resolution order:
/// - `$PROGRESSION_DATA_DIR` (also read from `.env`)
/// - macOS: `~/Library/Application Support/progression`
/// - Linux: `~/.local/share/progression` (or `$XDG_DATA_HOME/progression`)
/// - Windows: `%APPDATA%\progression`
/// - Fallback: `./progression_data`
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("", "", "progression")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./progression_data"))
}

/// Use `explicit` when given, otherwise the platform data directory.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(data_dir)
}
