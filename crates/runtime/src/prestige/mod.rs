//! Prestige handlers for all 23 tracks.
//!
//! [`PrestigeRegistry::resolve`] parses a track name into a
//! [`PrestigeHandler`]; the handler checks eligibility, resets the track's
//! level pair, bumps its prestige count and announces the result.
mod handler;
mod registry;

pub use handler::PrestigeHandler;
pub use registry::PrestigeRegistry;
