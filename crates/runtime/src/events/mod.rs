//! Topic-based event bus for progression notifications.
//!
//! Level-ups and experience notices go to [`Topic::Progression`]; applied
//! prestiges go to [`Topic::Prestige`]. Consumers subscribe only to the topics
//! they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{ExperienceGainNotice, LevelUpNotification, PrestigeAppliedNotification};
