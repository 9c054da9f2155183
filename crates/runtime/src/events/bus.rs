//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{ExperienceGainNotice, LevelUpNotification, PrestigeAppliedNotification};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Level-ups and experience notices
    Progression,
    /// Applied prestiges
    Prestige,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Progression, Topic::Prestige];
}

/// Event wrapper that carries the typed notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    LevelUp(LevelUpNotification),
    ExperienceGained(ExperienceGainNotice),
    PrestigeApplied(PrestigeAppliedNotification),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::LevelUp(_) | Event::ExperienceGained(_) => Topic::Progression,
            Event::PrestigeApplied(_) => Topic::Prestige,
        }
    }
}

/// Topic-based event bus
///
/// Channels are created up front for every topic, so publishing never blocks
/// and never allocates a channel. Delivery is best-effort: events published
/// with no subscriber are dropped, and slow subscribers observe `Lagged`.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // unreachable: every topic gets a channel in `with_capacity`
            None => broadcast::channel(1).1,
        }
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use progression_core::{PlayerId, TrackId};

    fn level_up() -> Event {
        Event::LevelUp(LevelUpNotification {
            player: PlayerId(1),
            track: TrackId::Experience,
            previous_level: 0,
            new_level: 1,
        })
    }

    #[test]
    fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut progression = bus.subscribe(Topic::Progression);
        let mut prestige = bus.subscribe(Topic::Prestige);

        bus.publish(level_up());

        assert_eq!(progression.try_recv().unwrap(), level_up());
        assert!(prestige.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(level_up());

        let mut receivers = bus.subscribe_multiple(&Topic::ALL);
        assert_eq!(receivers.len(), 2);
        assert!(receivers
            .get_mut(&Topic::Progression)
            .unwrap()
            .try_recv()
            .is_err());
    }
}
