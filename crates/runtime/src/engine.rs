//! Engine facade and builder.
//!
//! The engine owns both ledgers for its whole lifetime: [`EngineBuilder::build`]
//! validates the configuration and loads the ledgers from the store, and
//! [`ProgressionEngine::shutdown`] flushes every track back to it. Hosts drive
//! it synchronously, one event at a time.

use std::sync::Arc;

use tokio::sync::broadcast;

use progression_core::{
    PlayerId, PlayerProgression, PrestigeRecord, ProgressionConfig, RateModifierCalculator,
    RateModifiers, TrackId,
};

use crate::api::{
    EngineError, KillEvent, PrestigeCommand, QuestRewardExperienceEvent, Result,
};
use crate::events::{Event, EventBus, Topic};
use crate::oracle::PlayerDirectory;
use crate::prestige::PrestigeRegistry;
use crate::processor::{CreditOutcome, KillEventProcessor, KillReport};
use crate::repository::{ExperienceLedger, InMemoryStore, PrestigeLedger, ProgressionStore};

/// Progression engine: the single entry point for host adapters.
pub struct ProgressionEngine {
    config: Arc<ProgressionConfig>,
    experience: Arc<ExperienceLedger>,
    prestige: Arc<PrestigeLedger>,
    events: EventBus,
    processor: KillEventProcessor,
    registry: PrestigeRegistry,
    rates: RateModifierCalculator,
}

impl ProgressionEngine {
    /// Create a new engine builder
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// Create missing prestige records and the master-level pair for a player.
    ///
    /// A persistence failure on the prestige records does not stop the level
    /// pair from being created; the first failure is returned afterwards.
    pub fn on_player_connected(&self, player: PlayerId) -> Result<()> {
        let prestige = self.prestige.ensure_player(player);
        let starting_level = self.config.leveling.starting_level;
        let fresh = self
            .experience
            .ensure(player, TrackId::Experience, starting_level);

        let created = prestige?;
        let fresh = fresh?;
        if fresh || created > 0 {
            tracing::info!(
                target: "progression::ledger",
                %player,
                prestige_records = created,
                starting_level,
                "player initialised"
            );
        }
        Ok(())
    }

    pub fn handle_kill(&self, event: &KillEvent) -> KillReport {
        self.processor.process_kill(event)
    }

    pub fn handle_quest_reward(&self, event: &QuestRewardExperienceEvent) -> CreditOutcome {
        self.processor.process_quest_experience_gain(event)
    }

    /// Prestige the named track. Returns the new prestige count.
    pub fn handle_prestige(&self, command: &PrestigeCommand) -> Result<u32> {
        self.registry.prestige(command)
    }

    /// Admin reset of one prestige count. Returns the previous count.
    pub fn reset_prestige(&self, player: PlayerId, track: TrackId) -> Result<u32> {
        self.registry.reset_prestige(player, track)
    }

    pub fn prestige_registry(&self) -> &PrestigeRegistry {
        &self.registry
    }

    /// Rate and stat modifiers a player currently has on a track.
    pub fn rate_modifiers(&self, player: PlayerId, track: TrackId) -> Result<RateModifiers> {
        let experience_prestige = self.prestige.get(player, TrackId::Experience)?;
        let track_prestige = self.prestige.get(player, track)?;
        Ok(self
            .rates
            .modifiers(track, experience_prestige, track_prestige))
    }

    pub fn progression(&self, player: PlayerId, track: TrackId) -> Result<PlayerProgression> {
        self.experience.get(player, track)
    }

    pub fn prestige_count(&self, player: PlayerId, track: TrackId) -> Result<u32> {
        self.prestige.get(player, track)
    }

    pub fn prestige_records(&self, player: PlayerId) -> Result<Vec<PrestigeRecord>> {
        self.prestige.records(player)
    }

    pub fn experience_ledger(&self) -> &ExperienceLedger {
        &self.experience
    }

    pub fn prestige_ledger(&self) -> &PrestigeLedger {
        &self.prestige
    }

    /// Subscribe to one notification topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.events.subscribe(topic)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Flush every track of both ledgers to the store.
    pub fn save(&self) -> Result<()> {
        self.registry.save_all()
    }

    /// Flush everything and drop the engine.
    pub fn shutdown(self) -> Result<()> {
        self.save()?;
        tracing::info!(target: "progression::ledger", "engine shut down");
        Ok(())
    }
}

/// Builder for [`ProgressionEngine`].
pub struct EngineBuilder {
    config: ProgressionConfig,
    store: Option<Arc<dyn ProgressionStore>>,
    directory: Option<Arc<dyn PlayerDirectory>>,
    event_capacity: usize,
}

impl EngineBuilder {
    fn new() -> Self {
        Self {
            config: ProgressionConfig::default(),
            store: None,
            directory: None,
            event_capacity: EventBus::DEFAULT_CAPACITY,
        }
    }

    /// Override progression tuning
    pub fn config(mut self, config: ProgressionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the persistence store (default: [`InMemoryStore`])
    pub fn store(mut self, store: impl ProgressionStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set a store that the caller keeps a handle to
    pub fn shared_store(mut self, store: Arc<dyn ProgressionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set required player directory
    pub fn directory(mut self, directory: impl PlayerDirectory + 'static) -> Self {
        self.directory = Some(Arc::new(directory));
        self
    }

    /// Set a directory that the caller keeps a handle to
    pub fn shared_directory(mut self, directory: Arc<dyn PlayerDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Per-topic event buffer size
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Validate the configuration and load both ledgers from the store.
    pub fn build(self) -> Result<ProgressionEngine> {
        self.config.validate()?;
        let directory = self.directory.ok_or(EngineError::MissingDirectory)?;
        let store: Arc<dyn ProgressionStore> = match self.store {
            Some(store) => store,
            None => Arc::new(InMemoryStore::new()),
        };

        let config = Arc::new(self.config);
        let experience = Arc::new(ExperienceLedger::load(config.clone(), store.clone())?);
        let prestige = Arc::new(PrestigeLedger::load(config.clone(), store)?);
        let events = EventBus::with_capacity(self.event_capacity);

        let processor = KillEventProcessor::new(
            config.clone(),
            experience.clone(),
            prestige.clone(),
            directory,
            events.clone(),
        );
        let registry = PrestigeRegistry::new(
            config.clone(),
            experience.clone(),
            prestige.clone(),
            events.clone(),
        );
        let rates = RateModifierCalculator::new(config.prestige);

        tracing::debug!(target: "progression::ledger", "engine built");

        Ok(ProgressionEngine {
            config,
            experience,
            prestige,
            events,
            processor,
            registry,
            rates,
        })
    }
}
