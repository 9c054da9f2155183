//! Runtime for the progression and prestige engine.
//!
//! This crate wires the pure rules of `progression-core` to mutable ledgers,
//! persistence, host-owned player facts and outbound notifications. Hosts
//! build a [`ProgressionEngine`] once and feed it kill, quest and prestige
//! events; level-ups and prestiges come back over the [`EventBus`].
//!
//! Modules are organized by responsibility:
//! - [`engine`] hosts the facade and builder
//! - [`api`] exposes inbound commands and error types
//! - [`processor`] credits kills, consumptions and quest rewards
//! - [`prestige`] resolves track handlers and applies prestiges
//! - [`group`] decides who shares a kill
//! - [`events`] provides the topic-based notification bus
//! - [`oracle`] and [`repository`] provide data adapters
pub mod api;
pub mod engine;
pub mod events;
pub mod group;
pub mod oracle;
pub mod prestige;
pub mod processor;
pub mod repository;

pub use api::{
    EngineError, Ineligibility, KillEvent, PrestigeCommand, QuestRewardExperienceEvent, Result,
};
pub use engine::{EngineBuilder, ProgressionEngine};
pub use events::{
    Event, EventBus, ExperienceGainNotice, LevelUpNotification, PrestigeAppliedNotification, Topic,
};
pub use group::GroupResolver;
pub use oracle::{InMemoryDirectory, PartyError, PartyRegistry, PlayerDirectory, PlayerEntry};
pub use prestige::{PrestigeHandler, PrestigeRegistry};
pub use processor::{Credit, CreditOutcome, IgnoreReason, KillEventProcessor, KillReport};
pub use repository::{
    ExperienceLedger, FileStore, InMemoryStore, LevelChange, PrestigeLedger, ProgressionStore,
    RepositoryError,
};
