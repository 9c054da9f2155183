//! Player directory oracle.

use std::collections::HashMap;
use std::sync::RwLock;

use progression_core::{LegacyKind, PlayerId, Position, WeaponKind};

use super::party::PartyRegistry;

/// Read-only view of host-owned player facts.
///
/// The engine queries this per event and never caches the answers.
pub trait PlayerDirectory: Send + Sync {
    fn is_connected(&self, player: PlayerId) -> bool;

    fn position(&self, player: PlayerId) -> Option<Position>;

    fn display_name(&self, player: PlayerId) -> Option<String>;

    /// Resolve a display name (case-insensitive) to a player.
    fn find_by_name(&self, name: &str) -> Option<PlayerId>;

    /// Display names of everyone in the player's party, the player included.
    /// Empty when the player is in no party.
    fn party_members(&self, player: PlayerId) -> Vec<String>;

    /// Other members of the player's clan.
    fn clan_members(&self, player: PlayerId) -> Vec<PlayerId>;

    /// Whether the player wants per-kill experience notices.
    fn experience_log_enabled(&self, player: PlayerId) -> bool;

    fn equipped_weapon(&self, player: PlayerId) -> Option<WeaponKind>;

    fn blood_legacy(&self, player: PlayerId) -> Option<LegacyKind>;
}

/// Directory entry held by [`InMemoryDirectory`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerEntry {
    pub name: String,
    pub connected: bool,
    pub position: Option<Position>,
    pub clan: Option<String>,
    pub experience_log: bool,
    pub weapon: Option<WeaponKind>,
    pub legacy: Option<LegacyKind>,
}

impl PlayerEntry {
    /// Connected player at `position`, no clan, no gear.
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            connected: true,
            position: Some(position),
            clan: None,
            experience_log: false,
            weapon: None,
            legacy: None,
        }
    }

    pub fn with_clan(mut self, clan: impl Into<String>) -> Self {
        self.clan = Some(clan.into());
        self
    }

    pub fn with_weapon(mut self, weapon: WeaponKind) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn with_legacy(mut self, legacy: LegacyKind) -> Self {
        self.legacy = Some(legacy);
        self
    }

    pub fn with_experience_log(mut self, enabled: bool) -> Self {
        self.experience_log = enabled;
        self
    }
}

/// Mutable directory for hosts without their own player service, and tests.
pub struct InMemoryDirectory {
    players: RwLock<HashMap<PlayerId, PlayerEntry>>,
    parties: PartyRegistry,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::with_parties(PartyRegistry::new())
    }

    pub fn with_parties(parties: PartyRegistry) -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
            parties,
        }
    }

    pub fn parties(&self) -> &PartyRegistry {
        &self.parties
    }

    /// Insert or replace a player's entry.
    pub fn upsert(&self, player: PlayerId, entry: PlayerEntry) {
        if let Ok(mut players) = self.players.write() {
            players.insert(player, entry);
        }
    }

    /// Apply `update` to an existing entry. Returns `false` for unknown players.
    pub fn update(&self, player: PlayerId, update: impl FnOnce(&mut PlayerEntry)) -> bool {
        let Ok(mut players) = self.players.write() else {
            return false;
        };
        match players.get_mut(&player) {
            Some(entry) => {
                update(entry);
                true
            }
            None => false,
        }
    }

    pub fn set_connected(&self, player: PlayerId, connected: bool) -> bool {
        self.update(player, |entry| entry.connected = connected)
    }

    pub fn set_position(&self, player: PlayerId, position: Position) -> bool {
        self.update(player, |entry| entry.position = Some(position))
    }

    pub fn len(&self) -> usize {
        self.players.read().map(|players| players.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_entry<T>(&self, player: PlayerId, read: impl FnOnce(&PlayerEntry) -> T) -> Option<T> {
        self.players.read().ok()?.get(&player).map(read)
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerDirectory for InMemoryDirectory {
    fn is_connected(&self, player: PlayerId) -> bool {
        self.with_entry(player, |entry| entry.connected)
            .unwrap_or(false)
    }

    fn position(&self, player: PlayerId) -> Option<Position> {
        self.with_entry(player, |entry| entry.position).flatten()
    }

    fn display_name(&self, player: PlayerId) -> Option<String> {
        self.with_entry(player, |entry| entry.name.clone())
    }

    fn find_by_name(&self, name: &str) -> Option<PlayerId> {
        let players = self.players.read().ok()?;
        players
            .iter()
            .filter(|(_, entry)| entry.name.eq_ignore_ascii_case(name))
            // prefer the connected holder of a reused name
            .max_by_key(|(id, entry)| (entry.connected, std::cmp::Reverse(**id)))
            .map(|(id, _)| *id)
    }

    fn party_members(&self, player: PlayerId) -> Vec<String> {
        self.display_name(player)
            .map(|name| self.parties.members_of(&name))
            .unwrap_or_default()
    }

    fn clan_members(&self, player: PlayerId) -> Vec<PlayerId> {
        let Ok(players) = self.players.read() else {
            return Vec::new();
        };
        let Some(clan) = players.get(&player).and_then(|entry| entry.clan.as_deref()) else {
            return Vec::new();
        };

        let mut members: Vec<PlayerId> = players
            .iter()
            .filter(|(id, entry)| **id != player && entry.clan.as_deref() == Some(clan))
            .map(|(id, _)| *id)
            .collect();
        members.sort_unstable();
        members
    }

    fn experience_log_enabled(&self, player: PlayerId) -> bool {
        self.with_entry(player, |entry| entry.experience_log)
            .unwrap_or(false)
    }

    fn equipped_weapon(&self, player: PlayerId) -> Option<WeaponKind> {
        self.with_entry(player, |entry| entry.weapon).flatten()
    }

    fn blood_legacy(&self, player: PlayerId) -> Option<LegacyKind> {
        self.with_entry(player, |entry| entry.legacy).flatten()
    }
}
