//! Name-keyed party membership.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

/// Default cap on party size, owner included.
pub const DEFAULT_MAX_PARTY_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartyError {
    #[error("{0} already leads a party")]
    AlreadyLeading(String),

    #[error("{0} does not lead a party")]
    NoSuchParty(String),

    #[error("{0} is already in a party")]
    AlreadyInParty(String),

    #[error("party is full ({max} members)")]
    PartyFull { max: usize },

    #[error("party registry lock was poisoned")]
    LockPoisoned,
}

/// Parties keyed by their owner's display name.
///
/// Names compare case-insensitively. A name belongs to at most one party.
/// Because membership is by display name, a name reused by another player
/// after a disconnect inherits the old party slot.
pub struct PartyRegistry {
    max_size: usize,
    // owner (lowercase) -> members as entered, owner first
    parties: RwLock<HashMap<String, Vec<String>>>,
}

impl PartyRegistry {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_PARTY_SIZE)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            max_size: max_size.max(1),
            parties: RwLock::new(HashMap::new()),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Start a party led by `owner`.
    pub fn create(&self, owner: &str) -> Result<(), PartyError> {
        let mut parties = self.parties.write().map_err(|_| PartyError::LockPoisoned)?;
        let key = owner.to_ascii_lowercase();
        if parties.contains_key(&key) {
            return Err(PartyError::AlreadyLeading(owner.to_string()));
        }
        if Self::find(&parties, owner).is_some() {
            return Err(PartyError::AlreadyInParty(owner.to_string()));
        }
        parties.insert(key, vec![owner.to_string()]);
        Ok(())
    }

    /// Add `member` to the party led by `owner`.
    pub fn add_member(&self, owner: &str, member: &str) -> Result<(), PartyError> {
        let mut parties = self.parties.write().map_err(|_| PartyError::LockPoisoned)?;
        if Self::find(&parties, member).is_some() {
            return Err(PartyError::AlreadyInParty(member.to_string()));
        }

        let members = parties
            .get_mut(&owner.to_ascii_lowercase())
            .ok_or_else(|| PartyError::NoSuchParty(owner.to_string()))?;
        if members.len() >= self.max_size {
            return Err(PartyError::PartyFull { max: self.max_size });
        }
        members.push(member.to_string());
        Ok(())
    }

    /// Remove `member` from the party led by `owner`. Removing the owner disbands it.
    pub fn remove_member(&self, owner: &str, member: &str) -> Result<bool, PartyError> {
        let mut parties = self.parties.write().map_err(|_| PartyError::LockPoisoned)?;
        let key = owner.to_ascii_lowercase();
        if member.eq_ignore_ascii_case(owner) {
            return Ok(parties.remove(&key).is_some());
        }

        let members = parties
            .get_mut(&key)
            .ok_or_else(|| PartyError::NoSuchParty(owner.to_string()))?;
        let before = members.len();
        members.retain(|name| !name.eq_ignore_ascii_case(member));
        Ok(members.len() != before)
    }

    pub fn disband(&self, owner: &str) -> Result<bool, PartyError> {
        let mut parties = self.parties.write().map_err(|_| PartyError::LockPoisoned)?;
        Ok(parties.remove(&owner.to_ascii_lowercase()).is_some())
    }

    /// Every member of the party `name` belongs to, `name` included.
    ///
    /// Empty when `name` is in no party.
    pub fn members_of(&self, name: &str) -> Vec<String> {
        self.parties
            .read()
            .ok()
            .and_then(|parties| Self::find(&parties, name).cloned())
            .unwrap_or_default()
    }

    fn find<'a>(parties: &'a HashMap<String, Vec<String>>, name: &str) -> Option<&'a Vec<String>> {
        parties
            .values()
            .find(|members| members.iter().any(|m| m.eq_ignore_ascii_case(name)))
    }
}

impl Default for PartyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
