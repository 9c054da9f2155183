//! Credit-sharing resolution for kills.

use std::collections::BTreeSet;

use progression_core::{GroupConfig, PlayerId, Position};

use crate::oracle::PlayerDirectory;

/// Resolves which players share credit for a kill.
pub struct GroupResolver<'a> {
    config: &'a GroupConfig,
    directory: &'a dyn PlayerDirectory,
}

impl<'a> GroupResolver<'a> {
    pub fn new(config: &'a GroupConfig, directory: &'a dyn PlayerDirectory) -> Self {
        Self { config, directory }
    }

    /// Killer plus every connected party member (when parties are enabled)
    /// and clan member within `share_distance` of the killer.
    ///
    /// Only the killer is returned when the killer's position is unknown.
    pub fn resolve(&self, killer: PlayerId) -> BTreeSet<PlayerId> {
        let mut participants = BTreeSet::from([killer]);

        let Some(origin) = self.directory.position(killer) else {
            tracing::trace!(
                target: "progression::kill",
                %killer,
                "killer position unknown, crediting solo"
            );
            return participants;
        };

        if self.config.parties_enabled {
            let members = self.directory.party_members(killer);
            // a party of one contributes nothing
            if members.len() > 1 {
                for name in &members {
                    if let Some(member) = self.directory.find_by_name(name)
                        && self.is_nearby(member, &origin)
                    {
                        participants.insert(member);
                    }
                }
            }
        }

        for member in self.directory.clan_members(killer) {
            if self.is_nearby(member, &origin) {
                participants.insert(member);
            }
        }

        participants
    }

    fn is_nearby(&self, player: PlayerId, origin: &Position) -> bool {
        self.directory.is_connected(player)
            && self
                .directory
                .position(player)
                .is_some_and(|position| position.distance(origin) <= self.config.share_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{InMemoryDirectory, PlayerEntry};

    fn directory() -> InMemoryDirectory {
        let directory = InMemoryDirectory::new();
        directory.upsert(PlayerId(1), PlayerEntry::new("killer", Position::ORIGIN));
        directory.upsert(
            PlayerId(2),
            PlayerEntry::new("near", Position::new(10.0, 0.0, 0.0)),
        );
        directory.upsert(
            PlayerId(3),
            PlayerEntry::new("far", Position::new(100.0, 0.0, 0.0)),
        );
        directory.parties().create("killer").unwrap();
        directory.parties().add_member("killer", "Near").unwrap();
        directory.parties().add_member("killer", "FAR").unwrap();
        directory
    }

    fn config(parties_enabled: bool) -> GroupConfig {
        GroupConfig {
            parties_enabled,
            ..GroupConfig::default()
        }
    }

    #[test]
    fn parties_disabled_credits_solo() {
        let directory = directory();
        let config = config(false);
        let resolver = GroupResolver::new(&config, &directory);
        assert_eq!(resolver.resolve(PlayerId(1)), BTreeSet::from([PlayerId(1)]));
    }

    #[test]
    fn party_members_within_distance_share() {
        let directory = directory();
        let config = config(true);
        let resolver = GroupResolver::new(&config, &directory);
        assert_eq!(
            resolver.resolve(PlayerId(1)),
            BTreeSet::from([PlayerId(1), PlayerId(2)])
        );
    }

    #[test]
    fn disconnected_members_are_excluded() {
        let directory = directory();
        directory.set_connected(PlayerId(2), false);
        let config = config(true);
        let resolver = GroupResolver::new(&config, &directory);
        assert_eq!(resolver.resolve(PlayerId(1)), BTreeSet::from([PlayerId(1)]));
    }

    #[test]
    fn clan_members_share_regardless_of_party_toggle() {
        let directory = InMemoryDirectory::new();
        directory.upsert(
            PlayerId(1),
            PlayerEntry::new("a", Position::ORIGIN).with_clan("c"),
        );
        directory.upsert(
            PlayerId(2),
            PlayerEntry::new("b", Position::new(0.0, 0.0, 25.0)).with_clan("c"),
        );
        directory.upsert(
            PlayerId(3),
            PlayerEntry::new("d", Position::new(0.0, 30.0, 0.0)).with_clan("c"),
        );

        let config = config(false);
        let resolver = GroupResolver::new(&config, &directory);
        assert_eq!(
            resolver.resolve(PlayerId(1)),
            BTreeSet::from([PlayerId(1), PlayerId(2)])
        );
    }

    #[test]
    fn unknown_position_credits_solo() {
        let directory = directory();
        directory.update(PlayerId(1), |entry| entry.position = None);
        directory.upsert(
            PlayerId(4),
            PlayerEntry::new("clanmate", Position::ORIGIN).with_clan("c"),
        );
        directory.update(PlayerId(1), |entry| entry.clan = Some("c".into()));

        let config = config(true);
        let resolver = GroupResolver::new(&config, &directory);
        assert_eq!(resolver.resolve(PlayerId(1)), BTreeSet::from([PlayerId(1)]));
    }
}
