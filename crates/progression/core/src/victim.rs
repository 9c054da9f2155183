//! Description of the unit that was killed or consumed.

use bitflags::bitflags;

bitflags! {
    /// Classification flags read from the victim entity.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct VictimFlags: u8 {
        /// Boss tier (VBlood); always credited solo.
        const BOSS = 0b0000_0001;
        /// Summoned minion; never levelable.
        const MINION = 0b0000_0010;
        /// Non-aggressive creature.
        const DOCILE = 0b0000_0100;
        /// Trash spawned by a war event.
        const WAR_EVENT = 0b0000_1000;
        /// Spawned by a unit spawner structure.
        const UNIT_SPAWNER = 0b0001_0000;
    }
}

/// Per-event victim attributes. Consumed once, never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VictimDescriptor {
    /// `None` when the unit carries no level attribute.
    pub level: Option<u32>,
    pub max_health: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: VictimFlags,
}

impl VictimDescriptor {
    pub const fn new(level: u32, max_health: f64) -> Self {
        Self {
            level: Some(level),
            max_health,
            flags: VictimFlags::empty(),
        }
    }

    /// Adds classification flags (builder pattern).
    #[must_use]
    pub const fn with_flags(mut self, flags: VictimFlags) -> Self {
        self.flags = self.flags.union(flags);
        self
    }

    pub const fn is_boss(&self) -> bool {
        self.flags.contains(VictimFlags::BOSS)
    }

    pub const fn is_minion(&self) -> bool {
        self.flags.contains(VictimFlags::MINION)
    }

    pub const fn is_docile(&self) -> bool {
        self.flags.contains(VictimFlags::DOCILE)
    }

    pub const fn is_war_event(&self) -> bool {
        self.flags.contains(VictimFlags::WAR_EVENT)
    }

    pub const fn is_unit_spawner(&self) -> bool {
        self.flags.contains(VictimFlags::UNIT_SPAWNER)
    }

    /// Level of a victim that can award experience, or `None` if it cannot.
    pub const fn levelable_level(&self) -> Option<u32> {
        if self.is_minion() {
            return None;
        }
        self.level
    }
}
