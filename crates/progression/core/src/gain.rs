//! Experience gain formulas.
//!
//! The kill gain is a product of independent scalars applied to the combined
//! base and health-bonus experience:
//!
//! ```text
//! gained = (victim_level * tier_multiplier + max_health / divisor)
//!        × overlevel_taper × prestige_reduction × environment × group
//! ```
//!
//! The health bonus is tapered along with the base.

use crate::config::{EnvironmentConfig, ProgressionConfig, TrackLevelingConfig};
use crate::curve::LevelCurve;
use crate::victim::VictimDescriptor;

/// Standing of a single participant at the moment of the kill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParticipantStanding {
    pub level: u32,
    pub experience_prestige: u32,
    pub exo_prestige: u32,
}

/// Intermediate factors of one participant's kill gain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KillGain {
    pub base: f64,
    pub bonus: f64,
    pub taper: f64,
    pub prestige: f64,
    pub environment: f64,
    pub group: f64,
    pub total: f64,
}

/// `exp(-k * (participant - victim))` when the participant outlevels the victim, else `1.0`.
pub fn overlevel_taper(k: f64, participant_level: u32, victim_level: u32) -> f64 {
    if participant_level <= victim_level || k <= 0.0 {
        return 1.0;
    }
    let delta = f64::from(participant_level - victim_level);
    (-k * delta).exp()
}

/// Multiplier removing `reducer` per Experience prestige.
///
/// Any Exo prestige suspends the reduction entirely.
pub fn prestige_reduction(reducer: f64, experience_prestige: u32, exo_prestige: u32) -> f64 {
    if experience_prestige == 0 || exo_prestige > 0 {
        return 1.0;
    }
    (1.0 - reducer * f64::from(experience_prestige)).max(0.0)
}

/// Product of the enabled victim-origin penalties.
pub fn environment_multiplier(config: &EnvironmentConfig, victim: &VictimDescriptor) -> f64 {
    let mut multiplier = 1.0;
    if config.unit_spawner_enabled && victim.is_unit_spawner() {
        multiplier *= config.unit_spawner_multiplier;
    }
    if config.war_event_enabled && victim.is_war_event() {
        multiplier *= config.war_event_multiplier;
    }
    if config.docile_enabled && victim.is_docile() && !victim.is_boss() {
        multiplier *= EnvironmentConfig::DOCILE_MULTIPLIER;
    }
    multiplier
}

/// Group multiplier for a kill shared by `participants` players.
pub fn group_multiplier(group_rate: f64, participants: usize) -> f64 {
    if participants > 1 { group_rate } else { 1.0 }
}

/// Kill experience for one participant.
///
/// `victim_level` is the levelable level of `victim`; callers drop
/// non-levelable victims before reaching this point.
pub fn kill_experience(
    config: &ProgressionConfig,
    victim: &VictimDescriptor,
    victim_level: u32,
    participant: ParticipantStanding,
    participants: usize,
) -> KillGain {
    let leveling = &config.leveling;
    let tier = if victim.is_boss() {
        leveling.boss_multiplier
    } else {
        leveling.unit_multiplier
    };

    let base = f64::from(victim_level) * tier;
    let bonus = (victim.max_health / leveling.health_divisor).max(0.0);
    let taper = overlevel_taper(leveling.overlevel_taper, participant.level, victim_level);
    let prestige = prestige_reduction(
        config.prestige.leveling_reducer,
        participant.experience_prestige,
        participant.exo_prestige,
    );
    let environment = environment_multiplier(&config.environment, victim);
    let group = group_multiplier(leveling.group_multiplier, participants);

    let total = ((base + bonus) * taper * prestige * environment * group).max(0.0);

    KillGain {
        base,
        bonus,
        taper,
        prestige,
        environment,
        group,
        total,
    }
}

/// Quest reward experience: a fraction of the current level threshold.
pub fn quest_experience(curve: &LevelCurve, fraction: f64, level: u32, multiplier: i32) -> f64 {
    (curve.level_to_xp(level) * fraction * f64::from(multiplier)).max(0.0)
}

/// Expertise gained by the killer's equipped weapon.
pub fn expertise_experience(config: &TrackLevelingConfig, victim: &VictimDescriptor) -> f64 {
    let tier = if victim.is_boss() {
        config.boss_multiplier
    } else {
        config.unit_multiplier
    };
    (victim.max_health / 10.0 * tier).max(0.0)
}

/// Legacy gained by the killer's blood type from a consumed victim.
pub fn legacy_experience(
    config: &TrackLevelingConfig,
    victim: &VictimDescriptor,
    victim_level: u32,
) -> f64 {
    let tier = if victim.is_boss() {
        config.boss_multiplier
    } else {
        config.unit_multiplier
    };
    (f64::from(victim_level) * tier).max(0.0)
}

/// Scales a raw track gain by `1 + net_rate_delta`, never below zero.
pub fn apply_rate(gain: f64, net_rate_delta: f64) -> f64 {
    (gain * (1.0 + net_rate_delta)).max(0.0)
}
