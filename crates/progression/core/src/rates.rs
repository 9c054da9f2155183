//! Prestige-driven growth-rate and stat modifiers.
//!
//! Experience prestige slows the master track and speeds every other track;
//! prestige on any other track earns that track a stat bonus and a flat rate
//! penalty.

use crate::config::PrestigeConfig;
use crate::track::{TrackId, TrackKind};

/// Net modifiers of one track for one player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RateModifiers {
    /// Fraction removed from master-track gains. Zero for other tracks.
    pub leveling_reduction: f64,
    /// Fraction added by banked Experience prestige. Zero for the master track.
    pub cross_boost: f64,
    /// Fraction removed by this track's own prestige.
    pub rates_reduction: f64,
    /// `cross_boost - rates_reduction`.
    pub net_rate_delta: f64,
    /// Additive stat bonus fraction for the buff collaborator.
    pub stat_bonus: f64,
}

/// Combines the Experience prestige count with a track's own prestige count.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateModifierCalculator {
    config: PrestigeConfig,
}

impl RateModifierCalculator {
    pub const fn new(config: PrestigeConfig) -> Self {
        Self { config }
    }

    /// Modifiers of `track` given `experience_prestige` and the track's own count.
    ///
    /// For the Experience track `track_prestige` is the same counter as
    /// `experience_prestige`.
    pub fn modifiers(
        &self,
        track: TrackId,
        experience_prestige: u32,
        track_prestige: u32,
    ) -> RateModifiers {
        let e = f64::from(experience_prestige);
        let p = f64::from(track_prestige);
        let stat_bonus = self.config.stat_multiplier * p;

        match track.kind() {
            TrackKind::Experience => {
                let leveling_reduction = self.config.leveling_reducer * e;
                RateModifiers {
                    leveling_reduction,
                    cross_boost: 0.0,
                    rates_reduction: 0.0,
                    net_rate_delta: -leveling_reduction,
                    stat_bonus,
                }
            }
            TrackKind::Exo | TrackKind::Expertise | TrackKind::Legacy => {
                let cross_boost = self.config.rate_multiplier * e;
                let rates_reduction = self.config.rates_reducer * p;
                RateModifiers {
                    leveling_reduction: 0.0,
                    cross_boost,
                    rates_reduction,
                    net_rate_delta: cross_boost - rates_reduction,
                    stat_bonus,
                }
            }
        }
    }
}

impl Default for RateModifierCalculator {
    fn default() -> Self {
        Self::new(PrestigeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::{LegacyKind, WeaponKind};

    #[test]
    fn experience_track_only_reduces_itself() {
        let calc = RateModifierCalculator::default();
        let mods = calc.modifiers(TrackId::Experience, 3, 3);
        assert!((mods.leveling_reduction - 0.15).abs() < 1e-12);
        assert_eq!(mods.cross_boost, 0.0);
        assert!((mods.net_rate_delta + 0.15).abs() < 1e-12);
        assert!((mods.stat_bonus - 0.3).abs() < 1e-12);
    }

    #[test]
    fn other_tracks_net_boost_against_own_penalty() {
        let calc = RateModifierCalculator::default();
        let sword = TrackId::Expertise(WeaponKind::Sword);
        let mods = calc.modifiers(sword, 4, 1);
        assert!((mods.cross_boost - 0.4).abs() < 1e-12);
        assert!((mods.rates_reduction - 0.1).abs() < 1e-12);
        assert!((mods.net_rate_delta - 0.3).abs() < 1e-12);
        assert!((mods.stat_bonus - 0.1).abs() < 1e-12);
    }

    #[test]
    fn experience_prestige_strictly_raises_every_other_track() {
        let calc = RateModifierCalculator::default();
        for track in TrackId::all().filter(|t| *t != TrackId::Experience) {
            for own in 0..=3 {
                let mut previous = calc.modifiers(track, 0, own).net_rate_delta;
                for e in 1..=10 {
                    let current = calc.modifiers(track, e, own).net_rate_delta;
                    assert!(current > previous, "{track} at E={e}");
                    previous = current;
                }
            }
        }
    }

    #[test]
    fn stat_bonus_ignores_experience_prestige() {
        let calc = RateModifierCalculator::default();
        let brute = TrackId::Legacy(LegacyKind::Brute);
        assert_eq!(
            calc.modifiers(brute, 0, 2).stat_bonus,
            calc.modifiers(brute, 9, 2).stat_bonus
        );
    }
}
