//! Prestige eligibility, caps and cross-track effects.

use std::sync::Arc;

use progression_core::{
    LegacyKind, PlayerId, PlayerProgression, ProgressionConfig, TrackId, TrackKind, WeaponKind,
};
use progression_runtime::{
    EngineError, Event, Ineligibility, InMemoryDirectory, PrestigeCommand, ProgressionEngine,
    Topic,
};

const PLAYER: PlayerId = PlayerId(7);

fn engine() -> ProgressionEngine {
    let mut config = ProgressionConfig::default();
    config.leveling.max_level = 20;
    config.expertise.max_level = 20;
    config.legacy.max_level = 20;
    config.prestige.max_exo = 3;

    let engine = ProgressionEngine::builder()
        .config(config)
        .shared_directory(Arc::new(InMemoryDirectory::new()))
        .build()
        .expect("engine should build");
    engine.on_player_connected(PLAYER).unwrap();
    engine
}

fn max_out(engine: &ProgressionEngine, track: TrackId) {
    engine
        .experience_ledger()
        .add_experience(PLAYER, track, 1.0e9)
        .unwrap();
}

#[test]
fn prestige_resets_only_its_own_track() {
    let engine = engine();
    let sword = TrackId::Expertise(WeaponKind::Sword);
    let axe = TrackId::Expertise(WeaponKind::Axe);
    max_out(&engine, sword);
    max_out(&engine, axe);
    engine
        .experience_ledger()
        .add_experience(PLAYER, TrackId::Experience, 900.0)
        .unwrap();
    let mut events = engine.subscribe(Topic::Prestige);

    let count = engine
        .handle_prestige(&PrestigeCommand::new(PLAYER, "Sword"))
        .unwrap();

    assert_eq!(count, 1);
    assert_eq!(engine.progression(PLAYER, sword).unwrap(), PlayerProgression::ZERO);
    assert_eq!(engine.progression(PLAYER, axe).unwrap().level, 20);
    assert_eq!(engine.progression(PLAYER, TrackId::Experience).unwrap().level, 3);
    assert_eq!(engine.prestige_count(PLAYER, axe).unwrap(), 0);

    match events.try_recv().unwrap() {
        Event::PrestigeApplied(notification) => {
            assert_eq!(notification.track, sword);
            assert_eq!(notification.new_prestige_level, 1);
            assert!((notification.stat_bonus - 0.1).abs() < 1e-12);
        }
        other => panic!("expected prestige notification, got {other:?}"),
    }
}

#[test]
fn prestige_below_cap_level_is_rejected_without_mutation() {
    let engine = engine();
    let track = TrackId::Legacy(LegacyKind::Scholar);
    engine
        .experience_ledger()
        .add_experience(PLAYER, track, 400.0)
        .unwrap();

    let err = engine
        .handle_prestige(&PrestigeCommand::new(PLAYER, "scholar"))
        .unwrap_err();

    assert_eq!(
        err.ineligibility(),
        Some(Ineligibility::LevelTooLow {
            level: 2,
            required: 20
        })
    );
    assert_eq!(engine.progression(PLAYER, track).unwrap().level, 2);
    assert_eq!(engine.prestige_count(PLAYER, track).unwrap(), 0);
}

#[test]
fn prestige_at_max_count_is_rejected_without_mutation() {
    let engine = engine();
    let track = TrackId::Experience;
    for expected in 1..=10 {
        max_out(&engine, track);
        let count = engine
            .handle_prestige(&PrestigeCommand::new(PLAYER, "experience"))
            .unwrap();
        assert_eq!(count, expected);
    }

    max_out(&engine, track);
    let before = engine.progression(PLAYER, track).unwrap();
    let err = engine
        .handle_prestige(&PrestigeCommand::new(PLAYER, "level"))
        .unwrap_err();

    assert!(matches!(
        err,
        EngineError::NotEligible {
            reason: Ineligibility::AtMaxPrestige { count: 10, max: 10 },
            ..
        }
    ));
    assert_eq!(engine.progression(PLAYER, track).unwrap(), before);
    assert_eq!(engine.prestige_count(PLAYER, track).unwrap(), 10);
}

#[test]
fn unknown_track_names_are_invalid() {
    let engine = engine();
    let err = engine
        .handle_prestige(&PrestigeCommand::new(PLAYER, "banana"))
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTrack(_)));
    assert_eq!(err.to_string(), "unknown track 'banana'");
}

#[test]
fn exo_requires_maxed_experience_prestige() {
    let engine = engine();
    max_out(&engine, TrackId::Experience);

    let err = engine
        .handle_prestige(&PrestigeCommand::new(PLAYER, "exo"))
        .unwrap_err();
    assert_eq!(
        err.ineligibility(),
        Some(Ineligibility::ExperiencePrestigeRequired {
            count: 0,
            required: 10
        })
    );

    engine
        .prestige_ledger()
        .set(PLAYER, TrackId::Experience, 10)
        .unwrap();
    let count = engine
        .handle_prestige(&PrestigeCommand::new(PLAYER, "EXO"))
        .unwrap();

    assert_eq!(count, 1);
    assert_eq!(
        engine.progression(PLAYER, TrackId::Experience).unwrap(),
        PlayerProgression::ZERO
    );
    assert_eq!(engine.prestige_count(PLAYER, TrackId::Experience).unwrap(), 10);
}

#[test]
fn registry_resolves_every_track() {
    let engine = engine();
    let registry = engine.prestige_registry();

    for track in TrackId::all() {
        let handler = registry.resolve(&track.to_string()).unwrap();
        assert_eq!(handler.track(), track);
        assert_eq!(handler.track_kind(), track.kind());
    }
    assert_eq!(
        registry.resolve("fishing_pole").unwrap().track_kind(),
        TrackKind::Expertise
    );
}

#[test]
fn admin_reset_clears_count_only() {
    let engine = engine();
    let track = TrackId::Expertise(WeaponKind::Reaper);
    max_out(&engine, track);
    engine
        .handle_prestige(&PrestigeCommand::new(PLAYER, "reaper"))
        .unwrap();
    max_out(&engine, track);
    let mut events = engine.subscribe(Topic::Prestige);

    let previous = engine.reset_prestige(PLAYER, track).unwrap();

    assert_eq!(previous, 1);
    assert_eq!(engine.prestige_count(PLAYER, track).unwrap(), 0);
    assert_eq!(engine.progression(PLAYER, track).unwrap().level, 20);
    assert!(events.try_recv().is_err());
}

#[test]
fn experience_prestige_raises_every_other_track_rate() {
    let engine = engine();
    let others: Vec<TrackId> = TrackId::all()
        .filter(|track| *track != TrackId::Experience)
        .collect();

    let mut previous: Vec<f64> = others
        .iter()
        .map(|track| engine.rate_modifiers(PLAYER, *track).unwrap().net_rate_delta)
        .collect();

    for count in 1..=3 {
        engine
            .prestige_ledger()
            .set(PLAYER, TrackId::Experience, count)
            .unwrap();
        for (track, before) in others.iter().zip(previous.iter_mut()) {
            let delta = engine.rate_modifiers(PLAYER, *track).unwrap().net_rate_delta;
            assert!(delta > *before, "{track} did not improve");
            *before = delta;
        }
    }

    let master = engine.rate_modifiers(PLAYER, TrackId::Experience).unwrap();
    assert!((master.leveling_reduction - 0.15).abs() < 1e-12);
}
