//! Kill crediting scenarios driven through the engine facade.

use std::sync::Arc;

use progression_core::{
    LegacyKind, PlayerId, PlayerProgression, Position, ProgressionConfig, TrackId,
    VictimDescriptor, VictimFlags, WeaponKind,
};
use progression_runtime::{
    CreditOutcome, EngineError, Event, IgnoreReason, InMemoryDirectory, KillEvent, PlayerEntry,
    ProgressionEngine, QuestRewardExperienceEvent, Topic,
};

fn plain_config() -> ProgressionConfig {
    let mut config = ProgressionConfig::default();
    config.leveling.unit_multiplier = 1.0;
    config
}

fn engine_with(config: ProgressionConfig, directory: Arc<InMemoryDirectory>) -> ProgressionEngine {
    ProgressionEngine::builder()
        .config(config)
        .shared_directory(directory)
        .build()
        .expect("engine should build")
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn solo_directory() -> Arc<InMemoryDirectory> {
    let directory = Arc::new(InMemoryDirectory::new());
    directory.upsert(PlayerId(1), PlayerEntry::new("solo", Position::ORIGIN));
    directory
}

#[test]
fn fresh_player_kill_credits_base_plus_health_bonus() {
    let engine = engine_with(plain_config(), solo_directory());
    engine.on_player_connected(PlayerId(1)).unwrap();

    let report = engine.handle_kill(&KillEvent::new(
        PlayerId(1),
        VictimDescriptor::new(10, 250.0),
    ));

    let change = report
        .outcome(PlayerId(1), TrackId::Experience)
        .and_then(CreditOutcome::change)
        .expect("killer credited");
    assert!(approx(change.gained, 110.0));
    assert_eq!(change.after, PlayerProgression::new(1, 110.0));
    assert_eq!(report.group_multiplier, 1.0);
}

#[test]
fn party_members_each_receive_group_credit() {
    let directory = Arc::new(InMemoryDirectory::new());
    for (id, name, x) in [(1, "Alpha", 0.0), (2, "Beta", 5.0), (3, "Gamma", 0.0)] {
        directory.upsert(
            PlayerId(id),
            PlayerEntry::new(name, Position::new(x, 0.0, 0.0)),
        );
    }
    directory.parties().create("alpha").unwrap();
    directory.parties().add_member("alpha", "beta").unwrap();
    directory.parties().add_member("alpha", "gamma").unwrap();

    let mut config = plain_config();
    config.leveling.group_multiplier = 1.5;
    config.leveling.starting_level = 5;
    config.group.parties_enabled = true;

    let engine = engine_with(config, directory);
    for id in 1..=3 {
        engine.on_player_connected(PlayerId(id)).unwrap();
    }
    let start = engine.progression(PlayerId(1), TrackId::Experience).unwrap();
    assert_eq!(start.level, 5);

    let report = engine.handle_kill(&KillEvent::new(
        PlayerId(1),
        VictimDescriptor::new(5, 100.0),
    ));

    assert_eq!(report.participants.len(), 3);
    assert_eq!(report.group_multiplier, 1.5);
    for id in 1..=3 {
        let change = report
            .outcome(PlayerId(id), TrackId::Experience)
            .and_then(CreditOutcome::change)
            .expect("member credited");
        assert!(approx(change.gained, 67.5), "player {id} gained {}", change.gained);
        assert!(approx(change.after.experience, start.experience + 67.5));
    }
}

#[test]
fn boss_kills_are_always_solo() {
    let directory = Arc::new(InMemoryDirectory::new());
    directory.upsert(
        PlayerId(1),
        PlayerEntry::new("a", Position::ORIGIN).with_clan("night"),
    );
    directory.upsert(
        PlayerId(2),
        PlayerEntry::new("b", Position::ORIGIN).with_clan("night"),
    );

    let mut config = plain_config();
    config.leveling.group_multiplier = 1.5;
    let engine = engine_with(config, directory);

    let boss = VictimDescriptor::new(20, 0.0).with_flags(VictimFlags::BOSS);
    let report = engine.handle_kill(&KillEvent::new(PlayerId(1), boss));

    assert_eq!(report.participants.len(), 1);
    assert_eq!(report.group_multiplier, 1.0);
    assert!(report.outcome(PlayerId(2), TrackId::Experience).is_none());
    let change = report
        .outcome(PlayerId(1), TrackId::Experience)
        .and_then(CreditOutcome::change)
        .unwrap();
    assert!(approx(change.gained, 20.0 * 15.0));
}

#[test]
fn experience_prestige_reduces_kill_credit() {
    let engine = engine_with(plain_config(), solo_directory());
    engine.on_player_connected(PlayerId(1)).unwrap();
    engine
        .prestige_ledger()
        .set(PlayerId(1), TrackId::Experience, 2)
        .unwrap();

    let report = engine.handle_kill(&KillEvent::new(
        PlayerId(1),
        VictimDescriptor::new(10, 250.0),
    ));
    let change = report
        .outcome(PlayerId(1), TrackId::Experience)
        .and_then(CreditOutcome::change)
        .unwrap();
    assert!(approx(change.gained, 99.0));

    // any exo prestige lifts the reduction
    engine
        .prestige_ledger()
        .set(PlayerId(1), TrackId::Exo, 1)
        .unwrap();
    let report = engine.handle_kill(&KillEvent::new(
        PlayerId(1),
        VictimDescriptor::new(10, 250.0),
    ));
    let change = report
        .outcome(PlayerId(1), TrackId::Experience)
        .and_then(CreditOutcome::change)
        .unwrap();
    assert!(approx(change.gained, 110.0));
}

#[test]
fn capped_player_is_skipped_silently() {
    let mut config = plain_config();
    config.leveling.starting_level = config.leveling.max_level;
    let directory = solo_directory();
    directory.update(PlayerId(1), |entry| entry.experience_log = true);

    let engine = engine_with(config, directory);
    engine.on_player_connected(PlayerId(1)).unwrap();
    let before = engine.progression(PlayerId(1), TrackId::Experience).unwrap();
    let mut events = engine.subscribe(Topic::Progression);

    let report = engine.handle_kill(&KillEvent::new(
        PlayerId(1),
        VictimDescriptor::new(10, 250.0),
    ));

    assert!(matches!(
        report.outcome(PlayerId(1), TrackId::Experience),
        Some(CreditOutcome::AlreadyAtCap)
    ));
    assert_eq!(
        engine.progression(PlayerId(1), TrackId::Experience).unwrap(),
        before
    );
    assert!(events.try_recv().is_err());
}

#[test]
fn quest_rewards_still_apply_at_cap_but_stay_clamped() {
    let mut config = plain_config();
    config.leveling.starting_level = config.leveling.max_level;
    let engine = engine_with(config, solo_directory());
    engine.on_player_connected(PlayerId(1)).unwrap();

    let outcome = engine.handle_quest_reward(&QuestRewardExperienceEvent {
        player: PlayerId(1),
        multiplier: 3,
    });
    let change = outcome.change().expect("quest credit applies at cap");
    assert_eq!(change.after.level, 90);

    let curve = engine.experience_ledger().curve();
    assert_eq!(curve.xp_to_level(change.after.experience), 90);
}

#[test]
fn quest_reward_scales_with_level_threshold() {
    let mut config = plain_config();
    config.leveling.starting_level = 10;
    let engine = engine_with(config, solo_directory());
    engine.on_player_connected(PlayerId(1)).unwrap();

    let outcome = engine.handle_quest_reward(&QuestRewardExperienceEvent {
        player: PlayerId(1),
        multiplier: 2,
    });
    let threshold = engine.experience_ledger().curve().level_to_xp(10);
    let change = outcome.change().unwrap();
    assert!(approx(change.gained, threshold * 0.025 * 2.0));
}

#[test]
fn non_levelable_victims_are_ignored() {
    let engine = engine_with(plain_config(), solo_directory());

    let minion = VictimDescriptor::new(10, 250.0).with_flags(VictimFlags::MINION);
    let report = engine.handle_kill(&KillEvent::new(PlayerId(1), minion));
    assert_eq!(report.ignored, Some(IgnoreReason::Minion));

    let mut unlevelled = VictimDescriptor::new(10, 250.0);
    unlevelled.level = None;
    let report = engine.handle_kill(&KillEvent::new(PlayerId(1), unlevelled));
    assert_eq!(report.ignored, Some(IgnoreReason::NoLevel));
    assert!(report.credits.is_empty());
}

#[test]
fn environment_penalties_apply_when_enabled() {
    let engine = engine_with(plain_config(), solo_directory());

    let docile = VictimDescriptor::new(10, 250.0).with_flags(VictimFlags::DOCILE);
    let report = engine.handle_kill(&KillEvent::new(PlayerId(1), docile));
    let change = report
        .outcome(PlayerId(1), TrackId::Experience)
        .and_then(CreditOutcome::change)
        .unwrap();
    assert!(approx(change.gained, 22.0));

    let spawned = VictimDescriptor::new(10, 250.0).with_flags(VictimFlags::UNIT_SPAWNER);
    let report = engine.handle_kill(&KillEvent::new(PlayerId(1), spawned));
    let change = report
        .outcome(PlayerId(1), TrackId::Experience)
        .and_then(CreditOutcome::change)
        .unwrap();
    assert_eq!(change.gained, 0.0);
}

#[test]
fn level_up_and_gain_notices_are_published() {
    let directory = solo_directory();
    directory.update(PlayerId(1), |entry| entry.experience_log = true);
    let engine = engine_with(plain_config(), directory);
    let mut events = engine.subscribe(Topic::Progression);

    engine.handle_kill(&KillEvent::new(
        PlayerId(1),
        VictimDescriptor::new(10, 250.0),
    ));

    match events.try_recv().unwrap() {
        Event::LevelUp(notification) => {
            assert_eq!(notification.track, TrackId::Experience);
            assert_eq!(notification.previous_level, 0);
            assert_eq!(notification.new_level, 1);
        }
        other => panic!("expected level up, got {other:?}"),
    }
    match events.try_recv().unwrap() {
        Event::ExperienceGained(notice) => {
            assert!(approx(notice.amount, 110.0));
            assert!((0.0..=100.0).contains(&notice.progress_percent));
        }
        other => panic!("expected gain notice, got {other:?}"),
    }
}

#[test]
fn expertise_is_credited_to_the_killer_weapon() {
    let directory = Arc::new(InMemoryDirectory::new());
    directory.upsert(
        PlayerId(1),
        PlayerEntry::new("a", Position::ORIGIN).with_weapon(WeaponKind::Sword),
    );
    let engine = engine_with(plain_config(), directory);
    engine
        .prestige_ledger()
        .set(PlayerId(1), TrackId::Experience, 1)
        .unwrap();

    let report = engine.handle_kill(&KillEvent::new(
        PlayerId(1),
        VictimDescriptor::new(10, 250.0),
    ));

    // 250 / 10 * 2.0 unit multiplier, boosted 10% by one experience prestige
    let track = TrackId::Expertise(WeaponKind::Sword);
    let change = report
        .outcome(PlayerId(1), track)
        .and_then(CreditOutcome::change)
        .unwrap();
    assert!(approx(change.gained, 55.0));
    assert!(report.outcome(PlayerId(1), TrackId::Legacy(LegacyKind::Rogue)).is_none());
}

#[test]
fn legacy_needs_a_consumed_victim() {
    let directory = Arc::new(InMemoryDirectory::new());
    directory.upsert(
        PlayerId(1),
        PlayerEntry::new("a", Position::ORIGIN).with_legacy(LegacyKind::Rogue),
    );
    let engine = engine_with(plain_config(), directory);
    let track = TrackId::Legacy(LegacyKind::Rogue);

    let killed = engine.handle_kill(&KillEvent::new(
        PlayerId(1),
        VictimDescriptor::new(10, 250.0),
    ));
    assert!(killed.outcome(PlayerId(1), track).is_none());

    let fed = engine.handle_kill(&KillEvent::new(PlayerId(1), VictimDescriptor::new(10, 250.0)).consumed());
    let change = fed
        .outcome(PlayerId(1), track)
        .and_then(CreditOutcome::change)
        .unwrap();
    assert!(approx(change.gained, 20.0));
}

#[test]
fn missing_directory_is_rejected() {
    let err = ProgressionEngine::builder().build().err().unwrap();
    assert!(matches!(err, EngineError::MissingDirectory));
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = ProgressionConfig::default();
    config.curve.scale = 0.0;
    let err = ProgressionEngine::builder()
        .config(config)
        .directory(InMemoryDirectory::new())
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, EngineError::InvalidConfig(_)));
}
