//! Replay a scripted session through the progression engine
//!
//! The script is a JSON document describing players, parties and an ordered
//! list of events. Notifications are printed as they are published and the
//! final ledgers are printed once the script ends.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use progression_content::ConfigLoader;
use progression_core::{LegacyKind, PlayerId, Position, ProgressionConfig, TrackId, WeaponKind};
use progression_runtime::{
    CreditOutcome, Event, FileStore, InMemoryDirectory, KillEvent, KillReport, PlayerEntry,
    PrestigeCommand, ProgressionEngine, QuestRewardExperienceEvent, Topic,
};

/// Replay a JSON event script through the engine
#[derive(Parser)]
pub struct Simulate {
    /// Script describing players, parties and events
    #[arg(short, long, value_name = "FILE")]
    script: PathBuf,

    /// Engine configuration (defaults to the bundled tuning)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Persist ledgers to this directory instead of keeping them in memory
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    players: Vec<ScriptPlayer>,
    #[serde(default)]
    parties: Vec<ScriptParty>,
    #[serde(default)]
    events: Vec<ScriptEvent>,
}

#[derive(Debug, Deserialize)]
struct ScriptPlayer {
    id: PlayerId,
    name: String,
    #[serde(default)]
    position: Option<Position>,
    #[serde(default)]
    clan: Option<String>,
    #[serde(default)]
    weapon: Option<WeaponKind>,
    #[serde(default)]
    legacy: Option<LegacyKind>,
    #[serde(default)]
    experience_log: bool,
}

#[derive(Debug, Deserialize)]
struct ScriptParty {
    owner: String,
    #[serde(default)]
    members: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ScriptEvent {
    Connect { player: PlayerId },
    Disconnect { player: PlayerId },
    Move { player: PlayerId, position: Position },
    Kill(KillEvent),
    Quest(QuestRewardExperienceEvent),
    Prestige(PrestigeCommand),
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let script = load_script(&self.script)?;
        let config = match &self.config {
            Some(path) => ConfigLoader::load(path)?,
            None => ConfigLoader::bundled()?,
        };

        let directory = Arc::new(build_directory(&script)?);
        let players: Vec<PlayerId> = script.players.iter().map(|player| player.id).collect();
        let engine = self.build_engine(config, directory.clone())?;

        println!(
            "{} {} ({} players, {} events)",
            style("Replaying").bold().cyan(),
            self.script.display(),
            players.len(),
            script.events.len()
        );
        println!();

        let summary = replay(&engine, &directory, &script.events)?;
        print_ledgers(&engine, &players)?;

        println!(
            "{} {} applied, {} rejected",
            style("Events:").bold(),
            summary.applied,
            summary.rejected
        );

        engine
            .shutdown()
            .context("Failed to flush ledgers on shutdown")?;
        Ok(())
    }

    fn build_engine(
        &self,
        config: ProgressionConfig,
        directory: Arc<InMemoryDirectory>,
    ) -> Result<ProgressionEngine> {
        let builder = ProgressionEngine::builder()
            .config(config)
            .shared_directory(directory);
        let builder = match &self.data_dir {
            Some(dir) => {
                let store = FileStore::new(dir)
                    .with_context(|| format!("Failed to open ledger store: {}", dir.display()))?;
                builder.store(store)
            }
            None => builder,
        };
        builder.build().context("Failed to build engine")
    }
}

fn load_script(path: &Path) -> Result<Script> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse script: {}", path.display()))
}

fn build_directory(script: &Script) -> Result<InMemoryDirectory> {
    let directory = InMemoryDirectory::new();

    for player in &script.players {
        let mut entry = PlayerEntry::new(player.name.clone(), Position::ORIGIN)
            .with_experience_log(player.experience_log);
        entry.position = player.position;
        if let Some(clan) = &player.clan {
            entry = entry.with_clan(clan.clone());
        }
        if let Some(weapon) = player.weapon {
            entry = entry.with_weapon(weapon);
        }
        if let Some(legacy) = player.legacy {
            entry = entry.with_legacy(legacy);
        }
        directory.upsert(player.id, entry);
    }

    for party in &script.parties {
        directory
            .parties()
            .create(&party.owner)
            .with_context(|| format!("Failed to create party of {}", party.owner))?;
        for member in &party.members {
            directory
                .parties()
                .add_member(&party.owner, member)
                .with_context(|| format!("Failed to add {} to {}'s party", member, party.owner))?;
        }
    }

    Ok(directory)
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ReplaySummary {
    applied: usize,
    rejected: usize,
}

/// Feed every event to the engine, printing notifications as they arrive.
///
/// Presence changes (connect, disconnect, move) go to the directory the
/// engine reads; they are not counted as engine events.
fn replay(
    engine: &ProgressionEngine,
    directory: &InMemoryDirectory,
    events: &[ScriptEvent],
) -> Result<ReplaySummary> {
    let mut receivers = engine.events().subscribe_multiple(&Topic::ALL);
    let mut summary = ReplaySummary::default();

    for (index, event) in events.iter().enumerate() {
        let accepted = match event {
            ScriptEvent::Connect { player } => {
                directory.set_connected(*player, true);
                engine
                    .on_player_connected(*player)
                    .with_context(|| format!("event {}: connect {}", index, player))?;
                continue;
            }
            ScriptEvent::Disconnect { player } => {
                directory.set_connected(*player, false);
                continue;
            }
            ScriptEvent::Move { player, position } => {
                directory.set_position(*player, *position);
                continue;
            }
            ScriptEvent::Kill(kill) => {
                let report = engine.handle_kill(kill);
                print_kill(index, kill, &report);
                !report.is_ignored() && report.failures().next().is_none()
            }
            ScriptEvent::Quest(quest) => {
                let outcome = engine.handle_quest_reward(quest);
                println!(
                    "  [{index:>3}] quest x{} for {}: {}",
                    quest.multiplier,
                    quest.player,
                    describe(&outcome)
                );
                !outcome.is_failed()
            }
            ScriptEvent::Prestige(command) => match engine.handle_prestige(command) {
                Ok(count) => {
                    println!(
                        "  [{index:>3}] prestige {} for {}: now {}",
                        command.track, command.player, count
                    );
                    true
                }
                Err(err) => {
                    println!(
                        "  [{index:>3}] prestige {} for {}: {}",
                        command.track,
                        command.player,
                        style(err).red()
                    );
                    false
                }
            },
        };

        if accepted {
            summary.applied += 1;
        } else {
            summary.rejected += 1;
        }

        for topic in Topic::ALL {
            if let Some(receiver) = receivers.get_mut(&topic) {
                while let Ok(event) = receiver.try_recv() {
                    print_event(&event);
                }
            }
        }
    }

    println!();
    Ok(summary)
}

fn print_kill(index: usize, kill: &KillEvent, report: &KillReport) {
    if let Some(reason) = report.ignored {
        println!(
            "  [{index:>3}] kill by {}: {}",
            kill.killer,
            style(format!("ignored ({reason:?})")).dim()
        );
        return;
    }

    println!(
        "  [{index:>3}] kill by {}: {} participant(s), group x{:.2}",
        kill.killer,
        report.participants.len(),
        report.group_multiplier
    );
    for credit in &report.credits {
        println!(
            "          {} {:<14} {}",
            credit.player,
            credit.track,
            describe(&credit.outcome)
        );
    }
}

fn describe(outcome: &CreditOutcome) -> String {
    match outcome {
        CreditOutcome::Credited(change) => format!(
            "+{:.1} xp (level {} -> {})",
            change.gained, change.before.level, change.after.level
        ),
        CreditOutcome::AlreadyAtCap => "at cap".to_string(),
        CreditOutcome::Failed(err) => style(err).red().to_string(),
    }
}

fn print_event(event: &Event) {
    let line = match event {
        Event::LevelUp(n) => format!(
            "{} {} reached {} level {}",
            style("LEVEL UP").green().bold(),
            n.player,
            n.track,
            n.new_level
        ),
        Event::ExperienceGained(n) => format!(
            "{} {} +{:.1} {} xp ({:.1}% to next)",
            style("xp").dim(),
            n.player,
            n.amount,
            n.track,
            n.progress_percent
        ),
        Event::PrestigeApplied(n) => format!(
            "{} {} prestiged {} to {} (stat bonus {:.3})",
            style("PRESTIGE").yellow().bold(),
            n.player,
            n.track,
            n.new_prestige_level,
            n.stat_bonus
        ),
    };
    println!("          {line}");
}

fn print_ledgers(engine: &ProgressionEngine, players: &[PlayerId]) -> Result<()> {
    println!("{}", style("=== Final ledgers ===").bold().green());

    for &player in players {
        println!("{}", style(format!("Player {player}")).bold());
        for track in TrackId::all() {
            let count = engine.prestige_count(player, track)?;
            let progression = if track.is_levelled() {
                Some(engine.progression(player, track)?)
            } else {
                None
            };
            let progressed = progression.is_some_and(|p| p.level > 0 || p.experience > 0.0);
            if !progressed && count == 0 {
                continue;
            }

            match progression {
                Some(p) => println!(
                    "  {:<14} level {:>3}  xp {:>12.1}  prestige {}",
                    track, p.level, p.experience, count
                ),
                None => println!("  {:<14} prestige {}", track, count),
            }
        }
    }

    println!();
    Ok(())
}
