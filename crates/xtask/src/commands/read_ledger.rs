//! Read and inspect persisted progression ledgers
//!
//! Loads level and prestige entries through the same file store the engine
//! writes with and displays them per track.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use serde::Serialize;
use std::path::PathBuf;

use progression_core::{PlayerId, TrackId};
use progression_runtime::{FileStore, ProgressionStore};

use crate::dirs;

/// Read and inspect persisted ledgers
#[derive(Parser)]
pub struct ReadLedger {
    /// Custom data directory (defaults to platform-specific location)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Only show one track (e.g. experience, exo, great_sword, rogue)
    #[arg(short, long, value_name = "TRACK")]
    track: Option<TrackId>,

    /// Only show one player
    #[arg(short, long, value_name = "ID")]
    player: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// One block per non-empty track
    Summary,
    /// Full JSON output
    Json,
}

#[derive(Serialize)]
struct TrackDump {
    track: String,
    levels: Vec<LevelRow>,
    prestiges: Vec<PrestigeRow>,
}

#[derive(Serialize)]
struct LevelRow {
    player: PlayerId,
    level: u32,
    experience: f64,
}

#[derive(Serialize)]
struct PrestigeRow {
    player: PlayerId,
    count: u32,
}

impl ReadLedger {
    pub fn execute(self) -> Result<()> {
        let data_dir = dirs::resolve_data_dir(self.data_dir.clone());
        if !data_dir.exists() {
            anyhow::bail!(
                "Data directory not found: {}\n\nHint: pass --data-dir or set {}",
                data_dir.display(),
                dirs::DATA_DIR_ENV
            );
        }

        let store = FileStore::new(&data_dir)
            .with_context(|| format!("Failed to open ledger store: {}", data_dir.display()))?;
        let dumps = self.collect(&store)?;

        match self.format {
            OutputFormat::Summary => {
                println!(
                    "{} {}",
                    style("Data Directory:").bold().cyan(),
                    data_dir.display()
                );
                println!();
                print_summary(&dumps);
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&dumps)
                    .context("Failed to serialize ledgers to JSON")?;
                println!("{}", json);
            }
        }

        Ok(())
    }

    fn collect(&self, store: &FileStore) -> Result<Vec<TrackDump>> {
        let tracks: Vec<TrackId> = match self.track {
            Some(track) => vec![track],
            None => TrackId::all().collect(),
        };
        let wanted = |player: &PlayerId| self.player.is_none_or(|id| player.0 == id);

        let mut dumps = Vec::new();
        for track in tracks {
            let levels = if track.is_levelled() {
                store
                    .load_levels(track)
                    .with_context(|| format!("Failed to load {} levels", track))?
                    .into_iter()
                    .filter(|(player, _)| wanted(player))
                    .map(|(player, progression)| LevelRow {
                        player,
                        level: progression.level,
                        experience: progression.experience,
                    })
                    .collect()
            } else {
                Vec::new()
            };

            let prestiges: Vec<PrestigeRow> = store
                .load_prestiges(track)
                .with_context(|| format!("Failed to load {} prestige", track))?
                .into_iter()
                .filter(|(player, _)| wanted(player))
                .map(|(player, count)| PrestigeRow { player, count })
                .collect();

            if !levels.is_empty() || prestiges.iter().any(|row| row.count > 0) {
                dumps.push(TrackDump {
                    track: track.to_string(),
                    levels,
                    prestiges,
                });
            }
        }

        Ok(dumps)
    }
}

fn print_summary(dumps: &[TrackDump]) {
    if dumps.is_empty() {
        println!("{}", style("No progression recorded").dim());
        return;
    }

    for dump in dumps {
        println!("{}", style(format!("=== {} ===", dump.track)).bold().green());

        for row in &dump.levels {
            println!(
                "  Player {:>20}  level {:>3}  xp {:>12.1}",
                row.player, row.level, row.experience
            );
        }
        for row in dump.prestiges.iter().filter(|row| row.count > 0) {
            println!(
                "  Player {:>20}  {}",
                row.player,
                style(format!("prestige {}", row.count)).yellow()
            );
        }
        println!();
    }
}
