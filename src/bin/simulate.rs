use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use maze_chase_core::constants::{next_level, DEFAULT_FRAME_DELTA};
use maze_chase_core::engine::{EngineOptions, GameEngine};
use maze_chase_core::grid::Grid;
use maze_chase_core::layout;
use maze_chase_core::score_store::ScoreStore;
use maze_chase_core::types::{Difficulty, GameEvent, Outcome, SessionSummary};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Ten minutes of play at 60 frames per second.
const DEFAULT_FRAME_BUDGET: u64 = 60 * 60 * 10;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    difficulty: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Frame budget for the whole run.
    #[arg(long, default_value_t = DEFAULT_FRAME_BUDGET)]
    frames: u64,
    /// Directory holding `level{n}.csv` layouts.
    #[arg(long)]
    levels_dir: Option<PathBuf>,
    #[arg(long)]
    endless: bool,
    /// High-score file to record the final score in.
    #[arg(long)]
    scores: Option<PathBuf>,
    #[arg(long, default_value = "CPU")]
    name: String,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
struct LevelResultLine {
    level: u32,
    seed: u64,
    outcome: Option<Outcome>,
    frames: u64,
    score: u32,
    #[serde(rename = "tokensCollected")]
    tokens_collected: u32,
    #[serde(rename = "tokensTotal")]
    tokens_total: u32,
    #[serde(rename = "powerPellets")]
    power_pellets: u32,
    captures: u32,
    bonuses: u32,
}

impl LevelResultLine {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PowerPelletCollected { .. } => self.power_pellets += 1,
            GameEvent::AdversaryCaptured { .. } => self.captures += 1,
            GameEvent::BonusCollected { .. } => self.bonuses += 1,
            _ => {}
        }
    }
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    seed: u64,
    difficulty: Difficulty,
    #[serde(rename = "startedAt")]
    started_at: String,
    #[serde(rename = "finishedAt")]
    finished_at: String,
    #[serde(rename = "levelCount")]
    level_count: usize,
    #[serde(rename = "highScoreRank")]
    high_score_rank: Option<usize>,
    session: SessionSummary,
    levels: Vec<LevelResultLine>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let difficulty = resolve_difficulty(cli.difficulty.as_deref());
    let seed = cli.seed.unwrap_or_else(rand::random::<u64>);
    let started_at = now_rfc3339();
    info!(seed, ?difficulty, level = cli.level, endless = cli.endless, "run_started");

    let mut engine = GameEngine::new(
        load_grid(cli.levels_dir.as_deref(), cli.level),
        EngineOptions {
            difficulty,
            seed,
            level: cli.level,
            endless: cli.endless,
        },
    );

    let mut frames_left = cli.frames;
    let mut levels = Vec::new();
    loop {
        info!(level = engine.level(), frames_left, "level_started");
        let result = run_level(&mut engine, seed, &mut frames_left);
        info!(
            level = result.level,
            outcome = ?result.outcome,
            frames = result.frames,
            score = result.score,
            "level_finished"
        );
        println!(
            "{}",
            serde_json::to_string(&result).context("failed to serialize level result")?
        );
        levels.push(result);

        if !cli.endless || engine.outcome() != Some(Outcome::Victory) || frames_left == 0 {
            break;
        }
        let next = next_level(engine.level());
        engine.advance_level(load_grid(cli.levels_dir.as_deref(), next));
    }

    let session = engine.build_summary();
    let high_score_rank = match cli.scores.as_ref() {
        Some(path) => record_score(path, &cli.name, session.score)?,
        None => None,
    };

    let summary = RunSummary {
        seed,
        difficulty,
        started_at,
        finished_at: now_rfc3339(),
        level_count: levels.len(),
        high_score_rank,
        session,
        levels,
    };

    if let Some(path) = cli.summary_out.as_ref() {
        write_summary(path, &summary)?;
    }

    info!(
        outcome = ?summary.session.outcome,
        score = summary.session.score,
        levels_cleared = summary.session.levels_cleared,
        high_score_rank = ?summary.high_score_rank,
        "run_finished"
    );
    Ok(())
}

/// Drives the engine with autopilot input until the level ends or the frame
/// budget runs out.
fn run_level(engine: &mut GameEngine, seed: u64, frames_left: &mut u64) -> LevelResultLine {
    let start_tick = engine.tick();
    let mut result = LevelResultLine {
        level: engine.level(),
        seed,
        ..LevelResultLine::default()
    };

    while !engine.is_ended() && *frames_left > 0 {
        let input = engine.autopilot_direction();
        engine.step(DEFAULT_FRAME_DELTA, input);
        *frames_left -= 1;
        let snapshot = engine.build_snapshot(true);
        for event in &snapshot.events {
            result.record(event);
        }
    }

    let session = engine.session();
    result.outcome = engine.outcome();
    result.frames = engine.tick() - start_tick;
    result.score = session.score();
    result.tokens_collected = session.tokens_collected();
    result.tokens_total = session.tokens_total();
    result
}

fn resolve_difficulty(value: Option<&str>) -> Difficulty {
    match value {
        None => Difficulty::Medium,
        Some(raw) => Difficulty::parse(raw).unwrap_or_else(|| {
            warn!(difficulty = raw, "unknown difficulty, using medium");
            Difficulty::Medium
        }),
    }
}

fn load_grid(levels_dir: Option<&Path>, level: u32) -> Grid {
    match levels_dir {
        Some(dir) => layout::load_level(dir, level),
        None => Grid::default_layout(),
    }
}

fn record_score(path: &Path, name: &str, score: u32) -> Result<Option<usize>> {
    let mut store = ScoreStore::new(path.to_path_buf());
    if !store.qualifies(score) {
        return Ok(None);
    }
    store
        .record(name, score)
        .with_context(|| format!("failed to record score in {}", path.display()))
}

fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let summary_text =
        serde_json::to_string_pretty(summary).context("failed to serialize run summary")?;
    std::fs::write(path, summary_text)
        .with_context(|| format!("failed to write summary: {}", path.display()))
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(label: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("maze-chase-{label}-{now}"))
    }

    fn make_summary() -> RunSummary {
        let mut engine = GameEngine::new(Grid::default_layout(), EngineOptions::default());
        RunSummary {
            seed: 0,
            difficulty: Difficulty::Medium,
            started_at: now_rfc3339(),
            finished_at: now_rfc3339(),
            level_count: 1,
            high_score_rank: None,
            session: engine.build_summary(),
            levels: vec![run_level(&mut engine, 0, &mut 10)],
        }
    }

    #[test]
    fn unknown_difficulty_falls_back_to_medium() {
        assert_eq!(resolve_difficulty(None), Difficulty::Medium);
        assert_eq!(resolve_difficulty(Some("crazy")), Difficulty::Crazy);
        assert_eq!(resolve_difficulty(Some("nightmare")), Difficulty::Medium);
    }

    #[test]
    fn run_level_stops_at_frame_budget() {
        let mut engine = GameEngine::new(Grid::default_layout(), EngineOptions::default());
        let mut frames_left = 30;
        let result = run_level(&mut engine, 7, &mut frames_left);
        assert_eq!(frames_left, 0);
        assert_eq!(result.frames, 30);
        assert_eq!(result.seed, 7);
        assert_eq!(result.level, 1);
        assert_eq!(result.outcome, None);
        assert_eq!(result.tokens_total, engine.session().tokens_total());
    }

    #[test]
    fn level_result_counts_selected_events() {
        let mut result = LevelResultLine::default();
        result.record(&GameEvent::BonusCollected { points: 200 });
        result.record(&GameEvent::AdversaryCaptured {
            adversary_id: "adversary_1".to_string(),
            points: 400,
        });
        result.record(&GameEvent::PelletCollected { row: 1, col: 1 });
        assert_eq!(result.bonuses, 1);
        assert_eq!(result.captures, 1);
        assert_eq!(result.power_pellets, 0);
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let target = unique_temp_dir("missing").join("summary.json");
        assert!(write_summary(&target, &make_summary()).is_err());
    }

    #[test]
    fn record_score_creates_table() {
        let path = unique_temp_dir("scores").with_extension("json");
        let rank = record_score(&path, "abc", 120).expect("score recorded");
        assert_eq!(rank, Some(0));
        let store = ScoreStore::new(path.clone());
        assert_eq!(store.entries()[0].name, "ABC");
        let _ = std::fs::remove_file(path);
    }
}
