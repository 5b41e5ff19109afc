use clap::Parser;
use grid_chase::board::Board;
use grid_chase::collisions::PlayerCollisions;
use grid_chase::constants::TICK_MS;
use grid_chase::engine::Level;
use grid_chase::game::MultiLevelGame;
use grid_chase::map_parser::{parse_file, parse_map, MapError};
use grid_chase::rng::Rng;
use grid_chase::scoring::{ConfigError, DefaultPointCalculator, ScoringConfig};
use grid_chase::types::{Direction, LevelSnapshot, RunState};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

const DEFAULT_MAX_TICKS: u64 = 60_000;

const DEFAULT_MAP: &[&str] = &[
    "#############",
    "#P....#.....#",
    "#.###.#.###.#",
    "#...........#",
    "#.###.#.###.#",
    "#.....#..B..#",
    "#####.#.#####",
    "#K..I...C...#",
    "#############",
];

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Map file; repeat to play several levels in order.
    #[arg(long = "map")]
    maps: Vec<PathBuf>,
    /// Comma separated player moves, one per tick (e.g. `E,E,S`).
    #[arg(long)]
    moves: Option<String>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    tick_ms: Option<u64>,
    #[arg(long)]
    max_ticks: Option<u64>,
    #[arg(long)]
    scoring: Option<PathBuf>,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum SimError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Scoring(#[from] ConfigError),
    #[error("unknown move `{0}`")]
    InvalidMove(String),
}

impl SimError {
    fn event(&self) -> &'static str {
        match self {
            Self::Map(_) => "map_invalid",
            Self::Scoring(_) => "scoring_invalid",
            Self::InvalidMove(_) => "moves_invalid",
        }
    }
}

#[derive(Clone, Debug, Default)]
struct PlayOutcome {
    ticks: u64,
    moves_applied: usize,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    seed: u32,
    outcome: String,
    score: i64,
    #[serde(rename = "levelsCleared")]
    levels_cleared: usize,
    #[serde(rename = "levelCount")]
    level_count: usize,
    ticks: u64,
    #[serde(rename = "movesRequested")]
    moves_requested: usize,
    #[serde(rename = "movesApplied")]
    moves_applied: usize,
    #[serde(rename = "finishedAtIso")]
    finished_at_iso: String,
    #[serde(rename = "finalLevel")]
    final_level: Option<LevelSnapshot>,
    #[serde(rename = "finalTiles")]
    final_tiles: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    timestamp: String,
    level: String,
    event: String,
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let seed = normalize_seed(cli.seed.unwrap_or_else(|| rand::random::<u32>() as u64));
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(seed, now_ms()));
    let tick_ms = cli.tick_ms.unwrap_or(TICK_MS).max(1);
    let max_ticks = cli.max_ticks.unwrap_or(DEFAULT_MAX_TICKS);

    let (levels, moves) = match prepare(&cli, seed) {
        Ok(setup) => setup,
        Err(error) => {
            emit_log(
                "error",
                error.event(),
                &run_id,
                None,
                json!({
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
    };

    emit_log(
        "info",
        "run_started",
        &run_id,
        None,
        json!({
            "seed": seed,
            "levelCount": levels.len(),
            "maps": cli.maps.iter().map(|path| path.to_string_lossy()).collect::<Vec<_>>(),
            "tickMs": tick_ms,
            "maxTicks": max_ticks,
            "moves": moves.len(),
        }),
    );

    let mut game = MultiLevelGame::new(levels);
    let outcome = play(&mut game, &moves, tick_ms, max_ticks, &run_id);
    let summary = build_run_summary(run_id.clone(), seed, &game, &outcome, moves.len());

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &run_id,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &run_id,
        Some(outcome.ticks),
        json!({
            "outcome": summary.outcome,
            "score": summary.score,
            "levelsCleared": summary.levels_cleared,
            "movesApplied": summary.moves_applied,
            "summaryOut": summary_out_written,
        }),
    );

    match serde_json::to_string(&summary) {
        Ok(line) => println!("{line}"),
        Err(error) => {
            emit_log(
                "error",
                "summary_encode_failed",
                &run_id,
                None,
                json!({
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
    }
}

fn prepare(cli: &Cli, seed: u32) -> Result<(Vec<Level>, Vec<Direction>), SimError> {
    let scoring = match cli.scoring.as_ref() {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };
    let moves = parse_moves(cli.moves.as_deref().unwrap_or(""))?;

    let boards = if cli.maps.is_empty() {
        vec![parse_map(DEFAULT_MAP)?]
    } else {
        cli.maps
            .iter()
            .map(|path| parse_file(path))
            .collect::<Result<Vec<_>, _>>()?
    };
    let levels = boards
        .into_iter()
        .enumerate()
        .map(|(index, board)| build_level(board, &scoring, seed.wrapping_add(index as u32)))
        .collect();
    Ok((levels, moves))
}

fn build_level(board: Board, scoring: &ScoringConfig, seed: u32) -> Level {
    Level::new(
        board,
        Box::new(PlayerCollisions),
        Box::new(DefaultPointCalculator::new(scoring.clone())),
        Box::new(Rng::new(seed)),
    )
}

fn parse_moves(text: &str) -> Result<Vec<Direction>, SimError> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            Direction::parse_move(token).ok_or_else(|| SimError::InvalidMove(token.to_string()))
        })
        .collect()
}

/// Applies at most one scripted move per tick, then advances the clock.
fn play(
    game: &mut MultiLevelGame,
    moves: &[Direction],
    tick_ms: u64,
    max_ticks: u64,
    run_id: &str,
) -> PlayOutcome {
    let mut outcome = PlayOutcome::default();
    let mut pending = moves.iter();
    let mut level_index = game.current_index();
    game.start();

    while outcome.ticks < max_ticks && !game.is_finished() {
        outcome.ticks += 1;
        if let Some(direction) = pending.next() {
            if game.move_player(*direction) {
                outcome.moves_applied += 1;
            }
        }
        game.tick(tick_ms);

        if game.current_index() != level_index {
            level_index = game.current_index();
            emit_log(
                "info",
                "level_advanced",
                run_id,
                Some(outcome.ticks),
                json!({
                    "level": level_index + 1,
                    "score": game.score(),
                }),
            );
        }
    }
    outcome
}

fn outcome_key(outcome: Option<RunState>) -> &'static str {
    match outcome {
        Some(RunState::Won) => "won",
        Some(RunState::Lost) => "lost",
        _ => "unfinished",
    }
}

fn default_run_id(seed: u32, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn build_run_summary(
    run_id: String,
    seed: u32,
    game: &MultiLevelGame,
    outcome: &PlayOutcome,
    moves_requested: usize,
) -> RunSummary {
    let result = game.outcome();
    let levels_cleared = if result == Some(RunState::Won) {
        game.level_count()
    } else {
        game.current_index()
    };
    RunSummary {
        run_id,
        seed,
        outcome: outcome_key(result).to_string(),
        score: game.score(),
        levels_cleared,
        level_count: game.level_count(),
        ticks: outcome.ticks,
        moves_requested,
        moves_applied: outcome.moves_applied,
        finished_at_iso: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        final_level: game.level().map(Level::snapshot),
        final_tiles: game
            .level()
            .map(|level| level.board().to_tiles())
            .unwrap_or_default(),
    }
}

fn emit_log(level: &str, event: &str, run_id: &str, tick: Option<u64>, details: Value) {
    let log_line = StructuredLogLine {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        level: level.to_string(),
        event: event.to_string(),
        run_id: run_id.to_string(),
        tick,
        details,
    };
    if let Ok(line) = serde_json::to_string(&log_line) {
        eprintln!("{line}");
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, summary_text)
}
