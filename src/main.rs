//! Headless runner (default binary).
//!
//! Plays complete runs on a simulated clock with a greedy placement policy and
//! forwards each finished run's statistics to stdout as a JSON line.
//!
//! Usage: `tetraversus [RUNS]` (default 1, see `--help`). Logging goes to
//! stderr, level from `TETRAVERSUS_LOG` (error, warn, info, debug, trace;
//! default info).

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter, Log, Metadata, Record};

use tetraversus::adapter::{level_up_channel, SubmissionRuntime};
use tetraversus::core::{
    Board, CommandBuffer, KernelConfig, NullSink, Piece, RotationSystem, RunController,
};
use tetraversus::types::{Cell, Command, RotationDirection, TICK_MS};

/// Ticks after which a run is ended even if the stack never tops out
const MAX_TICKS_PER_RUN: u64 = 500_000;

/// Ticks a single piece may spend steering before it is hard-dropped
const MAX_TICKS_PER_PIECE: u32 = 120;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of runs to play back to back
    #[arg(default_value_t = 1)]
    runs: u32,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(
                std::io::stderr(),
                "[{:>5}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

fn set_log_level(level: Option<&str>) {
    let filter = match level.map(str::trim) {
        Some(l) if l.eq_ignore_ascii_case("off") => LevelFilter::Off,
        Some(l) if l.eq_ignore_ascii_case("error") => LevelFilter::Error,
        Some(l) if l.eq_ignore_ascii_case("warn") => LevelFilter::Warn,
        Some(l) if l.eq_ignore_ascii_case("debug") => LevelFilter::Debug,
        Some(l) if l.eq_ignore_ascii_case("trace") => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    log::set_max_level(filter);
}

fn main() -> Result<()> {
    let args = Args::parse();
    log::set_logger(&LOGGER).map_err(|e| anyhow::anyhow!("install logger: {e}"))?;
    set_log_level(std::env::var("TETRAVERSUS_LOG").ok().as_deref());

    let config = KernelConfig::from_env().context("kernel configuration")?;
    let submissions = SubmissionRuntime::start_from_env()?;
    let (notifier, mut level_ups) = level_up_channel();

    let builder = RunController::builder(config).level_up_notifier(notifier);
    let (mut run, forwarder) = match submissions {
        Some((forwarder, sink)) => (builder.stats_sink(sink).build()?, Some(forwarder)),
        None => (builder.stats_sink(NullSink).build()?, None),
    };

    let mut now: u64 = 0;
    for _ in 0..args.runs {
        run.start_run(now);
        now = play(&mut run, now);
        while let Ok(level) = level_ups.try_recv() {
            info!("reached level {}", level);
        }
    }

    // Dropping the controller drops the sink and lets the forwarder drain.
    drop(run);
    if let Some(forwarder) = forwarder {
        forwarder.finish()?;
    }
    Ok(())
}

/// Play until game over; returns the clock at the end
fn play(run: &mut RunController, mut now: u64) -> u64 {
    let mut plan: Option<Plan> = None;
    let mut spawned = 0u32;
    let mut piece_ticks = 0u32;
    let mut commands = CommandBuffer::new();

    for _ in 0..MAX_TICKS_PER_RUN {
        if run.is_game_over() {
            return now;
        }

        let total: u32 = run.stats().piece_counts().iter().sum();
        if total != spawned {
            spawned = total;
            piece_ticks = 0;
            plan = run
                .active()
                .and_then(|piece| best_plan(run.board(), run.rotation_system(), piece));
        }
        piece_ticks += 1;

        commands.clear();
        if let (Some(piece), Some(target)) = (run.active(), plan) {
            if let Some(command) = next_command(piece, target, piece_ticks) {
                commands.push(command);
            }
        }

        now += TICK_MS as u64;
        run.tick(now, TICK_MS, &commands);
    }

    info!("run {} hit the tick limit", run.run_id());
    run.game_over();
    now
}

/// Placement target for the current piece
#[derive(Debug, Clone, Copy)]
struct Plan {
    orientation: u8,
    x: i8,
}

fn next_command(piece: &Piece, target: Plan, piece_ticks: u32) -> Option<Command> {
    if piece_ticks > MAX_TICKS_PER_PIECE {
        return Some(Command::HardDrop);
    }
    if piece.orientation() != target.orientation {
        return Some(Command::RotateCw);
    }
    let x = piece.position().x;
    if x == target.x {
        Some(Command::HardDrop)
    } else if !piece.can_accept_move() {
        None
    } else if x < target.x {
        Some(Command::MoveRight)
    } else {
        Some(Command::MoveLeft)
    }
}

/// Try every orientation and column on a scratch board and keep the best
fn best_plan(board: &Board, rotation: &RotationSystem, piece: &Piece) -> Option<Plan> {
    let mut best: Option<(i32, Plan)> = None;

    for turns in 0..4 {
        let mut turned = piece.clone();
        let mut ok = true;
        for _ in 0..turns {
            ok &= turned.try_rotate(board, rotation, RotationDirection::Clockwise);
        }
        if !ok {
            continue;
        }

        for dir in [Cell::LEFT, Cell::RIGHT] {
            let mut shifted = turned.clone();
            loop {
                let plan = Plan {
                    orientation: shifted.orientation(),
                    x: shifted.position().x,
                };
                let mut dropped = shifted.clone();
                dropped.hard_drop(board);

                let mut scratch = board.clone();
                scratch.commit(dropped.cells(), dropped.position(), dropped.kind());
                let score = evaluate(&mut scratch);
                if best.map_or(true, |(s, _)| score > s) {
                    best = Some((score, plan));
                }

                if !shifted.try_move(board, dir) {
                    break;
                }
            }
        }
    }

    best.map(|(_, plan)| plan)
}

/// Higher is better: reward cleared lines, punish height, holes and bumpiness
fn evaluate(board: &mut Board) -> i32 {
    let lines = board.clear_full_lines() as i32;
    let bounds = board.bounds();

    let mut heights = Vec::with_capacity(bounds.width as usize);
    let mut holes = 0;
    for x in bounds.x_min..bounds.x_max() {
        let mut height = 0;
        let mut seen_block = false;
        for y in (bounds.y_min..bounds.y_max()).rev() {
            if board.is_occupied(Cell::new(x, y)) {
                if !seen_block {
                    height = (y - bounds.y_min + 1) as i32;
                    seen_block = true;
                }
            } else if seen_block {
                holes += 1;
            }
        }
        heights.push(height);
    }

    let aggregate: i32 = heights.iter().sum();
    let bumpiness: i32 = heights.windows(2).map(|w| (w[0] - w[1]).abs()).sum();
    let max_height = heights.iter().copied().max().unwrap_or(0);

    lines * 8 - aggregate - holes * 6 - bumpiness - max_height * 2
}
