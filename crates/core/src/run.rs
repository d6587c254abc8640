//! Run controller - spawn, tick, lock, clear, score and game over
//!
//! The controller owns the board, the active piece and the run statistics. It is
//! advanced only by [`RunController::tick`], which is handed the external clock
//! and the commands polled since the previous tick.
//!
//! Order of work inside one tick:
//! 1. the active piece records `now` and grows its lock timer
//! 2. commands are applied in order; a command that locks the piece resolves the
//!    lock immediately and the remaining commands act on the next piece
//! 3. the forced step runs if due and may lock the piece
//!
//! Collaborators (piece source, stats sink, level-up notifier) are called
//! synchronously and must not block.

use log::{debug, info, warn};

use crate::board::Board;
use crate::config::{ConfigError, KernelConfig};
use crate::external::{LevelUpNotifier, NullSink, PieceSource, RunReport, StatsSink};
use crate::piece::Piece;
use crate::rng::{SimpleRng, UniformSource};
use crate::rotation::RotationSystem;
use crate::snapshot::{ActiveSnapshot, RenderSnapshot};
use crate::stats::{LockCause, RunStats};
use crate::types::{Command, PieceKind};

/// What happened at the last lock (consumed by observers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub cause: LockCause,
    pub lines_cleared: u32,
    pub level_ups: u32,
}

/// Builder for [`RunController`]
pub struct RunControllerBuilder {
    config: KernelConfig,
    rotation: RotationSystem,
    source: Option<Box<dyn PieceSource>>,
    sink: Option<Box<dyn StatsSink>>,
    notifier: Option<Box<dyn LevelUpNotifier>>,
}

impl RunControllerBuilder {
    /// Replace the default uniform source
    pub fn piece_source(mut self, source: impl PieceSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn stats_sink(mut self, sink: impl StatsSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn level_up_notifier(mut self, notifier: impl LevelUpNotifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Use custom shape/kick tables (validated with [`RotationSystem::try_from_rows`])
    pub fn rotation_system(mut self, rotation: RotationSystem) -> Self {
        self.rotation = rotation;
        self
    }

    /// Validate the configuration and assemble the controller
    pub fn build(self) -> Result<RunController, ConfigError> {
        self.config.validate()?;

        let source: Box<dyn PieceSource> = match self.source {
            Some(source) => source,
            None => match self.config.seed {
                Some(seed) => Box::new(UniformSource::seeded(seed)),
                None => Box::new(UniformSource::from_os()),
            },
        };
        let fallback_seed = match self.config.seed {
            Some(seed) => (seed ^ (seed >> 32)) as u32,
            None => rand::random(),
        };

        Ok(RunController {
            board: Board::with_size(self.config.board_width, self.config.board_height),
            rotation: self.rotation,
            active: None,
            stats: RunStats::new(self.config.lines_per_level),
            source,
            fallback: SimpleRng::new(fallback_seed),
            sink: self.sink.unwrap_or_else(|| Box::new(NullSink)),
            notifier: self.notifier,
            run_id: 0,
            game_over: false,
            last_event: None,
            snapshot: RenderSnapshot::default(),
            config: self.config,
        })
    }
}

/// Drives one run at a time over an owned board
pub struct RunController {
    config: KernelConfig,
    board: Board,
    rotation: RotationSystem,
    active: Option<Piece>,
    stats: RunStats,
    source: Box<dyn PieceSource>,
    /// Used when `source` has nothing to give
    fallback: SimpleRng,
    sink: Box<dyn StatsSink>,
    notifier: Option<Box<dyn LevelUpNotifier>>,
    /// Monotonic run id (increments on every `start_run`)
    run_id: u32,
    game_over: bool,
    last_event: Option<LockEvent>,
    snapshot: RenderSnapshot,
}

impl RunController {
    pub fn builder(config: KernelConfig) -> RunControllerBuilder {
        RunControllerBuilder {
            config,
            rotation: RotationSystem::srs(),
            source: None,
            sink: None,
            notifier: None,
        }
    }

    /// Controller with the default collaborators
    pub fn new(config: KernelConfig) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    /// Start a fresh run and spawn its first piece
    ///
    /// A run still in progress is ended first, so its report is submitted.
    pub fn start_run(&mut self, now_ms: u64) {
        if self.in_progress() {
            self.game_over();
        }

        self.board.reset();
        self.stats.reset();
        self.active = None;
        self.last_event = None;
        self.game_over = false;
        self.run_id = self.run_id.wrapping_add(1);
        info!("run {} started", self.run_id);

        self.spawn(now_ms);
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[doc(hidden)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn rotation_system(&self) -> &RotationSystem {
        &self.rotation
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn run_id(&self) -> u32 {
        self.run_id
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// A run has been started and has not ended
    pub fn in_progress(&self) -> bool {
        self.run_id > 0 && !self.game_over
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Draw the next kind and place it at the spawn anchor
    ///
    /// The kind is counted even when it does not fit. Returns false if the spawn
    /// was blocked, in which case the run is over. Any active piece is replaced.
    pub fn spawn(&mut self, now_ms: u64) -> bool {
        if !self.in_progress() {
            return false;
        }

        let kind = match self.source.next_piece_kind() {
            Some(kind) => kind,
            None => {
                warn!("piece source unavailable, drawing from fallback generator");
                self.fallback.next_piece_kind()
            }
        };
        self.stats.record_spawn(kind);

        let piece = Piece::spawn(
            kind,
            &self.rotation,
            self.config.spawn_position,
            self.config.timing,
            now_ms,
        );
        if !piece.fits(&self.board) {
            info!("spawn of {:?} blocked", kind);
            self.active = None;
            self.game_over();
            return false;
        }

        debug!("spawned {:?} at {:?}", kind, piece.position());
        self.active = Some(piece);
        true
    }

    /// End the current run
    ///
    /// Clears the board, submits the final statistics and resets score and
    /// level. Per-kind counts and the line total stay readable until the next
    /// run starts. Does nothing if no run is in progress.
    pub fn game_over(&mut self) {
        if !self.in_progress() {
            return;
        }

        self.active = None;
        self.board.reset();

        let report = self.report();
        info!(
            "run {} over: score {} level {} rows {}",
            report.run_id, report.score, report.level, report.rows_cleared
        );
        self.sink.submit(&report);

        self.stats.reset_progress();
        self.game_over = true;
    }

    /// Statistics of the current run in submission form
    pub fn report(&self) -> RunReport {
        RunReport {
            run_id: self.run_id,
            score: self.stats.score(),
            level: self.stats.level(),
            rows_cleared: self.stats.lines_cleared(),
            piece_counts: self.stats.piece_counts(),
        }
    }

    /// Commit the locked piece, clear lines, score and spawn the next piece
    fn on_lock(&mut self, now_ms: u64) {
        let Some(piece) = self.active.take() else {
            return;
        };
        let cause = piece.lock_cause().unwrap_or(LockCause::Step);

        self.board.commit(piece.cells(), piece.position(), piece.kind());
        self.stats.record_lock(cause);

        let lines_cleared = self.board.clear_full_lines();
        let mut level_ups = 0;
        for _ in 0..lines_cleared {
            if self.stats.record_line() {
                level_ups += 1;
                let level = self.stats.level();
                info!("level up: {}", level);
                if let Some(notifier) = self.notifier.as_mut() {
                    notifier.level_up(level);
                }
            }
        }

        debug!(
            "locked {:?} ({:?}), cleared {} line(s)",
            piece.kind(),
            cause,
            lines_cleared
        );
        self.last_event = Some(LockEvent {
            kind: piece.kind(),
            cause,
            lines_cleared,
            level_ups,
        });

        self.spawn(now_ms);
    }

    /// Advance the run to `now_ms`
    ///
    /// `elapsed_ms` is the time since the previous tick. Commands are applied in
    /// order before the forced step. Returns the refreshed snapshot.
    pub fn tick(&mut self, now_ms: u64, elapsed_ms: u32, commands: &[Command]) -> &RenderSnapshot {
        if let Some(piece) = self.active.as_mut() {
            piece.begin_tick(now_ms, elapsed_ms);
        }

        for &command in commands {
            let Some(piece) = self.active.as_mut() else {
                break;
            };
            piece.apply(&self.board, &self.rotation, command);
            if piece.is_locked() {
                self.on_lock(now_ms);
            }
        }

        if let Some(piece) = self.active.as_mut() {
            if piece.step(&self.board) {
                self.on_lock(now_ms);
            }
        }

        let mut snapshot = std::mem::take(&mut self.snapshot);
        self.snapshot_into(&mut snapshot);
        self.snapshot = snapshot;
        &self.snapshot
    }

    /// Write the current state into `out`, reusing its allocation
    pub fn snapshot_into(&self, out: &mut RenderSnapshot) {
        out.copy_board(&self.board);
        out.active = self.active.as_ref().map(ActiveSnapshot::from);
        out.run_id = self.run_id;
        out.game_over = self.game_over;
        out.score = self.stats.score();
        out.level = self.stats.level();
        out.lines_cleared = self.stats.lines_cleared();
        out.piece_counts = self.stats.piece_counts();
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let mut s = RenderSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
