//! Falling-block simulation kernel - pure, deterministic, and testable
//!
//! This crate contains the rules and state of a run. It has **no dependencies**
//! on rendering, input polling, networking or storage; those talk to it through
//! [`RunController::tick`] and the collaborator traits in [`external`].
//!
//! # Module Structure
//!
//! - [`shapes`]: spawn shapes and the two SRS wall kick tables
//! - [`rotation`]: cell rotation and kick candidate lookup
//! - [`board`]: occupancy grid with collision checks and line clearing
//! - [`piece`]: the active piece state machine and its step/move/lock timers
//! - [`run`]: spawn, lock, clear, score and game over orchestration
//! - [`stats`]: score, level tracker and per-kind spawn counts
//! - [`rng`]: uniform piece source and the local fallback generator
//! - [`external`]: piece source, stats sink and level-up notifier traits
//! - [`snapshot`]: read-only state handed to renderers
//! - [`config`]: kernel configuration and construction errors
//!
//! # Rules
//!
//! - **Uniform randomizer**: every spawn is an independent uniform draw, no bag
//! - **SRS rotation**: 5 kick candidates per transition, first legal one wins
//! - **Lock**: a resting piece locks at a forced step once it has been idle for
//!   the lock delay; hard drops lock immediately
//! - **Scoring**: +1 for a lock after a step, +2 for a hard drop lock
//! - **Levels**: one level per 2 cleared lines, counted line by line
//!
//! # Example
//!
//! ```
//! use tetraversus_core::{CommandBuffer, KernelConfig, RunController};
//! use tetraversus_core::types::{Command, PieceKind};
//!
//! let config = KernelConfig { seed: Some(7), ..KernelConfig::default() };
//! let mut run = RunController::builder(config)
//!     .piece_source(|| Some(PieceKind::O))
//!     .build()
//!     .unwrap();
//! run.start_run(0);
//!
//! let mut commands = CommandBuffer::new();
//! commands.push(Command::HardDrop);
//!
//! let snapshot = run.tick(16, 16, &commands);
//! assert_eq!(snapshot.score, 2); // hard drop lock
//! assert!(!snapshot.game_over);
//! ```

pub mod board;
pub mod config;
pub mod external;
pub mod piece;
pub mod rng;
pub mod rotation;
pub mod run;
pub mod shapes;
pub mod snapshot;
pub mod stats;

pub use tetraversus_types as types;

use arrayvec::ArrayVec;

// Re-export commonly used types for convenience
pub use board::{Board, Rect};
pub use config::{ConfigError, KernelConfig, Timing, MAX_BOARD_SIDE, MAX_TABLE_OFFSET};
pub use external::{LevelUpNotifier, NullSink, PieceSource, RunReport, StatsSink};
pub use piece::{Piece, PieceState};
pub use rng::{SimpleRng, UniformSource};
pub use rotation::{kick_row_index, next_orientation, rotate_cells, RotationSystem};
pub use run::{LockEvent, RunController, RunControllerBuilder};
pub use shapes::{KickRow, KickTable, PieceShape, ShapeTable};
pub use snapshot::{ActiveSnapshot, RenderSnapshot};
pub use stats::{lock_score, LevelTracker, LockCause, RunStats};

/// Commands a caller may queue for a single tick
pub const MAX_COMMANDS_PER_TICK: usize = 8;

/// Fixed-capacity per-tick command queue (no allocation on the input path)
pub type CommandBuffer = ArrayVec<types::Command, MAX_COMMANDS_PER_TICK>;
