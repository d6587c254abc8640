//! Piece state machine - the active falling piece and its timers
//!
//! A piece is `Falling` until it locks. Moves and rotations are instantaneous
//! transitions within `Falling`; invalid ones are silent no-ops. The piece never
//! owns the board, every operation borrows it.
//!
//! Timers (all milliseconds against the externally supplied clock):
//! - `step_time`: next forced downward step, pushed to `now + step_delay` on spawn,
//!   on every forced step and on every successful soft drop
//! - `move_time`: lateral/soft-drop commands are ignored until `now > move_time`,
//!   pushed to `now + move_delay` after every successful move. The gate is read
//!   once per tick, so a soft drop and a lateral move can share a tick
//! - `lock_time`: idle time since the last successful move, reset to 0 on every
//!   successful move and grown by the elapsed time each tick

use crate::board::Board;
use crate::config::Timing;
use crate::rotation::{next_orientation, rotate_cells, RotationSystem};
use crate::shapes::PieceShape;
use crate::stats::LockCause;
use crate::types::{Cell, Command, PieceKind, RotationDirection};

/// Lifecycle of a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceState {
    Falling,
    Locked(LockCause),
}

/// The active falling piece
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    kind: PieceKind,
    /// Cells relative to `position`, in the current orientation
    cells: PieceShape,
    position: Cell,
    orientation: u8,
    timing: Timing,
    /// Latest clock value seen
    now_ms: u64,
    step_time_ms: u64,
    move_time_ms: u64,
    lock_time_ms: u32,
    /// Move gate latched by `begin_tick`
    moves_open: bool,
    state: PieceState,
}

impl Piece {
    /// Create a piece at `position` with spawn orientation, timers relative to `now_ms`
    pub fn spawn(
        kind: PieceKind,
        rotation: &RotationSystem,
        position: Cell,
        timing: Timing,
        now_ms: u64,
    ) -> Self {
        Self {
            kind,
            cells: rotation.spawn_shape(kind),
            position,
            orientation: 0,
            timing,
            now_ms,
            step_time_ms: now_ms + timing.step_delay_ms as u64,
            move_time_ms: now_ms + timing.move_delay_ms as u64,
            lock_time_ms: 0,
            moves_open: false,
            state: PieceState::Falling,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Cells relative to the anchor
    pub fn cells(&self) -> &PieceShape {
        &self.cells
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    /// Orientation index in 0..4
    pub fn orientation(&self) -> u8 {
        self.orientation
    }

    pub fn state(&self) -> PieceState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, PieceState::Locked(_))
    }

    pub fn lock_cause(&self) -> Option<LockCause> {
        match self.state {
            PieceState::Locked(cause) => Some(cause),
            PieceState::Falling => None,
        }
    }

    pub fn step_time_ms(&self) -> u64 {
        self.step_time_ms
    }

    pub fn move_time_ms(&self) -> u64 {
        self.move_time_ms
    }

    pub fn lock_time_ms(&self) -> u32 {
        self.lock_time_ms
    }

    /// Board-absolute cells
    pub fn absolute_cells(&self) -> PieceShape {
        self.cells.map(|cell| cell + self.position)
    }

    /// Check if the piece fits where it currently is
    pub fn fits(&self, board: &Board) -> bool {
        board.is_valid(&self.cells, self.position)
    }

    /// Try to translate the piece by `delta`
    pub fn try_move(&mut self, board: &Board, delta: Cell) -> bool {
        if self.is_locked() {
            return false;
        }
        let Some(candidate) = self.position.checked_add(delta) else {
            return false;
        };
        if !board.is_valid(&self.cells, candidate) {
            return false;
        }

        self.position = candidate;
        self.move_time_ms = self.now_ms + self.timing.move_delay_ms as u64;
        self.lock_time_ms = 0;
        true
    }

    /// Try to rotate with wall kicks
    ///
    /// Candidates are tried in table order, the first that fits wins (so an
    /// unkicked rotation is kept whenever it is legal). If none fits the piece is
    /// left exactly as it was.
    pub fn try_rotate(
        &mut self,
        board: &Board,
        rotation: &RotationSystem,
        direction: RotationDirection,
    ) -> bool {
        if self.is_locked() {
            return false;
        }

        let saved_cells = self.cells;
        let saved_orientation = self.orientation;

        self.orientation = next_orientation(self.orientation, direction);
        self.cells = rotate_cells(self.kind, &saved_cells, direction);

        let kicks = rotation.kick_candidates(self.kind, saved_orientation, direction);
        for &kick in kicks {
            if self.try_move(board, kick) {
                return true;
            }
        }

        self.orientation = saved_orientation;
        self.cells = saved_cells;
        false
    }

    /// Advance the clock: record `now_ms`, grow the lock timer and latch the
    /// move gate for this tick
    pub fn begin_tick(&mut self, now_ms: u64, elapsed_ms: u32) {
        self.now_ms = now_ms;
        self.lock_time_ms = self.lock_time_ms.saturating_add(elapsed_ms);
        self.moves_open = self.can_accept_move();
    }

    /// Forced step, if due
    ///
    /// When `now > step_time` the piece tries to move down one row and the step
    /// timer is pushed back. A piece that has been idle for at least the lock
    /// delay at that point locks. Returns true if it locked.
    pub fn step(&mut self, board: &Board) -> bool {
        if self.is_locked() || self.now_ms <= self.step_time_ms {
            return false;
        }

        self.step_time_ms = self.now_ms + self.timing.step_delay_ms as u64;
        self.try_move(board, Cell::DOWN);

        if self.lock_time_ms >= self.timing.lock_delay_ms {
            self.state = PieceState::Locked(LockCause::Step);
            return true;
        }
        false
    }

    /// Full tick without commands: clock update followed by the forced step
    pub fn tick(&mut self, board: &Board, now_ms: u64, elapsed_ms: u32) -> bool {
        self.begin_tick(now_ms, elapsed_ms);
        self.step(board)
    }

    /// Drop as far as possible and lock unconditionally. Returns rows dropped.
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        if self.is_locked() {
            return 0;
        }
        let mut distance = 0;
        while self.try_move(board, Cell::DOWN) {
            distance += 1;
        }
        self.state = PieceState::Locked(LockCause::HardDrop);
        distance
    }

    /// Soft drop: one row down, postponing the next forced step on success
    pub fn soft_drop(&mut self, board: &Board) -> bool {
        if self.try_move(board, Cell::DOWN) {
            self.step_time_ms = self.now_ms + self.timing.step_delay_ms as u64;
            return true;
        }
        false
    }

    /// Whether the move delay has expired at the latest clock value
    pub fn can_accept_move(&self) -> bool {
        self.now_ms > self.move_time_ms
    }

    /// Apply a discrete command; returns true if the piece changed
    ///
    /// Lateral moves and soft drops go through the gate latched at the start of
    /// the tick. Rotations and hard drops are never gated.
    pub fn apply(&mut self, board: &Board, rotation: &RotationSystem, command: Command) -> bool {
        if command.is_move() && !self.moves_open {
            return false;
        }

        match command {
            Command::MoveLeft => self.try_move(board, Cell::LEFT),
            Command::MoveRight => self.try_move(board, Cell::RIGHT),
            Command::SoftDrop => self.soft_drop(board),
            Command::HardDrop => {
                self.hard_drop(board);
                true
            }
            Command::RotateCw => self.try_rotate(board, rotation, RotationDirection::Clockwise),
            Command::RotateCcw => {
                self.try_rotate(board, rotation, RotationDirection::CounterClockwise)
            }
        }
    }
}
