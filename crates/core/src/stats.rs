//! Run statistics - score, level progression and per-kind piece counts
//!
//! Scoring is per lock event, not per row:
//! - a lock reached through a forced (or soft) downward step awards [`SOFT_DROP_BONUS`]
//! - a lock caused by a hard drop awards [`HARD_DROP_BONUS`]
//!
//! Levels advance once every `lines_per_level` cleared lines, counted one line at
//! a time regardless of how many rows a single clear removed.

use crate::types::{PieceKind, HARD_DROP_BONUS, LINES_PER_LEVEL, SOFT_DROP_BONUS, START_LEVEL};

/// How a piece came to lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockCause {
    /// Forced step found the piece idle for at least the lock delay
    Step,
    /// Hard drop, locks immediately
    HardDrop,
}

/// Points awarded for a lock
pub fn lock_score(cause: LockCause) -> u32 {
    match cause {
        LockCause::Step => SOFT_DROP_BONUS,
        LockCause::HardDrop => HARD_DROP_BONUS,
    }
}

/// Counts cleared lines toward the next level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTracker {
    level: u32,
    lines_toward_next: u32,
    lines_per_level: u32,
}

impl LevelTracker {
    pub fn new(lines_per_level: u32) -> Self {
        Self {
            level: START_LEVEL,
            lines_toward_next: 0,
            lines_per_level: lines_per_level.max(1),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines_toward_next(&self) -> u32 {
        self.lines_toward_next
    }

    /// Count one cleared line; returns true when it completed a level
    pub fn record_line(&mut self) -> bool {
        self.lines_toward_next += 1;
        if self.lines_toward_next >= self.lines_per_level {
            self.lines_toward_next = 0;
            self.level += 1;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.level = START_LEVEL;
        self.lines_toward_next = 0;
    }
}

impl Default for LevelTracker {
    fn default() -> Self {
        Self::new(LINES_PER_LEVEL)
    }
}

/// Statistics for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    score: u32,
    levels: LevelTracker,
    lines_cleared: u32,
    /// Spawn counts indexed by [`PieceKind::index`]
    piece_counts: [u32; PieceKind::COUNT],
}

impl RunStats {
    pub fn new(lines_per_level: u32) -> Self {
        Self {
            score: 0,
            levels: LevelTracker::new(lines_per_level),
            lines_cleared: 0,
            piece_counts: [0; PieceKind::COUNT],
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.levels.level()
    }

    pub fn lines_toward_next_level(&self) -> u32 {
        self.levels.lines_toward_next()
    }

    /// Total rows cleared this run
    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn piece_counts(&self) -> [u32; PieceKind::COUNT] {
        self.piece_counts
    }

    pub fn piece_count(&self, kind: PieceKind) -> u32 {
        self.piece_counts[kind.index()]
    }

    pub(crate) fn record_spawn(&mut self, kind: PieceKind) {
        self.piece_counts[kind.index()] += 1;
    }

    pub(crate) fn record_lock(&mut self, cause: LockCause) {
        self.score = self.score.saturating_add(lock_score(cause));
    }

    /// Count one cleared line; returns true on level-up
    pub(crate) fn record_line(&mut self) -> bool {
        self.lines_cleared += 1;
        self.levels.record_line()
    }

    /// Score and level go back to their starting values; counts are kept
    /// until the next run starts.
    pub(crate) fn reset_progress(&mut self) {
        self.score = 0;
        self.levels.reset();
    }

    /// Everything back to a fresh run
    pub(crate) fn reset(&mut self) {
        self.reset_progress();
        self.lines_cleared = 0;
        self.piece_counts = [0; PieceKind::COUNT];
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new(LINES_PER_LEVEL)
    }
}
