//! Collaborators outside the kernel
//!
//! The kernel never blocks on these. Implementations that talk to slow or
//! remote services should hand work off (see the adapter crate's channel sinks)
//! and return immediately.

use crate::types::PieceKind;

/// Final statistics of a run, emitted once on game over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Monotonic id of the run that ended
    pub run_id: u32,
    pub score: u32,
    pub level: u32,
    pub rows_cleared: u32,
    /// Spawn counts indexed by [`PieceKind::index`]
    pub piece_counts: [u32; PieceKind::COUNT],
}

impl RunReport {
    pub fn piece_count(&self, kind: PieceKind) -> u32 {
        self.piece_counts[kind.index()]
    }
}

/// Source of piece kinds for spawning
///
/// Returning `None` signals the source is unavailable; the kernel then draws
/// from its local fallback generator instead of stalling.
pub trait PieceSource {
    fn next_piece_kind(&mut self) -> Option<PieceKind>;
}

impl<F: FnMut() -> Option<PieceKind>> PieceSource for F {
    fn next_piece_kind(&mut self) -> Option<PieceKind> {
        self()
    }
}

/// Fire-and-forget receiver of final run statistics
pub trait StatsSink {
    fn submit(&mut self, report: &RunReport);
}

/// Sink that drops every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StatsSink for NullSink {
    fn submit(&mut self, _report: &RunReport) {}
}

impl<F: FnMut(&RunReport)> StatsSink for F {
    fn submit(&mut self, report: &RunReport) {
        self(report)
    }
}

/// Observer called once per level increment with the new level
pub trait LevelUpNotifier {
    fn level_up(&mut self, level: u32);
}

impl<F: FnMut(u32)> LevelUpNotifier for F {
    fn level_up(&mut self, level: u32) {
        self(level)
    }
}
