//! Read-only view of a run for renderers

use crate::board::{Board, Rect};
use crate::piece::Piece;
use crate::shapes::PieceShape;
use crate::types::{Cell, PieceKind, Tile, BOARD_HEIGHT, BOARD_WIDTH, START_LEVEL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub position: Cell,
    pub orientation: u8,
    /// Board-absolute cells
    pub cells: PieceShape,
}

impl From<&Piece> for ActiveSnapshot {
    fn from(value: &Piece) -> Self {
        Self {
            kind: value.kind(),
            position: value.position(),
            orientation: value.orientation(),
            cells: value.absolute_cells(),
        }
    }
}

/// Everything a renderer needs after a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub bounds: Rect,
    /// Row-major tiles, bottom row first
    pub tiles: Vec<Tile>,
    pub active: Option<ActiveSnapshot>,
    pub run_id: u32,
    pub game_over: bool,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub piece_counts: [u32; PieceKind::COUNT],
}

impl RenderSnapshot {
    /// Tile at a board cell, `None` if out of bounds
    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        if !self.bounds.contains(cell) {
            return None;
        }
        let col = (cell.x - self.bounds.x_min) as usize;
        let row = (cell.y - self.bounds.y_min) as usize;
        self.tiles.get(row * self.bounds.width as usize + col).copied()
    }

    /// Locked tiles with the active piece drawn on top
    pub fn composed_tile(&self, cell: Cell) -> Option<Tile> {
        let tile = self.tile(cell)?;
        match self.active {
            Some(active) if active.cells.contains(&cell) => Some(Some(active.kind)),
            _ => Some(tile),
        }
    }

    pub fn playable(&self) -> bool {
        !self.game_over && self.active.is_some()
    }

    pub(crate) fn copy_board(&mut self, board: &Board) {
        self.bounds = board.bounds();
        self.tiles.clear();
        self.tiles.extend_from_slice(board.tiles());
    }
}

impl Default for RenderSnapshot {
    fn default() -> Self {
        Self {
            bounds: Rect {
                x_min: -((BOARD_WIDTH / 2) as i8),
                y_min: -((BOARD_HEIGHT / 2) as i8),
                width: BOARD_WIDTH,
                height: BOARD_HEIGHT,
            },
            tiles: Vec::new(),
            active: None,
            run_id: 0,
            game_over: false,
            score: 0,
            level: START_LEVEL,
            lines_cleared: 0,
            piece_counts: [0; PieceKind::COUNT],
        }
    }
}
