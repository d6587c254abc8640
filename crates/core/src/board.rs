//! Board module - manages the occupancy grid
//!
//! The board is a width x height grid (10x20 by default) where each tile is empty
//! or holds the kind of the locked piece that filled it.
//! Uses a flat row-major vector allocated once at construction, bottom row first.
//! Coordinates are centered on the origin: x in [-width/2, -width/2 + width),
//! y in [-height/2, -height/2 + height), +Y up.

use crate::config::MAX_BOARD_SIDE;
use crate::shapes::PieceShape;
use crate::types::{Cell, PieceKind, Tile, BOARD_HEIGHT, BOARD_WIDTH};

/// Valid coordinate rectangle of a board (max edges exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x_min: i8,
    pub y_min: i8,
    pub width: u8,
    pub height: u8,
}

impl Rect {
    pub fn x_max(&self) -> i8 {
        self.x_min + self.width as i8
    }

    pub fn y_max(&self) -> i8 {
        self.y_min + self.height as i8
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= self.x_min && cell.x < self.x_max() && cell.y >= self.y_min && cell.y < self.y_max()
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    bounds: Rect,
    /// Flat array of tiles, row-major, `(y - y_min) * width + (x - x_min)`
    tiles: Vec<Tile>,
}

impl Board {
    /// Create a new empty 10x20 board
    pub fn new() -> Self {
        Self::with_size(BOARD_WIDTH, BOARD_HEIGHT)
    }

    /// Create a new empty board of the given size
    ///
    /// Each side is clamped to `1..=MAX_BOARD_SIDE`; [`crate::KernelConfig::validate`]
    /// rejects out-of-range sizes before they get here.
    pub fn with_size(width: u8, height: u8) -> Self {
        let width = width.clamp(1, MAX_BOARD_SIDE);
        let height = height.clamp(1, MAX_BOARD_SIDE);
        let bounds = Rect {
            x_min: -((width / 2) as i8),
            y_min: -((height / 2) as i8),
            width,
            height,
        };
        Self {
            bounds,
            tiles: vec![None; width as usize * height as usize],
        }
    }

    /// Calculate flat index for a cell, `None` if out of bounds
    #[inline(always)]
    fn index(&self, cell: Cell) -> Option<usize> {
        if !self.bounds.contains(cell) {
            return None;
        }
        let col = (cell.x - self.bounds.x_min) as usize;
        let row = (cell.y - self.bounds.y_min) as usize;
        Some(row * self.bounds.width as usize + col)
    }

    /// Index of the first tile of a row (row must be in bounds)
    #[inline(always)]
    fn row_start(&self, y: i8) -> usize {
        (y - self.bounds.y_min) as usize * self.bounds.width as usize
    }

    /// Valid coordinate rectangle
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn width(&self) -> u8 {
        self.bounds.width
    }

    pub fn height(&self) -> u8 {
        self.bounds.height
    }

    /// Get tile at a cell
    /// Returns None if out of bounds
    pub fn get(&self, cell: Cell) -> Option<Tile> {
        self.index(cell).map(|idx| self.tiles[idx])
    }

    /// Set tile at a cell
    /// Returns false if out of bounds
    pub fn set(&mut self, cell: Cell, tile: Tile) -> bool {
        match self.index(cell) {
            Some(idx) => {
                self.tiles[idx] = tile;
                true
            }
            None => false,
        }
    }

    /// Check if a cell is within bounds and filled
    pub fn is_occupied(&self, cell: Cell) -> bool {
        matches!(self.get(cell), Some(Some(_)))
    }

    /// Check if a cell is within bounds and empty
    pub fn is_free(&self, cell: Cell) -> bool {
        matches!(self.get(cell), Some(None))
    }

    /// True iff every cell of `shape` placed at `offset` is inside the bounds and unoccupied
    pub fn is_valid(&self, shape: &PieceShape, offset: Cell) -> bool {
        shape.iter().all(|&cell| {
            cell.checked_add(offset)
                .is_some_and(|absolute| self.is_free(absolute))
        })
    }

    /// Mark every cell of `shape` placed at `offset` as occupied by `kind`
    ///
    /// The caller must have checked [`Board::is_valid`] first. Debug builds assert
    /// it; release builds skip cells that are out of bounds.
    pub fn commit(&mut self, shape: &PieceShape, offset: Cell, kind: PieceKind) {
        debug_assert!(
            self.is_valid(shape, offset),
            "commit onto an invalid position {:?} + {:?}",
            shape,
            offset
        );

        for &cell in shape {
            if let Some(absolute) = cell.checked_add(offset) {
                self.set(absolute, Some(kind));
            }
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: i8) -> bool {
        if y < self.bounds.y_min || y >= self.bounds.y_max() {
            return false;
        }
        let start = self.row_start(y);
        let end = start + self.bounds.width as usize;
        self.tiles[start..end].iter().all(|tile| tile.is_some())
    }

    /// Remove a row and shift every row above it down by one
    /// Uses copy_within for the shift, then empties the duplicated top row
    fn remove_row(&mut self, y: i8) {
        let width = self.bounds.width as usize;
        let start = self.row_start(y);
        let end = self.tiles.len();

        // Shift everything above `y` down one row (copy_within handles overlap)
        self.tiles.copy_within(start + width..end, start);

        // Clear the top row
        for tile in &mut self.tiles[end - width..end] {
            *tile = None;
        }
    }

    /// Remove all full rows, returning how many were cleared
    ///
    /// Scans upward from the bottom row. After a clear the same row index is
    /// checked again, since the row above has just fallen into it; the scan only
    /// advances past rows that were not full.
    pub fn clear_full_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut row = self.bounds.y_min;

        while row < self.bounds.y_max() {
            if self.is_row_full(row) {
                self.remove_row(row);
                cleared += 1;
            } else {
                row += 1;
            }
        }

        cleared
    }

    /// Iterate occupied cells bottom to top, left to right
    pub fn occupied_cells(&self) -> impl Iterator<Item = (Cell, PieceKind)> + '_ {
        let Rect {
            x_min,
            y_min,
            width,
            ..
        } = self.bounds;
        self.tiles.iter().enumerate().filter_map(move |(idx, tile)| {
            let kind = (*tile)?;
            let x = x_min + (idx % width as usize) as i8;
            let y = y_min + (idx / width as usize) as i8;
            Some((Cell::new(x, y), kind))
        })
    }

    /// Number of occupied tiles
    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_some()).count()
    }

    /// Get a reference to the internal tiles, bottom row first
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Empty every tile
    pub fn reset(&mut self) {
        for tile in &mut self.tiles {
            *tile = None;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
