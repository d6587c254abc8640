//! Shape table - spawn shapes and SRS wall kick data
//!
//! Every piece kind has exactly 4 cells at spawn orientation, relative to the
//! piece anchor (+X right, +Y up). Two kick tables exist: one for I and one shared
//! by J, L, O, S, T and Z.
//! Reference: https://tetris.wiki/SRS

use crate::config::{ConfigError, MAX_TABLE_OFFSET};
use crate::types::{Cell, PieceKind, KICK_CANDIDATES, KICK_ROWS, PIECE_CELLS};

/// Shape of a piece - 4 cell offsets from the piece anchor
pub type PieceShape = [Cell; PIECE_CELLS];

/// One row of kick candidates, tried in order; the first is always (0, 0)
pub type KickRow = [Cell; KICK_CANDIDATES];

const fn c(x: i8, y: i8) -> Cell {
    Cell::new(x, y)
}

/// Spawn shapes, indexed by [`PieceKind::index`]
const SPAWN_SHAPES: [PieceShape; PieceKind::COUNT] = [
    // I
    [c(-1, 1), c(0, 1), c(1, 1), c(2, 1)],
    // J
    [c(-1, 1), c(-1, 0), c(0, 0), c(1, 0)],
    // L
    [c(1, 1), c(-1, 0), c(0, 0), c(1, 0)],
    // O
    [c(0, 1), c(1, 1), c(0, 0), c(1, 0)],
    // S
    [c(0, 1), c(1, 1), c(-1, 0), c(0, 0)],
    // T
    [c(0, 1), c(-1, 0), c(0, 0), c(1, 0)],
    // Z
    [c(-1, 1), c(0, 1), c(0, 0), c(1, 0)],
];

/// I piece kick rows
///
/// Row order: 0->1, 1->0, 1->2, 2->1, 2->3, 3->2, 3->0, 0->3
const I_KICKS: [KickRow; KICK_ROWS] = [
    [c(0, 0), c(-2, 0), c(1, 0), c(-2, -1), c(1, 2)],
    [c(0, 0), c(2, 0), c(-1, 0), c(2, 1), c(-1, -2)],
    [c(0, 0), c(-1, 0), c(2, 0), c(-1, 2), c(2, -1)],
    [c(0, 0), c(1, 0), c(-2, 0), c(1, -2), c(-2, 1)],
    [c(0, 0), c(2, 0), c(-1, 0), c(2, 1), c(-1, -2)],
    [c(0, 0), c(-2, 0), c(1, 0), c(-2, -1), c(1, 2)],
    [c(0, 0), c(1, 0), c(-2, 0), c(1, -2), c(-2, 1)],
    [c(0, 0), c(-1, 0), c(2, 0), c(-1, 2), c(2, -1)],
];

/// Kick rows shared by J, L, O, S, T, Z (same row order as [`I_KICKS`])
const JLOSTZ_KICKS: [KickRow; KICK_ROWS] = [
    [c(0, 0), c(-1, 0), c(-1, 1), c(0, -2), c(-1, -2)],
    [c(0, 0), c(1, 0), c(1, -1), c(0, 2), c(1, 2)],
    [c(0, 0), c(1, 0), c(1, -1), c(0, 2), c(1, 2)],
    [c(0, 0), c(-1, 0), c(-1, 1), c(0, -2), c(-1, -2)],
    [c(0, 0), c(1, 0), c(1, 1), c(0, -2), c(1, -2)],
    [c(0, 0), c(-1, 0), c(-1, -1), c(0, 2), c(-1, 2)],
    [c(0, 0), c(-1, 0), c(-1, -1), c(0, 2), c(-1, 2)],
    [c(0, 0), c(1, 0), c(1, 1), c(0, -2), c(1, -2)],
];

fn in_table_range(cell: Cell) -> bool {
    (-MAX_TABLE_OFFSET..=MAX_TABLE_OFFSET).contains(&cell.x)
        && (-MAX_TABLE_OFFSET..=MAX_TABLE_OFFSET).contains(&cell.y)
}

/// Spawn shapes for all seven kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeTable {
    shapes: [PieceShape; PieceKind::COUNT],
}

impl ShapeTable {
    /// The standard SRS spawn shapes
    pub const fn standard() -> Self {
        Self {
            shapes: SPAWN_SHAPES,
        }
    }

    /// Build a table from loosely-shaped rows, one per kind in [`PieceKind::ALL`] order.
    ///
    /// Fails unless there are exactly 7 rows of exactly 4 distinct cells, each
    /// within [`MAX_TABLE_OFFSET`] of the anchor.
    pub fn try_from_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Result<Self, ConfigError> {
        if rows.len() != PieceKind::COUNT {
            return Err(ConfigError::ShapeKindCount {
                expected: PieceKind::COUNT,
                actual: rows.len(),
            });
        }

        let mut shapes = [[Cell::ZERO; PIECE_CELLS]; PieceKind::COUNT];
        for (kind, (row, shape)) in rows.iter().zip(shapes.iter_mut()).enumerate() {
            let row = row.as_ref();
            if row.len() != PIECE_CELLS {
                return Err(ConfigError::ShapeCellCount {
                    kind,
                    actual: row.len(),
                });
            }
            for (i, cell) in row.iter().enumerate() {
                if !in_table_range(*cell) {
                    return Err(ConfigError::ShapeCellOutOfRange {
                        kind,
                        x: cell.x,
                        y: cell.y,
                        max: MAX_TABLE_OFFSET,
                    });
                }
                if row[..i].contains(cell) {
                    return Err(ConfigError::DuplicateShapeCell {
                        kind,
                        x: cell.x,
                        y: cell.y,
                    });
                }
            }
            shape.copy_from_slice(row);
        }

        Ok(Self { shapes })
    }

    /// Spawn-orientation cells for a kind
    pub fn shape(&self, kind: PieceKind) -> PieceShape {
        self.shapes[kind.index()]
    }
}

impl Default for ShapeTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// One wall kick table: 8 transition rows of 5 candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KickTable {
    rows: [KickRow; KICK_ROWS],
}

impl KickTable {
    /// The SRS table for the I piece
    pub const fn standard_i() -> Self {
        Self { rows: I_KICKS }
    }

    /// The SRS table shared by J, L, O, S, T, Z
    pub const fn standard_jlostz() -> Self {
        Self { rows: JLOSTZ_KICKS }
    }

    /// Build a table from loosely-shaped rows.
    ///
    /// Fails unless there are exactly 8 rows of exactly 5 candidates, each row
    /// starting with the identity offset and every offset within
    /// [`MAX_TABLE_OFFSET`].
    pub fn try_from_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Result<Self, ConfigError> {
        if rows.len() != KICK_ROWS {
            return Err(ConfigError::KickRowCount { actual: rows.len() });
        }

        let mut out = [[Cell::ZERO; KICK_CANDIDATES]; KICK_ROWS];
        for (row_index, (row, dst)) in rows.iter().zip(out.iter_mut()).enumerate() {
            let row = row.as_ref();
            if row.len() != KICK_CANDIDATES {
                return Err(ConfigError::KickCandidateCount {
                    row: row_index,
                    actual: row.len(),
                });
            }
            if row[0] != Cell::ZERO {
                return Err(ConfigError::KickMissingIdentity { row: row_index });
            }
            if let Some(kick) = row.iter().find(|kick| !in_table_range(**kick)) {
                return Err(ConfigError::KickOffsetOutOfRange {
                    row: row_index,
                    x: kick.x,
                    y: kick.y,
                    max: MAX_TABLE_OFFSET,
                });
            }
            dst.copy_from_slice(row);
        }

        Ok(Self { rows: out })
    }

    /// Row at an already-wrapped index in `0..8`
    pub fn row(&self, index: usize) -> &KickRow {
        &self.rows[index]
    }
}
