//! Rotation resolver - 90° cell rotation and wall kick candidate lookup
//!
//! Cells are rotated with the matrix `[cos, sin; -sin, cos]` scaled by the
//! direction sign `d`, which for 90° reduces to `x' = y·d`, `y' = -x·d`.
//!
//! I and O have an even-sized bounding box, so their cells are shifted by
//! (-0.5, -0.5) before rotating and rounded up afterwards. That is evaluated on
//! doubled coordinates, where every shifted value is odd and the ceiling is exact.

use crate::config::ConfigError;
use crate::shapes::{KickRow, KickTable, PieceShape, ShapeTable};
use crate::types::{Cell, PieceKind, RotationDirection, KICK_ROWS};

/// Shape and kick data for one rotation system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSystem {
    shapes: ShapeTable,
    i_kicks: KickTable,
    shared_kicks: KickTable,
}

impl RotationSystem {
    /// Standard SRS data
    pub const fn srs() -> Self {
        Self {
            shapes: ShapeTable::standard(),
            i_kicks: KickTable::standard_i(),
            shared_kicks: KickTable::standard_jlostz(),
        }
    }

    /// Assemble a system from already validated tables.
    pub fn new(shapes: ShapeTable, i_kicks: KickTable, shared_kicks: KickTable) -> Self {
        Self {
            shapes,
            i_kicks,
            shared_kicks,
        }
    }

    /// Validate raw rows and assemble a system in one step.
    pub fn try_from_rows<S, K>(
        shapes: &[S],
        i_kicks: &[K],
        shared_kicks: &[K],
    ) -> Result<Self, ConfigError>
    where
        S: AsRef<[Cell]>,
        K: AsRef<[Cell]>,
    {
        Ok(Self::new(
            ShapeTable::try_from_rows(shapes)?,
            KickTable::try_from_rows(i_kicks)?,
            KickTable::try_from_rows(shared_kicks)?,
        ))
    }

    /// Spawn-orientation cells for a kind
    pub fn spawn_shape(&self, kind: PieceKind) -> PieceShape {
        self.shapes.shape(kind)
    }

    fn kick_table(&self, kind: PieceKind) -> &KickTable {
        match kind {
            PieceKind::I => &self.i_kicks,
            _ => &self.shared_kicks,
        }
    }

    /// Ordered kick candidates for leaving `from` in `direction`
    pub fn kick_candidates(
        &self,
        kind: PieceKind,
        from: u8,
        direction: RotationDirection,
    ) -> &KickRow {
        self.kick_table(kind).row(kick_row_index(from, direction))
    }
}

impl Default for RotationSystem {
    fn default() -> Self {
        Self::srs()
    }
}

/// Kick row for leaving orientation `from` in `direction`
///
/// `from * 2`, minus one for negative directions, wrapped into `0..8` with floor
/// modulo so that `-1` lands on row 7.
pub fn kick_row_index(from: u8, direction: RotationDirection) -> usize {
    let mut index = from as i32 * 2;
    if direction.sign() < 0 {
        index -= 1;
    }
    index.rem_euclid(KICK_ROWS as i32) as usize
}

/// Orientation reached from `orientation` after one turn in `direction`
pub fn next_orientation(orientation: u8, direction: RotationDirection) -> u8 {
    (orientation as i8 + direction.sign()).rem_euclid(4) as u8
}

/// Rotate piece-relative cells by 90° in `direction`
pub fn rotate_cells(kind: PieceKind, cells: &PieceShape, direction: RotationDirection) -> PieceShape {
    let d = direction.sign();
    let mut out = *cells;

    for cell in out.iter_mut() {
        *cell = if kind.is_even_sized() {
            // (x - 0.5) doubled, always odd
            let x2 = 2 * cell.x - 1;
            let y2 = 2 * cell.y - 1;
            let rx2 = y2 * d;
            let ry2 = -x2 * d;
            Cell::new(ceil_half(rx2), ceil_half(ry2))
        } else {
            Cell::new(cell.y * d, -cell.x * d)
        };
    }

    out
}

/// `ceil(v / 2)` for integer `v`
fn ceil_half(v: i8) -> i8 {
    (v + 1).div_euclid(2)
}
