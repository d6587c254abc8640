//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the kernel.
//! All types are pure data structures with no dependencies, making them
//! usable in any context (simulation, rendering, score submission).
//!
//! # Coordinate System
//!
//! The playfield is centered at the origin with +X to the right and +Y up:
//!
//! - **Width**: 10 columns (x from -5 to 4)
//! - **Height**: 20 rows (y from -10 to 9)
//! - **Spawn anchor**: (-1, 8), so spawn shapes touch the top row
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Suggested frame interval (~60 FPS) |
//! | `STEP_DELAY_MS` | 1000 | Interval between forced downward steps |
//! | `MOVE_DELAY_MS` | 100 | Minimum interval between lateral/soft-drop moves |
//! | `LOCK_DELAY_MS` | 500 | Idle time before a resting piece locks on a step |
//!
//! # Examples
//!
//! ```
//! use tetraversus_types::{Cell, Command, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::T;
//! assert_eq!(PieceKind::from_str("t"), Some(piece));
//!
//! let moved = Cell::new(-1, 8) + Cell::DOWN;
//! assert_eq!(moved, Cell::new(-1, 7));
//!
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use std::ops::{Add, Neg, Sub};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Anchor at which every new piece spawns
pub const SPAWN_POSITION: Cell = Cell::new(-1, 8);

/// Suggested frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Interval between forced downward steps (1 second per row)
pub const STEP_DELAY_MS: u32 = 1000;

/// Minimum interval between two processed lateral/soft-drop moves
pub const MOVE_DELAY_MS: u32 = 100;

/// Idle time after which a resting piece locks at its next forced step
pub const LOCK_DELAY_MS: u32 = 500;

/// Points for a lock that followed a forced (or soft) downward step
pub const SOFT_DROP_BONUS: u32 = 1;

/// Points for a lock caused by a hard drop
pub const HARD_DROP_BONUS: u32 = 2;

/// Cleared lines needed for one level-up
pub const LINES_PER_LEVEL: u32 = 2;

/// Level at the start of every run
pub const START_LEVEL: u32 = 1;

/// Cells making up a single piece
pub const PIECE_CELLS: usize = 4;

/// Candidate offsets per wall-kick row
pub const KICK_CANDIDATES: usize = 5;

/// Rows per wall-kick table (one per orientation transition)
pub const KICK_ROWS: usize = 8;


/// The seven tetromino piece kinds
///
/// The declaration order is the ordinal used for per-kind statistics:
/// `PieceKind::ALL[k.index()] == k` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All piece kinds in ordinal order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Number of piece kinds.
    pub const COUNT: usize = 7;

    /// Ordinal of this kind within [`PieceKind::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Kind at the given ordinal, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetraversus_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }

    /// Whether the piece has an even-sized bounding box (no true center cell).
    pub fn is_even_sized(&self) -> bool {
        matches!(self, PieceKind::I | PieceKind::O)
    }
}

/// Integer 2D coordinate (column, row)
///
/// Used both as a board-absolute position and as a piece-relative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Cell {
    pub x: i8,
    pub y: i8,
}

impl Cell {
    pub const ZERO: Cell = Cell::new(0, 0);
    pub const LEFT: Cell = Cell::new(-1, 0);
    pub const RIGHT: Cell = Cell::new(1, 0);
    pub const DOWN: Cell = Cell::new(0, -1);

    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Component-wise addition, `None` on overflow.
    pub fn checked_add(self, other: Cell) -> Option<Cell> {
        Some(Cell::new(
            self.x.checked_add(other.x)?,
            self.y.checked_add(other.y)?,
        ))
    }
}

impl From<(i8, i8)> for Cell {
    fn from((x, y): (i8, i8)) -> Self {
        Cell::new(x, y)
    }
}

impl Add for Cell {
    type Output = Cell;

    fn add(self, rhs: Cell) -> Cell {
        Cell::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Cell {
    type Output = Cell;

    fn sub(self, rhs: Cell) -> Cell {
        Cell::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Cell {
    type Output = Cell;

    fn neg(self) -> Cell {
        Cell::new(-self.x, -self.y)
    }
}

/// A square on the board
///
/// - `None`: Empty
/// - `Some(PieceKind)`: Occupied by a cell of a locked piece of that kind
pub type Tile = Option<PieceKind>;

/// Direction of a 90° rotation
///
/// Orientation indices increase clockwise: 0 (spawn) → 1 → 2 → 3 → 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// Signed step applied to the orientation index and the rotation matrix.
    pub const fn sign(self) -> i8 {
        match self {
            RotationDirection::Clockwise => 1,
            RotationDirection::CounterClockwise => -1,
        }
    }

    pub const fn inverse(self) -> Self {
        match self {
            RotationDirection::Clockwise => RotationDirection::CounterClockwise,
            RotationDirection::CounterClockwise => RotationDirection::Clockwise,
        }
    }
}

/// Discrete commands accepted from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down and postpone the next forced step
    SoftDrop,
    /// Drop piece to the lowest valid position and lock it
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
}

impl Command {
    /// Parse command from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetraversus_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("rotateccw"), Some(Command::RotateCcw));
    /// assert_eq!(Command::from_str("hold"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "softdrop" => Some(Command::SoftDrop),
            "harddrop" => Some(Command::HardDrop),
            "rotatecw" => Some(Command::RotateCw),
            "rotateccw" => Some(Command::RotateCcw),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::SoftDrop => "softDrop",
            Command::HardDrop => "hardDrop",
            Command::RotateCw => "rotateCw",
            Command::RotateCcw => "rotateCcw",
        }
    }

    /// Whether the command is gated by the move delay.
    pub fn is_move(&self) -> bool {
        matches!(
            self,
            Command::MoveLeft | Command::MoveRight | Command::SoftDrop
        )
    }
}
