//! Kernel configuration and construction-time errors
//!
//! Defaults come from the `tetraversus-types` constants. Every value can be
//! overridden from the environment with [`KernelConfig::from_env`].

use thiserror::Error;

use crate::types::{
    Cell, BOARD_HEIGHT, BOARD_WIDTH, LINES_PER_LEVEL, LOCK_DELAY_MS, MOVE_DELAY_MS,
    SPAWN_POSITION, STEP_DELAY_MS,
};

/// Largest supported board side, keeps every coordinate comfortably inside `i8`.
pub const MAX_BOARD_SIDE: u8 = 64;

/// Largest coordinate magnitude accepted in shape and kick tables.
pub const MAX_TABLE_OFFSET: i8 = 4;

/// Fatal configuration problems, reported before any run starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("shape table must define {expected} kinds, got {actual}")]
    ShapeKindCount { expected: usize, actual: usize },
    #[error("shape for kind #{kind} must have 4 cells, got {actual}")]
    ShapeCellCount { kind: usize, actual: usize },
    #[error("shape for kind #{kind} repeats cell ({x}, {y})")]
    DuplicateShapeCell { kind: usize, x: i8, y: i8 },
    #[error("shape for kind #{kind} has cell ({x}, {y}) outside -{max}..={max}")]
    ShapeCellOutOfRange { kind: usize, x: i8, y: i8, max: i8 },
    #[error("kick table must have 8 rows, got {actual}")]
    KickRowCount { actual: usize },
    #[error("kick row {row} must have 5 candidates, got {actual}")]
    KickCandidateCount { row: usize, actual: usize },
    #[error("kick row {row} has offset ({x}, {y}) outside -{max}..={max}")]
    KickOffsetOutOfRange { row: usize, x: i8, y: i8, max: i8 },
    #[error("kick row {row} must start with the identity offset")]
    KickMissingIdentity { row: usize },
    #[error("board must be between 1x1 and {max}x{max}, got {width}x{height}")]
    BoardSize { width: u8, height: u8, max: u8 },
    #[error("spawn position ({x}, {y}) lies outside the board")]
    SpawnOutOfBounds { x: i8, y: i8 },
    #[error("step delay must be greater than zero")]
    ZeroStepDelay,
    #[error("lines per level must be greater than zero")]
    ZeroLinesPerLevel,
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Per-piece timing, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub step_delay_ms: u32,
    pub move_delay_ms: u32,
    pub lock_delay_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            step_delay_ms: STEP_DELAY_MS,
            move_delay_ms: MOVE_DELAY_MS,
            lock_delay_ms: LOCK_DELAY_MS,
        }
    }
}

/// Complete kernel configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelConfig {
    pub board_width: u8,
    pub board_height: u8,
    pub spawn_position: Cell,
    pub timing: Timing,
    pub lines_per_level: u32,
    /// Seed for the default piece source and the fallback generator.
    /// `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            spawn_position: SPAWN_POSITION,
            timing: Timing::default(),
            lines_per_level: LINES_PER_LEVEL,
            seed: None,
        }
    }
}

impl KernelConfig {
    /// Create from environment variables, falling back to defaults for unset ones.
    ///
    /// - `TETRAVERSUS_BOARD_WIDTH`, `TETRAVERSUS_BOARD_HEIGHT`
    /// - `TETRAVERSUS_STEP_DELAY_MS`, `TETRAVERSUS_MOVE_DELAY_MS`, `TETRAVERSUS_LOCK_DELAY_MS`
    /// - `TETRAVERSUS_LINES_PER_LEVEL`
    /// - `TETRAVERSUS_SEED`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`KernelConfig::from_env`] with an explicit variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "TETRAVERSUS_BOARD_WIDTH")? {
            config.board_width = v;
        }
        if let Some(v) = parse_var(&lookup, "TETRAVERSUS_BOARD_HEIGHT")? {
            config.board_height = v;
        }
        if let Some(v) = parse_var(&lookup, "TETRAVERSUS_STEP_DELAY_MS")? {
            config.timing.step_delay_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "TETRAVERSUS_MOVE_DELAY_MS")? {
            config.timing.move_delay_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "TETRAVERSUS_LOCK_DELAY_MS")? {
            config.timing.lock_delay_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "TETRAVERSUS_LINES_PER_LEVEL")? {
            config.lines_per_level = v;
        }
        if let Some(v) = parse_var(&lookup, "TETRAVERSUS_SEED")? {
            config.seed = Some(v);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the kernel relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = (self.board_width, self.board_height);
        if w == 0 || h == 0 || w > MAX_BOARD_SIDE || h > MAX_BOARD_SIDE {
            return Err(ConfigError::BoardSize {
                width: w,
                height: h,
                max: MAX_BOARD_SIDE,
            });
        }

        let x_min = -((w / 2) as i8);
        let y_min = -((h / 2) as i8);
        let Cell { x, y } = self.spawn_position;
        if x < x_min || x >= x_min + w as i8 || y < y_min || y >= y_min + h as i8 {
            return Err(ConfigError::SpawnOutOfBounds { x, y });
        }

        if self.timing.step_delay_ms == 0 {
            return Err(ConfigError::ZeroStepDelay);
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv { name, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(KernelConfig::default().validate(), Ok(()));
    }

    #[test]
    fn lookup_overrides_defaults() {
        let config = KernelConfig::from_lookup(|name| match name {
            "TETRAVERSUS_STEP_DELAY_MS" => Some("250".to_string()),
            "TETRAVERSUS_SEED" => Some(" 42 ".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.timing.step_delay_ms, 250);
        assert_eq!(config.timing.move_delay_ms, MOVE_DELAY_MS);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn invalid_env_value_is_rejected() {
        let err = KernelConfig::from_lookup(|name| {
            (name == "TETRAVERSUS_BOARD_WIDTH").then(|| "wide".to_string())
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                name: "TETRAVERSUS_BOARD_WIDTH",
                ..
            }
        ));
    }

    #[test]
    fn spawn_outside_board_is_rejected() {
        let config = KernelConfig {
            spawn_position: Cell::new(0, 10),
            ..KernelConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SpawnOutOfBounds { x: 0, y: 10 })
        );
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let config = KernelConfig {
            board_width: 0,
            ..KernelConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardSize { .. })
        ));

        let config = KernelConfig {
            lines_per_level: 0,
            ..KernelConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroLinesPerLevel));
    }
}
