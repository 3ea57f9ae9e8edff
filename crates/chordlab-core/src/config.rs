use crate::catalog::WeightKind;
use crate::consts;
use crate::error::{ChordLabError, ClResult};
use crate::render::Palette;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunable experiment settings. Everything has a default matching the
/// original study hardware; a JSON file may override any subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub grid_rows: usize,
    pub grid_cols: usize,

    /// Trials per block; a mandatory rest follows each block.
    pub block_size: usize,

    pub correct_delay_ms: u64,
    pub incorrect_delay_ms: u64,
    pub rest_delay_ms: u64,

    /// Period of the unconditional render tick.
    pub refresh_ms: u64,

    pub palette: Palette,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            grid_rows: consts::GRID_ROWS,
            grid_cols: consts::GRID_COLS,
            block_size: consts::DEFAULT_BLOCK_SIZE,
            correct_delay_ms: consts::DEFAULT_CORRECT_DELAY_MS,
            incorrect_delay_ms: consts::DEFAULT_INCORRECT_DELAY_MS,
            rest_delay_ms: consts::DEFAULT_REST_DELAY_MS,
            refresh_ms: consts::DEFAULT_REFRESH_MS,
            palette: Palette::default(),
        }
    }
}

impl ExperimentConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ClResult<Self> {
        let content = fs::read_to_string(&path)?;
        let cfg: ExperimentConfig = serde_json::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ClResult<()> {
        if self.grid_rows == 0 || self.grid_cols == 0 {
            return Err(ChordLabError::Config(
                "grid dimensions must be non-zero".to_string(),
            ));
        }
        if self.block_size == 0 {
            return Err(ChordLabError::Config(
                "block size must be at least 1".to_string(),
            ));
        }
        if self.refresh_ms == 0 {
            return Err(ChordLabError::Config(
                "refresh interval must be at least 1 ms".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything needed to construct one session, supplied by the bootstrap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSpec {
    pub participant_id: String,
    pub lit_enabled: bool,
    pub weight_kind: WeightKind,
}
