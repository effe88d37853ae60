use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TILE_SIZE_PX: i32 = 16;
pub const DEFAULT_MOVE_STEP_INTERVAL: u64 = 15_000;
pub const DEFAULT_FRAME_TIME: u64 = 60_000;
pub const DEFAULT_ZOOM_BASELINE: u32 = 5;

/// Tunables shared by the grid, the walkers and the camera.
///
/// Virtual-time values are in the same unit as the deltas handed to
/// [`crate::World::tick`]; the fixed-step driver feeds microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub tile_size: i32,
    /// Virtual time between two single-pixel walker steps.
    pub move_step_interval: u64,
    /// Virtual time between two animation frame changes.
    pub frame_time: u64,
    pub zoom_baseline: u32,
    pub aspect: AspectRatio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self {
            width: 4,
            height: 3,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE_PX,
            move_step_interval: DEFAULT_MOVE_STEP_INTERVAL,
            frame_time: DEFAULT_FRAME_TIME,
            zoom_baseline: DEFAULT_ZOOM_BASELINE,
            aspect: AspectRatio::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl WorldConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pixel size of the viewport for a given zoom multiplier, saturating at
    /// the `i32` range.
    pub fn viewport_size(&self, multiplier: u32) -> (i32, i32) {
        let scale = i64::from(multiplier).saturating_mul(i64::from(self.tile_size));
        let span = |aspect: u32| {
            let pixels = i64::from(aspect).saturating_mul(scale);
            pixels.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        };
        (span(self.aspect.width), span(self.aspect.height))
    }
}
