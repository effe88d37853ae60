use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapId(pub u32);

impl std::fmt::Display for MapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parsed contents of one map file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapDescription {
    pub spawn: (i32, i32),
    pub records: Vec<MapRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapRecord {
    Tile {
        x: i32,
        y: i32,
        texture_path: PathBuf,
        collision: u8,
        /// Parsed but not yet used for draw ordering.
        layer: i32,
    },
    /// Object placement. Accepted so map files can carry it; it has no grid effect.
    Object {
        x: i32,
        y: i32,
        descriptor_path: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("map id {map_id} is not registered")]
    MapNotFound { map_id: MapId },
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}
