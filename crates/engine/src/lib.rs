use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod config;
pub mod content;

pub use app::{
    plan_sim_steps, world_to_screen_px, AnimationCursor, CameraFrame, Direction, DrawItem, Entity,
    EntityKind, FixedStepDriver, GridMap, InputSnapshot, InputSource, LoopConfig,
    MovementController, PlayerAppearance, RecordingSink, RenderSink, SpriteFrames, StepPlan,
    TextureRef, TextureRegistry, TextureSource, Viewport, WalkerBody, World, BLOCKING_COLLISION,
    MAX_PLAYER_SLOTS, MISSING_TEXTURE, PRIORITY_ENTITY, PRIORITY_GROUND, UNPLACED_TILE,
};
pub use config::{AspectRatio, ConfigError, WorldConfig};
pub use content::{
    parse_map_file, read_map_file, ContentError, MapDescription, MapId, MapRecord, MapRegistry,
};

pub const ROOT_ENV_VAR: &str = "TILEWORLD_ROOT";

const DATA_DIR_NAME: &str = "data";
const REGISTRY_FILE_NAME: &str = "maps.txt";

#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory every registry, map and sprite path is relative to.
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub registry_path: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "TILEWORLD_ROOT is set but does not point to a valid data root: {path}\n\
A valid root contains data/maps.txt."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect data root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing data/maps.txt.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/game\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    Ok(app_paths_for_root(root))
}

pub fn app_paths_for_root(root: PathBuf) -> AppPaths {
    let data_dir = root.join(DATA_DIR_NAME);
    let registry_path = data_dir.join(REGISTRY_FILE_NAME);
    AppPaths {
        root,
        data_dir,
        registry_path,
    }
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_data_root(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_data_root(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_data_root(path: &Path) -> bool {
    path.join(DATA_DIR_NAME).join(REGISTRY_FILE_NAME).is_file()
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_root_requires_registry_file() {
        let temp = tempfile::TempDir::new().expect("tempdir");
        assert!(!is_data_root(temp.path()));

        fs::create_dir_all(temp.path().join("data")).expect("data dir");
        assert!(!is_data_root(temp.path()));

        fs::write(temp.path().join("data").join("maps.txt"), "1 data/map/1.txt\n")
            .expect("registry");
        assert!(is_data_root(temp.path()));
    }

    #[test]
    fn app_paths_point_into_data_dir() {
        let paths = app_paths_for_root(PathBuf::from("game"));
        assert_eq!(paths.data_dir, Path::new("game/data"));
        assert_eq!(paths.registry_path, Path::new("game/data/maps.txt"));
    }
}
