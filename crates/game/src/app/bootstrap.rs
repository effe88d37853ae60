use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine::{
    resolve_app_paths, AppPaths, Direction, Entity, GridMap, InputSnapshot, LoopConfig, MapId,
    MapRegistry, PlayerAppearance, TextureRegistry, TextureSource, World, WorldConfig,
    MAX_PLAYER_SLOTS,
};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const HOST_CONFIG_FILE: &str = "host.json";
const HOLD_ENV_VAR: &str = "TILEWORLD_HOLD";

pub(crate) type HostResult<T> = Result<T, String>;

/// Optional `host.json` next to the data directory. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HostConfig {
    pub(crate) world: WorldConfig,
    pub(crate) registry_path: Option<PathBuf>,
    pub(crate) start_map: u32,
    pub(crate) players: usize,
    pub(crate) frames: u32,
    pub(crate) frame_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            registry_path: None,
            start_map: 1,
            players: 1,
            frames: 600,
            frame_ms: 16,
        }
    }
}

pub(crate) struct HostSession {
    pub(crate) world: World,
    pub(crate) textures: TextureRegistry,
    pub(crate) input: InputSnapshot,
    pub(crate) loop_config: LoopConfig,
    pub(crate) frames: u32,
    pub(crate) frame_dt: Duration,
}

pub(crate) fn build_app() -> HostResult<HostSession> {
    init_tracing();
    info!("=== Tile World Startup ===");

    let paths = resolve_app_paths().map_err(|error| error.to_string())?;
    build_session(&paths, &parse_held_directions_from_env())
}

pub(crate) fn build_session(paths: &AppPaths, held: &[Direction]) -> HostResult<HostSession> {
    let config = load_host_config(&paths.root.join(HOST_CONFIG_FILE))?;

    let registry_path = config
        .registry_path
        .as_ref()
        .map(|path| paths.root.join(path))
        .unwrap_or_else(|| paths.registry_path.clone());
    let registry = MapRegistry::load(&registry_path, &paths.root)
        .map_err(|error| format!("load map registry: {error}"))?;

    let mut textures = TextureRegistry::default();
    let mut grid = GridMap::new(&config.world, textures.missing());
    grid.load_map(MapId(config.start_map), &registry, &mut textures)
        .map_err(|error| format!("load start map: {error}"))?;

    let mut world = World::new(config.world, grid);
    let player_count = config.players.clamp(1, MAX_PLAYER_SLOTS);
    for slot in 0..player_count {
        let frames = PlayerAppearance::for_slot(slot).load_frames(&paths.root, &mut textures);
        let player = Entity::player(slot, frames, world.grid(), &config.world);
        world.push_entity(player);
    }

    let input = held.iter().fold(InputSnapshot::empty(), |input, direction| {
        input.with_direction_down(0, *direction, true)
    });

    let (viewport_width, viewport_height) = world.initial_viewport();
    info!(
        map_id = config.start_map,
        maps_registered = registry.len(),
        players = player_count,
        textures = textures.len(),
        viewport_width,
        viewport_height,
        held = ?held,
        "startup"
    );

    Ok(HostSession {
        world,
        textures,
        input,
        loop_config: LoopConfig::default(),
        frames: config.frames,
        frame_dt: Duration::from_millis(config.frame_ms),
    })
}

fn load_host_config(path: &Path) -> HostResult<HostConfig> {
    if !path.is_file() {
        info!(path = %path.display(), "host_config_defaulted");
        return Ok(HostConfig::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("read host config '{}': {error}", path.display()))?;
    parse_host_config_json(&raw)
}

fn parse_host_config_json(raw: &str) -> HostResult<HostConfig> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, HostConfig>(&mut deserializer) {
        Ok(config) => Ok(config),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse host config: {source}"))
            } else {
                Err(format!("parse host config at {path}: {source}"))
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn parse_held_directions_from_env() -> Vec<Direction> {
    std::env::var(HOLD_ENV_VAR)
        .ok()
        .map(|raw| parse_held_directions(&raw))
        .unwrap_or_default()
}

fn parse_held_directions(raw: &str) -> Vec<Direction> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let direction = Direction::parse(entry);
            if direction.is_none() {
                warn!(env_var = HOLD_ENV_VAR, value = entry, "unknown held direction ignored");
            }
            direction
        })
        .collect()
}
