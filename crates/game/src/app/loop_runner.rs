use std::process::ExitCode;

use engine::{CameraFrame, FixedStepDriver, RecordingSink, PRIORITY_ENTITY};
use tracing::{debug, info};

use super::bootstrap::HostSession;

const PROGRESS_LOG_EVERY_FRAMES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) frames: u32,
    pub(crate) ticks: u64,
    pub(crate) camera: CameraFrame,
    pub(crate) player_tile: Option<(i32, i32)>,
}

pub(crate) fn run(session: HostSession) -> ExitCode {
    let texture_count = session.textures.len();
    let summary = run_frames(session);
    info!(
        textures = texture_count,
        frames = summary.frames,
        ticks = summary.ticks,
        camera_x = summary.camera.center.0,
        camera_y = summary.camera.center.1,
        zoom = summary.camera.multiplier,
        player_tile = ?summary.player_tile,
        "run_complete"
    );
    ExitCode::SUCCESS
}

/// Drives the world with synthetic frame times. Each frame starts from an
/// empty sink so the recorded items are exactly what that frame drew.
pub(crate) fn run_frames(mut session: HostSession) -> RunSummary {
    let mut driver = FixedStepDriver::new(&session.loop_config);
    let mut sink = RecordingSink::default();
    let tile_size = session.world.config().tile_size;

    for frame in 0..session.frames {
        sink.clear();
        let ticks = driver.advance(
            session.frame_dt,
            &mut session.world,
            &session.input,
            &mut sink,
        );

        if ticks > 0 && frame % PROGRESS_LOG_EVERY_FRAMES == 0 {
            let camera = session.world.camera();
            debug!(
                frame,
                ticks,
                camera_x = camera.center.0,
                camera_y = camera.center.1,
                zoom = camera.multiplier,
                draw_items = sink.items().len(),
                entity_items = sink.items_with_priority(PRIORITY_ENTITY).count(),
                visible_items = sink.visible_count(tile_size),
                "frame_progress"
            );
        }
    }

    RunSummary {
        frames: session.frames,
        ticks: driver.ticks_run(),
        camera: *session.world.camera(),
        player_tile: session.world.player().map(|player| player.logical_pos()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use engine::{
        Direction, Entity, GridMap, InputSnapshot, LoopConfig, MapDescription, MapId, MapRecord,
        SpriteFrames, TextureRegistry, World, WorldConfig, MISSING_TEXTURE,
    };

    use super::*;

    fn session(frames: u32, input: InputSnapshot) -> HostSession {
        let config = WorldConfig::default();
        let records = (0..4)
            .map(|x| MapRecord::Tile {
                x,
                y: 0,
                texture_path: "floor.png".into(),
                collision: 0,
                layer: 0,
            })
            .collect();
        let mut textures = TextureRegistry::default();
        let mut grid = GridMap::new(&config, MISSING_TEXTURE);
        grid.apply_map(
            MapId(1),
            &MapDescription {
                spawn: (0, 0),
                records,
            },
            &mut textures,
        );
        let player = Entity::player(0, SpriteFrames::placeholder(MISSING_TEXTURE), &grid, &config);
        let mut world = World::new(config, grid);
        world.push_entity(player);
        HostSession {
            world,
            textures,
            input,
            loop_config: LoopConfig::default(),
            frames,
            frame_dt: Duration::from_millis(20),
        }
    }

    #[test]
    fn idle_run_keeps_player_on_spawn() {
        let summary = run_frames(session(30, InputSnapshot::empty()));

        assert_eq!(summary.frames, 30);
        assert!(summary.ticks >= 30);
        assert_eq!(summary.player_tile, Some((0, 0)));
        assert_eq!(summary.camera.center, (8, 8));
        assert_eq!(summary.camera.multiplier, 5);
    }

    #[test]
    fn held_direction_walks_until_wall() {
        let input = InputSnapshot::empty().with_direction_down(0, Direction::Right, true);
        let summary = run_frames(session(600, input));

        assert_eq!(summary.player_tile, Some((3, 0)));
        assert_eq!(summary.camera.center, (3 * 16 + 8, 8));
    }
}
