use std::time::Duration;

use tracing::warn;

use super::input::InputSource;
use super::rendering::RenderSink;
use super::world::World;

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
        }
    }
}

/// Turns variable frame times into a whole number of fixed world ticks.
///
/// Each tick hands the world `fixed_dt` expressed in microseconds, the unit
/// the walkers' step interval and frame time are configured in.
#[derive(Debug, Clone)]
pub struct FixedStepDriver {
    fixed_dt: Duration,
    max_frame_delta: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
    ticks_run: u64,
}

impl FixedStepDriver {
    pub fn new(config: &LoopConfig) -> Self {
        let target_tps = config.target_tps.max(1);
        let max_frame_delta = if config.max_frame_delta.is_zero() {
            LoopConfig::default().max_frame_delta
        } else {
            config.max_frame_delta
        };
        Self {
            fixed_dt: Duration::from_nanos(1_000_000_000 / u64::from(target_tps)),
            max_frame_delta,
            max_ticks_per_frame: config.max_ticks_per_frame.max(1),
            accumulator: Duration::ZERO,
            ticks_run: 0,
        }
    }

    pub fn fixed_dt(&self) -> Duration {
        self.fixed_dt
    }

    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    /// Runs every tick the elapsed frame time pays for and returns how many ran.
    pub fn advance(
        &mut self,
        frame_dt: Duration,
        world: &mut World,
        input: &dyn InputSource,
        sink: &mut dyn RenderSink,
    ) -> u32 {
        let frame_dt = frame_dt.min(self.max_frame_delta);
        self.accumulator = self.accumulator.saturating_add(frame_dt);

        let plan = plan_sim_steps(self.accumulator, self.fixed_dt, self.max_ticks_per_frame);
        for _ in 0..plan.ticks_to_run {
            world.tick(plan.tick_delta_micros, input, sink);
            self.ticks_run = self.ticks_run.saturating_add(1);
        }
        self.accumulator = plan.remaining_accumulator;

        if !plan.dropped_backlog.is_zero() {
            warn!(
                dropped_backlog_ms = plan.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame = self.max_ticks_per_frame,
                "sim_clamp_triggered"
            );
        }

        plan.ticks_to_run
    }
}

/// World ticks owed for one frame, each worth `tick_delta_micros` of
/// virtual time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPlan {
    pub ticks_to_run: u32,
    pub tick_delta_micros: u64,
    pub remaining_accumulator: Duration,
    pub dropped_backlog: Duration,
}

/// Backlog the tick cap cannot pay off is dropped rather than carried into
/// the next frame.
pub fn plan_sim_steps(accumulator: Duration, fixed_dt: Duration, max_ticks: u32) -> StepPlan {
    let mut remaining = accumulator;
    let mut ticks_to_run = 0u32;
    while remaining >= fixed_dt && ticks_to_run < max_ticks {
        remaining -= fixed_dt;
        ticks_to_run += 1;
    }

    let dropped_backlog = if remaining >= fixed_dt {
        std::mem::take(&mut remaining)
    } else {
        Duration::ZERO
    };

    StepPlan {
        ticks_to_run,
        tick_delta_micros: u64::try_from(fixed_dt.as_micros()).unwrap_or(u64::MAX),
        remaining_accumulator: remaining,
        dropped_backlog,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::grid::GridMap;
    use crate::app::input::{Direction, InputSnapshot};
    use crate::app::rendering::RecordingSink;
    use crate::app::texture::{TextureRegistry, MISSING_TEXTURE};
    use crate::app::{Entity, SpriteFrames};
    use crate::config::WorldConfig;
    use crate::content::{MapDescription, MapId, MapRecord};

    fn corridor_world() -> World {
        let config = WorldConfig::default();
        let records = (0..8)
            .map(|x| MapRecord::Tile {
                x,
                y: 0,
                texture_path: "floor.png".into(),
                collision: 0,
                layer: 0,
            })
            .collect();
        let mut grid = GridMap::new(&config, MISSING_TEXTURE);
        grid.apply_map(
            MapId(1),
            &MapDescription {
                spawn: (0, 0),
                records,
            },
            &mut TextureRegistry::default(),
        );
        let player = Entity::player(0, SpriteFrames::placeholder(MISSING_TEXTURE), &grid, &config);
        let mut world = World::new(config, grid);
        world.push_entity(player);
        world
    }

    #[test]
    fn plan_pays_whole_ticks_and_keeps_remainder() {
        let plan = plan_sim_steps(Duration::from_millis(50), Duration::from_millis(16), 5);

        assert_eq!(plan.ticks_to_run, 3);
        assert_eq!(plan.tick_delta_micros, 16_000);
        assert_eq!(plan.remaining_accumulator, Duration::from_millis(2));
        assert!(plan.dropped_backlog.is_zero());
    }

    #[test]
    fn plan_drops_backlog_past_tick_cap() {
        let plan = plan_sim_steps(Duration::from_millis(120), Duration::from_millis(16), 3);

        assert_eq!(plan.ticks_to_run, 3);
        assert_eq!(plan.remaining_accumulator, Duration::ZERO);
        assert_eq!(plan.dropped_backlog, Duration::from_millis(72));
    }

    #[test]
    fn plan_reports_sub_millisecond_tick_delta() {
        let plan = plan_sim_steps(Duration::ZERO, Duration::from_nanos(16_666_666), 5);

        assert_eq!(plan.ticks_to_run, 0);
        assert_eq!(plan.tick_delta_micros, 16_666);
    }

    #[test]
    fn driver_clamps_long_frames_to_max_delta() {
        let config = LoopConfig {
            target_tps: 10,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 10,
        };
        let mut driver = FixedStepDriver::new(&config);
        let mut world = corridor_world();
        let mut sink = RecordingSink::default();

        let ran = driver.advance(
            Duration::from_secs(5),
            &mut world,
            &InputSnapshot::empty(),
            &mut sink,
        );

        // 250 ms of 100 ms ticks, remainder kept
        assert_eq!(ran, 2);
        assert_eq!(
            driver.advance(
                Duration::from_millis(50),
                &mut world,
                &InputSnapshot::empty(),
                &mut sink
            ),
            1
        );
    }

    #[test]
    fn driver_carries_remainder_between_frames() {
        let config = LoopConfig {
            target_tps: 50,
            ..LoopConfig::default()
        };
        let mut driver = FixedStepDriver::new(&config);
        let mut world = corridor_world();
        let input = InputSnapshot::empty();
        let mut sink = RecordingSink::default();

        assert_eq!(
            driver.advance(Duration::from_millis(15), &mut world, &input, &mut sink),
            0
        );
        assert_eq!(
            driver.advance(Duration::from_millis(15), &mut world, &input, &mut sink),
            1
        );
        assert_eq!(driver.ticks_run(), 1);
    }

    #[test]
    fn driver_caps_ticks_for_long_frames() {
        let config = LoopConfig {
            target_tps: 100,
            max_ticks_per_frame: 3,
            ..LoopConfig::default()
        };
        let mut driver = FixedStepDriver::new(&config);
        let mut world = corridor_world();
        let mut sink = RecordingSink::default();

        let ran = driver.advance(
            Duration::from_secs(2),
            &mut world,
            &InputSnapshot::empty(),
            &mut sink,
        );

        assert_eq!(ran, 3);
        assert_eq!(
            driver.advance(Duration::ZERO, &mut world, &InputSnapshot::empty(), &mut sink),
            0
        );
    }

    #[test]
    fn driver_ticks_move_player_in_microseconds() {
        let config = LoopConfig {
            target_tps: 50,
            ..LoopConfig::default()
        };
        let mut driver = FixedStepDriver::new(&config);
        let mut world = corridor_world();
        let input = InputSnapshot::empty().with_direction_down(0, Direction::Right, true);
        let mut sink = RecordingSink::default();

        // The first tick takes the move, each later 20 ms tick clears the
        // 15 ms step interval and walks one pixel.
        for _ in 0..4 {
            driver.advance(Duration::from_millis(20), &mut world, &input, &mut sink);
        }

        let player = world.player().expect("player");
        assert_eq!(driver.fixed_dt(), Duration::from_millis(20));
        assert_eq!(player.logical_pos(), (1, 0));
        assert_eq!(player.visual_pos(), (3, 0));
    }
}
