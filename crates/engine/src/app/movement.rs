use crate::config::WorldConfig;

use super::input::Direction;

/// What a [`MovementController`] drives. The controller never stores its
/// owner; the owner lends itself for the duration of one tick.
pub trait WalkerBody {
    fn visual_pos(&self) -> (i32, i32);
    fn place_visual(&mut self, x: i32, y: i32);
    fn advance_frame(&mut self, facing: Direction);
    fn stop_frame(&mut self, facing: Direction);
}

/// Moves a visual position one pixel per axis per step toward a target,
/// stepping on its own virtual clock so the cadence does not depend on how
/// often or how coarsely it is ticked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementController {
    target: (i32, i32),
    move_deadline: u64,
    anim_deadline: u64,
    clock: u64,
    step_interval: u64,
    frame_time: u64,
}

impl MovementController {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            target: (0, 0),
            move_deadline: 0,
            anim_deadline: 0,
            clock: 0,
            step_interval: config.move_step_interval,
            frame_time: config.frame_time,
        }
    }

    pub fn target(&self) -> (i32, i32) {
        self.target
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Retargets and makes both the next step and the next frame due now,
    /// which also supersedes any move in flight.
    pub fn set_destination(&mut self, x: i32, y: i32) {
        self.target = (x, y);
        self.move_deadline = self.clock;
        self.anim_deadline = self.clock;
    }

    pub fn run_tick<B: WalkerBody + ?Sized>(&mut self, delta: u64, body: &mut B) {
        self.clock = self.clock.saturating_add(delta);
        if self.clock < self.move_deadline {
            return;
        }

        let (target_x, target_y) = self.target;
        let (mut x, mut y) = body.visual_pos();
        let mut sign_x = axis_sign(x, target_x);
        let mut sign_y = axis_sign(y, target_y);

        x = x.saturating_add(sign_x);
        y = y.saturating_add(sign_y);

        if sign_x != axis_sign(x, target_x) {
            x = target_x;
            sign_x = 0;
        }
        if sign_y != axis_sign(y, target_y) {
            y = target_y;
            sign_y = 0;
        }

        let facing = if axis_distance(x, target_x) > axis_distance(y, target_y) {
            // Horizontal facing keeps the source sprite convention: side
            // frames drawn unflipped are labelled `Left`.
            if sign_x >= 0 {
                Direction::Left
            } else {
                Direction::Right
            }
        } else if sign_y >= 0 {
            Direction::Down
        } else {
            Direction::Up
        };

        body.place_visual(x, y);
        self.move_deadline = self.clock.saturating_add(self.step_interval);

        if self.clock >= self.anim_deadline {
            if sign_x == 0 && sign_y == 0 {
                body.stop_frame(facing);
            } else {
                body.advance_frame(facing);
            }
            self.anim_deadline = self.clock.saturating_add(self.frame_time);
        }
    }
}

fn axis_sign(from: i32, to: i32) -> i32 {
    to.cmp(&from) as i32
}

fn axis_distance(from: i32, to: i32) -> u32 {
    from.abs_diff(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        position: (i32, i32),
        advances: Vec<Direction>,
        stops: usize,
    }

    impl WalkerBody for Recorder {
        fn visual_pos(&self) -> (i32, i32) {
            self.position
        }

        fn place_visual(&mut self, x: i32, y: i32) {
            self.position = (x, y);
        }

        fn advance_frame(&mut self, facing: Direction) {
            self.advances.push(facing);
        }

        fn stop_frame(&mut self, _facing: Direction) {
            self.stops += 1;
        }
    }

    fn config(step: u64, frame: u64) -> WorldConfig {
        WorldConfig {
            move_step_interval: step,
            frame_time: frame,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn converges_exactly_without_overshoot() {
        let mut walker = MovementController::new(&config(10, 40));
        let mut body = Recorder {
            position: (0, 0),
            ..Recorder::default()
        };
        walker.set_destination(16, -5);

        let mut max_x = 0;
        let mut min_y = 0;
        for _ in 0..40 {
            walker.run_tick(10, &mut body);
            max_x = max_x.max(body.position.0);
            min_y = min_y.min(body.position.1);
        }

        assert_eq!(body.position, (16, -5));
        assert_eq!((max_x, min_y), (16, -5));
    }

    #[test]
    fn both_axes_step_together() {
        let mut walker = MovementController::new(&config(10, 1_000));
        let mut body = Recorder::default();
        walker.set_destination(3, 3);

        walker.run_tick(1, &mut body);
        assert_eq!(body.position, (1, 1));
    }

    #[test]
    fn ticks_before_deadline_are_noops() {
        let mut walker = MovementController::new(&config(10, 1_000));
        let mut body = Recorder::default();
        walker.set_destination(0, 8);

        walker.run_tick(1, &mut body);
        assert_eq!(body.position, (0, 1));
        for _ in 0..9 {
            walker.run_tick(1, &mut body);
        }
        assert_eq!(body.position, (0, 1));
        walker.run_tick(1, &mut body);
        assert_eq!(body.position, (0, 2));
    }

    #[test]
    fn new_destination_is_due_immediately() {
        let mut walker = MovementController::new(&config(100, 1_000));
        let mut body = Recorder::default();
        walker.set_destination(10, 0);
        walker.run_tick(1, &mut body);
        assert_eq!(body.position, (1, 0));

        walker.set_destination(-10, 0);
        walker.run_tick(1, &mut body);
        assert_eq!(body.position, (0, 0));
    }

    #[test]
    fn facing_follows_larger_residual() {
        let mut walker = MovementController::new(&config(1, 1));
        let mut body = Recorder::default();

        walker.set_destination(0, 8);
        walker.run_tick(1, &mut body);
        assert_eq!(body.advances.last(), Some(&Direction::Down));

        walker.set_destination(0, -8);
        walker.run_tick(1, &mut body);
        assert_eq!(body.advances.last(), Some(&Direction::Up));

        walker.set_destination(8, 0);
        walker.run_tick(1, &mut body);
        assert_eq!(body.advances.last(), Some(&Direction::Left));

        walker.set_destination(-8, 0);
        walker.run_tick(1, &mut body);
        assert_eq!(body.advances.last(), Some(&Direction::Right));
    }

    #[test]
    fn equal_residuals_take_vertical_branch() {
        let mut walker = MovementController::new(&config(1, 1));
        let mut body = Recorder::default();
        walker.set_destination(-4, -4);

        walker.run_tick(1, &mut body);
        assert_eq!(body.position, (-1, -1));
        assert_eq!(body.advances, vec![Direction::Up]);
    }

    #[test]
    fn animation_only_advances_on_step_ticks_after_frame_time() {
        let mut walker = MovementController::new(&config(10, 30));
        let mut body = Recorder::default();
        walker.set_destination(0, 16);

        for _ in 0..60 {
            walker.run_tick(1, &mut body);
        }

        // steps at clock 1, 11, 21, 31, 41, 51; frames at 1 and 31
        assert_eq!(body.position, (0, 6));
        assert_eq!(body.advances.len(), 2);
        assert_eq!(body.stops, 0);
    }

    #[test]
    fn far_targets_step_without_overflow() {
        let mut walker = MovementController::new(&config(1, 1));
        let mut body = Recorder {
            position: (i32::MIN, 0),
            ..Recorder::default()
        };
        walker.set_destination(i32::MAX, 0);

        walker.run_tick(1, &mut body);
        assert_eq!(body.position, (i32::MIN + 1, 0));
        assert_eq!(body.advances, vec![Direction::Left]);
    }

    #[test]
    fn arrival_signals_stop_frame() {
        let mut walker = MovementController::new(&config(1, 1));
        let mut body = Recorder::default();
        walker.set_destination(2, 0);

        walker.run_tick(1, &mut body);
        walker.run_tick(1, &mut body);
        assert_eq!(body.position, (2, 0));
        assert_eq!(body.stops, 1);

        walker.run_tick(1, &mut body);
        assert_eq!(body.stops, 2);
    }
}
