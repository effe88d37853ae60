use std::path::Path;

use crate::config::WorldConfig;

use super::grid::GridMap;
use super::input::{Direction, InputSource};
use super::movement::{MovementController, WalkerBody};
use super::rendering::{DrawItem, RenderSink, PRIORITY_ENTITY};
use super::texture::{TextureRef, TextureSource};

/// Off-screen tile used until something places the entity.
pub const UNPLACED_TILE: (i32, i32) = (-1, -1);

const PLAYER_LOOP_FRAME: usize = 1;
const PLAYER_END_FRAME: usize = 4;
const PLAYER_STOP_FRAME: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Base,
    Player { slot: usize },
}

/// Frame cursor for a walk cycle: frame 0 is the idle pose, frames
/// `loop_frame..=end_frame` repeat while walking and `stop_frame` is the
/// alternate rest pose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationCursor {
    pub current_frame: usize,
    pub loop_frame: usize,
    pub end_frame: usize,
    pub stop_frame: usize,
}

impl AnimationCursor {
    pub fn walk_cycle(loop_frame: usize, end_frame: usize, stop_frame: usize) -> Self {
        Self {
            current_frame: 0,
            loop_frame,
            end_frame,
            stop_frame,
        }
    }

    pub fn advance(&mut self) {
        self.current_frame += 1;
        if self.current_frame > self.end_frame {
            self.current_frame = self.loop_frame;
        }
    }

    /// Mid-cycle frames snap to `stop_frame`, `stop_frame` snaps to 0 and 0
    /// stays 0. Repeated stops after a walk therefore settle on frame 0.
    pub fn stop(&mut self) {
        if self.current_frame != self.stop_frame && self.current_frame != 0 {
            self.current_frame = self.stop_frame;
        } else if self.current_frame != 0 {
            self.current_frame = 0;
        }
    }

    pub fn is_at_rest(&self) -> bool {
        self.current_frame == 0 || self.current_frame == self.stop_frame
    }
}

/// The part of an entity its walker is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityVisual {
    pub position: (i32, i32),
    pub facing: Direction,
    pub animation: AnimationCursor,
}

impl WalkerBody for EntityVisual {
    fn visual_pos(&self) -> (i32, i32) {
        self.position
    }

    fn place_visual(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    fn advance_frame(&mut self, facing: Direction) {
        self.facing = facing;
        self.animation.advance();
    }

    // Facing is left alone so an entity keeps looking the way it walked.
    fn stop_frame(&mut self, _facing: Direction) {
        self.animation.stop();
    }
}

/// Per-facing frame lists. Right reuses the side frames mirrored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteFrames {
    pub up: Vec<TextureRef>,
    pub down: Vec<TextureRef>,
    pub side: Vec<TextureRef>,
    pub missing: TextureRef,
}

impl SpriteFrames {
    pub fn placeholder(missing: TextureRef) -> Self {
        Self {
            up: vec![missing],
            down: vec![missing],
            side: vec![missing],
            missing,
        }
    }

    /// Returns the texture and whether it must be drawn mirrored.
    pub fn frame(&self, facing: Direction, index: usize) -> (TextureRef, bool) {
        let (frames, flip) = match facing {
            Direction::Up => (&self.up, false),
            Direction::Down => (&self.down, false),
            Direction::Left => (&self.side, false),
            Direction::Right => (&self.side, true),
        };
        (frames.get(index).copied().unwrap_or(self.missing), flip)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAppearance {
    Male,
    Female,
}

impl PlayerAppearance {
    pub fn for_slot(slot: usize) -> Self {
        if slot % 2 == 0 {
            PlayerAppearance::Male
        } else {
            PlayerAppearance::Female
        }
    }

    fn sprite_dir(self) -> &'static str {
        match self {
            PlayerAppearance::Male => "data/sprite/mc_male",
            PlayerAppearance::Female => "data/sprite/mc_female",
        }
    }

    /// Six frames per facing: rest, step, rest, step, rest, stop pose.
    /// Only the side view has a distinct stop pose.
    pub fn load_frames(self, root: &Path, textures: &mut dyn TextureSource) -> SpriteFrames {
        let dir = root.join(self.sprite_dir());
        let mut load = |names: [&str; 6]| -> Vec<TextureRef> {
            names
                .iter()
                .map(|name| textures.load(&dir.join(format!("{name}.png"))))
                .collect()
        };
        let up = load(["u", "u1", "u", "u2", "u", "u"]);
        let down = load(["d", "d1", "d", "d2", "d", "d"]);
        let side = load(["s", "s1", "s", "s2", "s", "s3"]);
        SpriteFrames {
            up,
            down,
            side,
            missing: textures.missing(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    kind: EntityKind,
    logical_pos: (i32, i32),
    footprint: (i32, i32),
    visual: EntityVisual,
    walker: Option<MovementController>,
    camera_anchor: bool,
    frames: SpriteFrames,
    tile_size: i32,
}

impl Entity {
    /// A static 1x1 entity parked off-screen with placeholder frames.
    pub fn new(config: &WorldConfig, missing_texture: TextureRef) -> Self {
        let mut entity = Self {
            kind: EntityKind::Base,
            logical_pos: UNPLACED_TILE,
            footprint: (1, 1),
            visual: EntityVisual {
                position: (0, 0),
                facing: Direction::Down,
                animation: AnimationCursor::default(),
            },
            walker: None,
            camera_anchor: false,
            frames: SpriteFrames::placeholder(missing_texture),
            tile_size: config.tile_size,
        };
        entity.set_logical_pos(UNPLACED_TILE.0, UNPLACED_TILE.1, false);
        entity
    }

    /// An input-driven, camera-tracked walker placed on the grid spawn.
    pub fn player(slot: usize, frames: SpriteFrames, grid: &GridMap, config: &WorldConfig) -> Self {
        let mut entity = Self::new(config, frames.missing)
            .with_walker(config)
            .with_camera_anchor(true)
            .with_frames(frames)
            .with_animation(AnimationCursor::walk_cycle(
                PLAYER_LOOP_FRAME,
                PLAYER_END_FRAME,
                PLAYER_STOP_FRAME,
            ));
        entity.kind = EntityKind::Player { slot };
        let (spawn_x, spawn_y) = grid.spawn();
        entity.set_logical_pos(spawn_x, spawn_y, false);
        entity
    }

    pub fn with_walker(mut self, config: &WorldConfig) -> Self {
        let mut walker = MovementController::new(config);
        let (x, y) = self.visual.position;
        walker.set_destination(x, y);
        self.walker = Some(walker);
        self
    }

    pub fn with_footprint(mut self, width: i32, height: i32) -> Self {
        self.footprint = (width, height);
        self
    }

    pub fn with_camera_anchor(mut self, camera_anchor: bool) -> Self {
        self.camera_anchor = camera_anchor;
        self
    }

    pub fn with_frames(mut self, frames: SpriteFrames) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_animation(mut self, animation: AnimationCursor) -> Self {
        self.visual.animation = animation;
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn logical_pos(&self) -> (i32, i32) {
        self.logical_pos
    }

    pub fn visual_pos(&self) -> (i32, i32) {
        self.visual.position
    }

    pub fn footprint(&self) -> (i32, i32) {
        self.footprint
    }

    pub fn facing(&self) -> Direction {
        self.visual.facing
    }

    pub fn animation(&self) -> &AnimationCursor {
        &self.visual.animation
    }

    pub fn walker(&self) -> Option<&MovementController> {
        self.walker.as_ref()
    }

    pub fn is_camera_anchor(&self) -> bool {
        self.camera_anchor
    }

    /// Updates the tile position right away. The visual position follows
    /// through the walker when `animate` is set and a walker exists,
    /// otherwise it snaps.
    pub fn set_logical_pos(&mut self, x: i32, y: i32, animate: bool) {
        self.logical_pos = (x, y);
        self.set_visual_pos(
            x.saturating_mul(self.tile_size),
            y.saturating_mul(self.tile_size),
            animate,
        );
    }

    pub fn set_visual_pos(&mut self, x: i32, y: i32, animate: bool) {
        let animated = match self.walker.as_mut() {
            Some(walker) => {
                walker.set_destination(x, y);
                animate
            }
            None => false,
        };
        if !animated {
            self.visual.position = (x, y);
        }
    }

    pub fn visual_center(&self) -> (i32, i32) {
        let (x, y) = self.visual.position;
        (
            x.saturating_add(self.tile_size.saturating_mul(self.footprint.0) / 2),
            y.saturating_add(self.tile_size.saturating_mul(self.footprint.1) / 2),
        )
    }

    pub fn advance_frame(&mut self, facing: Direction) {
        self.visual.advance_frame(facing);
    }

    pub fn stop_frame(&mut self, facing: Direction) {
        self.visual.stop_frame(facing);
    }

    /// Highest collision value under the footprint moved by the offset.
    pub fn check_collision(&self, grid: &GridMap, offset_x: i32, offset_y: i32) -> u8 {
        let origin_x = self.logical_pos.0.saturating_add(offset_x);
        let origin_y = self.logical_pos.1.saturating_add(offset_y);
        let mut collision = 0;
        for dx in 0..self.footprint.0 {
            for dy in 0..self.footprint.1 {
                collision = collision.max(grid.collision_at(origin_x.saturating_add(dx), origin_y.saturating_add(dy)));
            }
        }
        collision
    }

    pub fn run_tick(&mut self, delta: u64, grid: &GridMap, input: &dyn InputSource) {
        if let Some(walker) = self.walker.as_mut() {
            walker.run_tick(delta, &mut self.visual);
        }

        if let EntityKind::Player { slot } = self.kind {
            self.apply_player_input(slot, grid, input);
        }
    }

    // New moves are only taken from a rest pose; each held direction is
    // checked against the position left by the ones before it.
    fn apply_player_input(&mut self, slot: usize, grid: &GridMap, input: &dyn InputSource) {
        if !self.visual.animation.is_at_rest() {
            return;
        }
        for direction in Direction::POLL_ORDER {
            if !input.is_direction_active(slot, direction) {
                continue;
            }
            let (dx, dy) = direction.tile_offset();
            if self.check_collision(grid, dx, dy) < 1 {
                let (x, y) = self.logical_pos;
                self.set_logical_pos(x.saturating_add(dx), y.saturating_add(dy), true);
            }
        }
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        let (texture, flip_horizontal) = self
            .frames
            .frame(self.visual.facing, self.visual.animation.current_frame);
        let (x, y) = self.visual.position;
        sink.submit(DrawItem {
            texture,
            x,
            y,
            flip_horizontal,
            flip_vertical: false,
            priority: PRIORITY_ENTITY,
        });
    }
}
