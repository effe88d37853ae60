mod entity;
mod grid;
mod input;
mod loop_runner;
mod movement;
mod rendering;
mod texture;
mod world;

pub use entity::{
    AnimationCursor, Entity, EntityKind, EntityVisual, PlayerAppearance, SpriteFrames,
    UNPLACED_TILE,
};
pub use grid::{GridMap, BLOCKING_COLLISION};
pub use input::{Direction, InputSnapshot, InputSource, MAX_PLAYER_SLOTS};
pub use loop_runner::{plan_sim_steps, FixedStepDriver, LoopConfig, StepPlan};
pub use movement::{MovementController, WalkerBody};
pub use rendering::{
    world_to_screen_px, DrawItem, RecordingSink, RenderSink, Viewport, PRIORITY_ENTITY,
    PRIORITY_GROUND,
};
pub use texture::{TextureRef, TextureRegistry, TextureSource, MISSING_TEXTURE};
pub use world::{CameraFrame, World};
