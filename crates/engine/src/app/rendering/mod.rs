mod sink;
mod transform;

pub use sink::{DrawItem, RecordingSink, RenderSink, PRIORITY_ENTITY, PRIORITY_GROUND};
pub use transform::{world_to_screen_px, Viewport};
