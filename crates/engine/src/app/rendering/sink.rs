use crate::app::TextureRef;

use super::Viewport;

pub const PRIORITY_GROUND: u8 = 0;
pub const PRIORITY_ENTITY: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawItem {
    pub texture: TextureRef,
    pub x: i32,
    pub y: i32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    /// Lower priorities are drawn first.
    pub priority: u8,
}

/// Receiver for everything the simulation wants drawn this tick.
pub trait RenderSink {
    fn submit(&mut self, item: DrawItem);
    fn set_viewport_center(&mut self, x: i32, y: i32);
    fn set_viewport_size(&mut self, width: i32, height: i32);
}

/// Keeps submitted items until cleared. Used by headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    items: Vec<DrawItem>,
    viewport: Viewport,
}

impl RecordingSink {
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items_with_priority(&self, priority: u8) -> impl Iterator<Item = &DrawItem> + '_ {
        self.items
            .iter()
            .filter(move |item| item.priority == priority)
    }

    /// Items whose `tile_size` square overlaps the current viewport.
    pub fn visible_count(&self, tile_size: i32) -> usize {
        self.items
            .iter()
            .filter(|item| self.viewport.overlaps_square(item.x, item.y, tile_size))
            .count()
    }
}

impl RenderSink for RecordingSink {
    fn submit(&mut self, item: DrawItem) {
        self.items.push(item);
    }

    fn set_viewport_center(&mut self, x: i32, y: i32) {
        self.viewport.center = (x, y);
    }

    fn set_viewport_size(&mut self, width: i32, height: i32) {
        self.viewport.size = (width, height);
    }
}
