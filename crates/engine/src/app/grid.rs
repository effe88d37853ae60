use tracing::info;

use crate::config::WorldConfig;
use crate::content::{read_map_file, ContentError, MapDescription, MapId, MapRecord, MapRegistry};

use super::rendering::{DrawItem, RenderSink, PRIORITY_GROUND};
use super::texture::{TextureRef, TextureSource};

/// Collision value for cells nobody authored and for everything off the map.
pub const BLOCKING_COLLISION: u8 = 1;

/// Tile and collision storage for the active map.
///
/// Storage is column-major (`[x][y]`) and only grows while a map is being
/// loaded. `tiles` and `collision` always have identical extents.
#[derive(Debug, Clone)]
pub struct GridMap {
    tiles: Vec<Vec<TextureRef>>,
    collision: Vec<Vec<u8>>,
    height: usize,
    spawn: (i32, i32),
    current_map: Option<MapId>,
    tile_size: i32,
    missing_texture: TextureRef,
}

impl GridMap {
    pub fn new(config: &WorldConfig, missing_texture: TextureRef) -> Self {
        Self {
            tiles: Vec::new(),
            collision: Vec::new(),
            height: 0,
            spawn: (0, 0),
            current_map: None,
            tile_size: config.tile_size,
            missing_texture,
        }
    }

    pub fn width(&self) -> usize {
        self.tiles.len()
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn spawn(&self) -> (i32, i32) {
        self.spawn
    }

    pub fn current_map(&self) -> Option<MapId> {
        self.current_map
    }

    pub fn load_map(
        &mut self,
        map_id: MapId,
        registry: &MapRegistry,
        textures: &mut dyn TextureSource,
    ) -> Result<(), ContentError> {
        let path = registry.resolve(map_id)?;
        let description = read_map_file(path, registry.base_dir())?;
        self.apply_map(map_id, &description, textures);
        Ok(())
    }

    /// Rebuilds the grid from an already parsed map. Prior contents are dropped.
    pub fn apply_map(
        &mut self,
        map_id: MapId,
        description: &MapDescription,
        textures: &mut dyn TextureSource,
    ) {
        self.current_map = Some(map_id);
        self.resize(-1, -1, true);
        self.spawn = description.spawn;

        let mut tile_count = 0usize;
        let mut object_count = 0usize;
        for record in &description.records {
            match record {
                MapRecord::Tile {
                    x,
                    y,
                    texture_path,
                    collision,
                    layer: _,
                } => {
                    if *x < 0 || *y < 0 {
                        continue;
                    }
                    self.resize(*x, *y, false);
                    let (column, row) = (*x as usize, *y as usize);
                    self.tiles[column][row] = textures.load(texture_path);
                    self.collision[column][row] = *collision;
                    tile_count += 1;
                }
                MapRecord::Object { .. } => object_count += 1,
            }
        }

        info!(
            map_id = map_id.0,
            width = self.width(),
            height = self.height(),
            spawn_x = self.spawn.0,
            spawn_y = self.spawn.1,
            tile_count,
            object_count,
            "map_loaded"
        );
    }

    /// Makes cell `(x, y)` addressable.
    ///
    /// `absolute` resets storage to exactly `(x + 1, y + 1)` cells and drops
    /// all content; otherwise each axis only ever grows. New cells hold the
    /// missing texture and are blocking.
    pub fn resize(&mut self, x: i32, y: i32, absolute: bool) {
        let wanted_width = (x.saturating_add(1)).max(0) as usize;
        let wanted_height = (y.saturating_add(1)).max(0) as usize;

        let (width, height) = if absolute {
            self.tiles.clear();
            self.collision.clear();
            (wanted_width, wanted_height)
        } else {
            (
                self.width().max(wanted_width),
                self.height.max(wanted_height),
            )
        };

        self.tiles.resize_with(width, Vec::new);
        self.collision.resize_with(width, Vec::new);
        for column in &mut self.tiles {
            column.resize(height, self.missing_texture);
        }
        for column in &mut self.collision {
            column.resize(height, BLOCKING_COLLISION);
        }
        self.height = height;
    }

    /// Off-map coordinates on either axis are blocking.
    pub fn collision_at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 {
            return BLOCKING_COLLISION;
        }
        self.collision
            .get(x as usize)
            .and_then(|column| column.get(y as usize))
            .copied()
            .unwrap_or(BLOCKING_COLLISION)
    }

    pub fn tile_at(&self, x: i32, y: i32) -> Option<TextureRef> {
        if x < 0 || y < 0 {
            return None;
        }
        self.tiles
            .get(x as usize)
            .and_then(|column| column.get(y as usize))
            .copied()
    }

    pub fn render(&self, sink: &mut dyn RenderSink) {
        for (x, column) in self.tiles.iter().enumerate() {
            for (y, texture) in column.iter().enumerate() {
                sink.submit(DrawItem {
                    texture: *texture,
                    x: (x as i32).saturating_mul(self.tile_size),
                    y: (y as i32).saturating_mul(self.tile_size),
                    flip_horizontal: false,
                    flip_vertical: false,
                    priority: PRIORITY_GROUND,
                });
            }
        }
    }
}
