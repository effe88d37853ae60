use tracing::info;

use crate::config::WorldConfig;
use crate::content::{ContentError, MapId, MapRegistry};

use super::entity::{Entity, EntityKind};
use super::grid::GridMap;
use super::input::InputSource;
use super::rendering::RenderSink;
use super::texture::TextureSource;

/// Camera placement derived from the anchor entities on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraFrame {
    pub center: (i32, i32),
    pub multiplier: u32,
    pub viewport_size: (i32, i32),
    pub anchor_count: usize,
}

#[derive(Debug, Clone, Copy)]
struct AnchorBounds {
    count: usize,
    sum_x: i64,
    sum_y: i64,
    min_x: i32,
    min_y: i32,
    max_x: i32,
    max_y: i32,
}

impl Default for AnchorBounds {
    fn default() -> Self {
        Self {
            count: 0,
            sum_x: 0,
            sum_y: 0,
            min_x: i32::MAX,
            min_y: i32::MAX,
            max_x: i32::MIN,
            max_y: i32::MIN,
        }
    }
}

impl AnchorBounds {
    fn include(&mut self, (x, y): (i32, i32)) {
        self.count += 1;
        self.sum_x += i64::from(x);
        self.sum_y += i64::from(y);
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn center(&self) -> (i32, i32) {
        if self.count == 0 {
            return (0, 0);
        }
        let count = self.count as i64;
        ((self.sum_x / count) as i32, (self.sum_y / count) as i32)
    }

    fn extent(&self) -> (i64, i64) {
        if self.count == 0 {
            return (0, 0);
        }
        (
            i64::from(self.max_x) - i64::from(self.min_x),
            i64::from(self.max_y) - i64::from(self.min_y),
        )
    }
}

/// Smallest zoom multiplier, never below the baseline, whose viewport covers
/// the anchor spread on both axes. Recomputed from scratch every tick.
///
/// An axis whose viewport span can never grow (zero aspect component or a
/// non-positive tile size) counts as covered.
fn fit_multiplier(config: &WorldConfig, extent: (i64, i64)) -> u32 {
    let tile = i64::from(config.tile_size);
    let axis_multiplier = |aspect: u32, spread: i64| -> i64 {
        let unit = i64::from(aspect) * tile;
        if unit <= 0 || spread <= 0 {
            return 0;
        }
        (spread + unit - 1) / unit
    };

    let needed = axis_multiplier(config.aspect.width, extent.0)
        .max(axis_multiplier(config.aspect.height, extent.1));
    let needed = u32::try_from(needed).unwrap_or(u32::MAX);
    config.zoom_baseline.max(needed)
}

#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    grid: GridMap,
    entities: Vec<Entity>,
    paused: bool,
    camera: CameraFrame,
}

impl World {
    pub fn new(config: WorldConfig, grid: GridMap) -> Self {
        let camera = CameraFrame {
            center: (0, 0),
            multiplier: config.zoom_baseline,
            viewport_size: config.viewport_size(config.zoom_baseline),
            anchor_count: 0,
        };
        Self {
            config,
            grid,
            entities: Vec::new(),
            paused: false,
            camera,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut GridMap {
        &mut self.grid
    }

    /// Adds an entity at the end of the tick order and returns its index.
    pub fn push_entity(&mut self, entity: Entity) -> usize {
        self.entities.push(entity);
        self.entities.len() - 1
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// The primary player is, by convention, the first entity.
    pub fn player(&self) -> Option<&Entity> {
        self.entities.first()
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.entities.first_mut()
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            info!(paused, "world_paused");
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn camera(&self) -> &CameraFrame {
        &self.camera
    }

    pub fn initial_viewport(&self) -> (i32, i32) {
        self.config.viewport_size(self.config.zoom_baseline)
    }

    /// Swaps in another map and moves every player onto its spawn.
    /// On error the current map stays loaded.
    pub fn load_map(
        &mut self,
        map_id: MapId,
        registry: &MapRegistry,
        textures: &mut dyn TextureSource,
    ) -> Result<(), ContentError> {
        self.grid.load_map(map_id, registry, textures)?;
        let (spawn_x, spawn_y) = self.grid.spawn();
        for entity in &mut self.entities {
            if let EntityKind::Player { .. } = entity.kind() {
                entity.set_logical_pos(spawn_x, spawn_y, false);
            }
        }
        Ok(())
    }

    /// Runs one simulation step: draws the grid, ticks and draws every
    /// entity in order, then frames the camera on the anchor entities.
    /// Pausing stops entity logic only.
    pub fn tick(
        &mut self,
        delta: u64,
        input: &dyn InputSource,
        sink: &mut dyn RenderSink,
    ) -> CameraFrame {
        self.grid.render(sink);

        let mut anchors = AnchorBounds::default();
        for entity in &mut self.entities {
            if !self.paused {
                entity.run_tick(delta, &self.grid, input);
            }
            entity.render(sink);

            if entity.is_camera_anchor() {
                anchors.include(entity.visual_center());
            }
        }

        let multiplier = fit_multiplier(&self.config, anchors.extent());
        let camera = CameraFrame {
            center: anchors.center(),
            multiplier,
            viewport_size: self.config.viewport_size(multiplier),
            anchor_count: anchors.count,
        };
        sink.set_viewport_center(camera.center.0, camera.center.1);
        sink.set_viewport_size(camera.viewport_size.0, camera.viewport_size.1);
        self.camera = camera;
        camera
    }
}
