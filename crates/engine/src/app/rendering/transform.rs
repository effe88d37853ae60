/// Pixel-space rectangle the camera shows, described by its center and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub center: (i32, i32),
    pub size: (i32, i32),
}

impl Viewport {
    pub fn left(&self) -> i32 {
        self.center.0.saturating_sub(self.size.0 / 2)
    }

    pub fn top(&self) -> i32 {
        self.center.1.saturating_sub(self.size.1 / 2)
    }

    pub fn overlaps_square(&self, x: i32, y: i32, side: i32) -> bool {
        let overlaps = |start: i32, view_start: i32, view_len: i32| {
            let (start, view_start) = (i64::from(start), i64::from(view_start));
            start + i64::from(side) > view_start && start < view_start + i64::from(view_len)
        };
        overlaps(x, self.left(), self.size.0) && overlaps(y, self.top(), self.size.1)
    }
}

/// Converts a world pixel position to viewport-local pixels (origin top-left).
pub fn world_to_screen_px(viewport: &Viewport, position: (i32, i32)) -> (i32, i32) {
    (
        position.0.saturating_sub(viewport.left()),
        position.1.saturating_sub(viewport.top()),
    )
}
