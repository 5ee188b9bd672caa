use crate::grid::TileGrid;
use macroquad::math::Rect;

/// Bottom rows reserved as always-solid ground and merged into one body.
///
/// Kept hardcoded for compatibility with existing map files: the band is
/// treated as solid regardless of whether its cells are individually marked
/// in the sparse tile list.
pub const GROUND_BAND_ROWS: usize = 3;

/// Derives the static collision rectangles for a grid and owns the list.
///
/// The list is discarded and regenerated wholesale whenever tiles change —
/// never patched — so consumers only ever see a complete, consistent set.
#[derive(Debug)]
pub struct CollisionSynthesizer {
    bodies: Vec<Rect>,
    dirty: bool,
}

impl CollisionSynthesizer {
    pub fn new() -> Self {
        CollisionSynthesizer {
            bodies: Vec::new(),
            dirty: true,
        }
    }

    /// Mark the cached body list stale. Called after any tile-affecting edit;
    /// the next physics-relevant step rebuilds before use.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Full rebuild from the grid. Deterministic: the merged ground band
    /// first, then one rectangle per solid tile above it in row-major order.
    /// Idempotent and side-effect-free on the grid.
    pub fn rebuild(&mut self, grid: &TileGrid) {
        self.bodies.clear();
        let ts = grid.tile_size();
        let (w, h) = (grid.width(), grid.height());

        let band_rows = GROUND_BAND_ROWS.min(h);
        if band_rows > 0 && w > 0 {
            let top = (h - band_rows) as f32 * ts;
            self.bodies
                .push(Rect::new(0.0, top, w as f32 * ts, band_rows as f32 * ts));
        }

        for y in 0..h.saturating_sub(band_rows) {
            for x in 0..w {
                if grid.get_tile(x as i32, y as i32).is_solid() {
                    let corner = grid.tile_to_world(x as i32, y as i32);
                    self.bodies.push(Rect::new(corner.x, corner.y, ts, ts));
                }
            }
        }
        self.dirty = false;
    }

    /// Rebuild only if an edit invalidated the list since the last build.
    pub fn ensure_built(&mut self, grid: &TileGrid) {
        if self.dirty {
            self.rebuild(grid);
        }
    }

    /// Read-only view of the current body list.
    pub fn bodies(&self) -> &[Rect] {
        &self.bodies
    }
}

impl Default for CollisionSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
