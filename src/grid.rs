use crate::collision::GROUND_BAND_ROWS;
use crate::document::MapDocument;
use crate::tile::TileType;
use macroquad::math::{vec2, Vec2};
use macroquad::rand::gen_range;

/// Dense runtime tile grid derived from a [`MapDocument`].
///
/// Dimensions are immutable after construction; resizing means building a new
/// grid from an updated document, never reshaping in place.
#[derive(Debug)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tile_size: f32,
    cells: Vec<TileType>,
    variants: Vec<Option<u8>>,
    needs_redraw: bool,
}

impl TileGrid {
    /// An all-empty grid. `tile_size` is in pixels.
    pub fn new(width: usize, height: usize, tile_size: f32) -> Self {
        TileGrid {
            width,
            height,
            tile_size,
            cells: vec![TileType::Empty; width * height],
            variants: vec![None; width * height],
            needs_redraw: true,
        }
    }

    /// Rebuild a dense grid from the document's sparse tile list. The list is
    /// expected to be validated; anything still out of range or unknown is
    /// skipped silently here.
    pub fn from_document(doc: &MapDocument) -> Self {
        let mut grid = TileGrid::new(
            doc.world.width as usize,
            doc.world.height as usize,
            doc.world.tile_size,
        );
        for tile in &doc.tiles {
            if let Some(t) = TileType::from_code(tile.tile_type) {
                grid.set_tile(tile.x, tile.y, t, tile.sprite_variant);
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }

    /// Write a tile. Out-of-range writes are a silent no-op so interactive
    /// editing near map edges never faults; returns whether anything changed.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileType, variant: Option<u8>) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        self.cells[i] = tile;
        self.variants[i] = if tile == TileType::Empty { None } else { variant };
        self.needs_redraw = true;
        true
    }

    /// Read a tile; `Empty` for out-of-range queries so callers probing near
    /// the edges never special-case bounds.
    pub fn get_tile(&self, x: i32, y: i32) -> TileType {
        self.index(x, y)
            .map(|i| self.cells[i])
            .unwrap_or(TileType::Empty)
    }

    /// Sprite-variant index recorded at a cell, if any.
    pub fn get_variant(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).and_then(|i| self.variants[i])
    }

    /// World pixel coordinates to the containing tile cell (floor division).
    #[inline]
    pub fn world_to_tile(&self, px: f32, py: f32) -> (i32, i32) {
        (
            (px / self.tile_size).floor() as i32,
            (py / self.tile_size).floor() as i32,
        )
    }

    /// Top-left world pixel corner of a tile cell. Exact inverse of
    /// [`world_to_tile`](Self::world_to_tile) on tile boundaries.
    #[inline]
    pub fn tile_to_world(&self, tx: i32, ty: i32) -> Vec2 {
        vec2(tx as f32 * self.tile_size, ty as f32 * self.tile_size)
    }

    /// Point collision against solid tiles; the runtime physics side of the
    /// single `is_solid` predicate.
    pub fn check_collision(&self, px: f32, py: f32) -> bool {
        let (tx, ty) = self.world_to_tile(px, py);
        self.get_tile(tx, ty).is_solid()
    }

    /// Top row of the reserved ground band (the nominal ground surface).
    fn ground_row(&self) -> i32 {
        self.height.saturating_sub(GROUND_BAND_ROWS) as i32
    }

    /// Pick a spawn point half a tile above a surface.
    ///
    /// Ground mode picks a uniformly random column above the nominal ground
    /// row — even on an all-empty grid, where the caller must tolerate an
    /// overlapping spawn. Platform mode picks a random `Platform` cell and
    /// falls back to ground mode when the map has none.
    pub fn find_spawn_position(&self, prefer_ground: bool) -> Vec2 {
        let half = self.tile_size / 2.0;
        if !prefer_ground {
            let mut platforms = Vec::new();
            for y in 0..self.height as i32 {
                for x in 0..self.width as i32 {
                    if self.get_tile(x, y) == TileType::Platform {
                        platforms.push((x, y));
                    }
                }
            }
            if !platforms.is_empty() {
                let (tx, ty) = platforms[gen_range(0, platforms.len() as u32) as usize];
                let top_left = self.tile_to_world(tx, ty);
                return vec2(top_left.x + half, top_left.y - half);
            }
            // No platforms placed yet; fall through to ground mode.
        }
        let col = gen_range(0, self.width.max(1) as u32) as i32;
        let surface = self.tile_to_world(col, self.ground_row());
        vec2(surface.x + half, surface.y - half)
    }

    /// Whether an edit has invalidated the visual layer since the last full
    /// redraw.
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Called by the renderer once a full redraw has run.
    pub fn mark_redrawn(&mut self) {
        self.needs_redraw = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips_in_bounds() {
        let mut grid = TileGrid::new(4, 4, 32.0);
        for y in 0..4 {
            for x in 0..4 {
                assert!(grid.set_tile(x, y, TileType::Wall, Some(1)));
                assert_eq!(grid.get_tile(x, y), TileType::Wall);
                assert_eq!(grid.get_variant(x, y), Some(1));
            }
        }
    }

    #[test]
    fn out_of_range_access_is_sentinel_not_error() {
        let mut grid = TileGrid::new(4, 4, 32.0);
        for &(x, y) in &[(-1, 0), (0, -1), (4, 0), (0, 4), (100, 100)] {
            assert!(!grid.set_tile(x, y, TileType::Ground, None));
            assert_eq!(grid.get_tile(x, y), TileType::Empty);
            assert_eq!(grid.get_variant(x, y), None);
        }
    }

    #[test]
    fn world_tile_transforms_are_exact_inverses() {
        let grid = TileGrid::new(20, 15, 32.0);
        for ty in 0..15 {
            for tx in 0..20 {
                let w = grid.tile_to_world(tx, ty);
                assert_eq!(grid.world_to_tile(w.x, w.y), (tx, ty));
            }
        }
    }

    #[test]
    fn erasing_restores_pre_placement_state() {
        let mut grid = TileGrid::new(10, 10, 32.0);
        let before: Vec<TileType> = (0..10)
            .flat_map(|y| (0..10).map(move |x| (x, y)))
            .map(|(x, y)| grid.get_tile(x, y))
            .collect();

        grid.set_tile(5, 5, TileType::Wall, Some(2));
        grid.set_tile(5, 5, TileType::Empty, None);

        let after: Vec<TileType> = (0..10)
            .flat_map(|y| (0..10).map(move |x| (x, y)))
            .map(|(x, y)| grid.get_tile(x, y))
            .collect();
        assert_eq!(before, after);
        assert_eq!(grid.get_variant(5, 5), None);
    }

    #[test]
    fn spawn_stays_in_world_bounds_on_empty_grid() {
        let grid = TileGrid::new(10, 10, 32.0);
        macroquad::rand::srand(42);
        for _ in 0..50 {
            let p = grid.find_spawn_position(true);
            assert!(p.x >= 0.0 && p.x < 320.0, "x out of bounds: {}", p.x);
            assert!(p.y >= 0.0 && p.y < 320.0, "y out of bounds: {}", p.y);
        }
    }

    #[test]
    fn platform_spawn_falls_back_to_ground_without_platforms() {
        let grid = TileGrid::new(10, 10, 32.0);
        macroquad::rand::srand(7);
        let p = grid.find_spawn_position(false);
        // Ground row for a 10-row grid is row 7; half a tile above is 208.
        assert_eq!(p.y, 208.0);
    }

    #[test]
    fn platform_spawn_sits_above_a_platform_cell() {
        let mut grid = TileGrid::new(10, 10, 32.0);
        grid.set_tile(4, 5, TileType::Platform, None);
        macroquad::rand::srand(7);
        let p = grid.find_spawn_position(false);
        assert_eq!(p, vec2(4.0 * 32.0 + 16.0, 5.0 * 32.0 - 16.0));
    }

    #[test]
    fn edits_flag_the_visual_layer() {
        let mut grid = TileGrid::new(4, 4, 32.0);
        grid.mark_redrawn();
        assert!(!grid.needs_redraw());
        grid.set_tile(1, 1, TileType::Ground, None);
        assert!(grid.needs_redraw());
    }
}
