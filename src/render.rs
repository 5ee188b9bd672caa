use crate::grid::TileGrid;
use crate::tile::TileType;
use anyhow::Context;
use macroquad::prelude::*;

/// One atlas texture holding every tile skin: one row per tile-type code
/// (ground, wall, platform, ...), one column per sprite variant.
pub struct TileAtlas {
    pub texture: Texture2D,
    pub columns: u32,
    pub tile_px: u32,
    pub spacing: u32,
    pub margin: u32,
}

impl TileAtlas {
    /// Load the atlas image with pixel-art-friendly filtering.
    pub async fn load(path: &str, columns: u32, tile_px: u32) -> anyhow::Result<Self> {
        let texture = load_texture(path)
            .await
            .with_context(|| format!("Loading tile atlas {}", path))?;
        texture.set_filter(FilterMode::Nearest);
        Ok(TileAtlas {
            texture,
            columns,
            tile_px,
            spacing: 0,
            margin: 0,
        })
    }

    /// Source rectangle for a tile type and sprite variant. Variants past the
    /// atlas width wrap around rather than sampling garbage.
    pub fn source_rect(&self, tile: TileType, variant: u8) -> Rect {
        let row = tile.code().saturating_sub(1) as u32;
        let col = variant as u32 % self.columns.max(1);
        let sx = self.margin + col * (self.tile_px + self.spacing);
        let sy = self.margin + row * (self.tile_px + self.spacing);
        Rect::new(sx as f32, sy as f32, self.tile_px as f32, self.tile_px as f32)
    }
}

/// Full visual-layer redraw: every non-empty cell, no per-tile diffing.
/// Edits are user-paced, so redrawing the whole grid is cheap enough, and it
/// clears the grid's redraw flag when done.
pub fn draw_grid(grid: &mut TileGrid, atlas: &TileAtlas) {
    let ts = grid.tile_size();
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let tile = grid.get_tile(x, y);
            if tile == TileType::Empty {
                continue;
            }
            let variant = grid.get_variant(x, y).unwrap_or(0);
            let dest = grid.tile_to_world(x, y);
            draw_texture_ex(
                &atlas.texture,
                dest.x,
                dest.y,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(ts, ts)),
                    source: Some(atlas.source_rect(tile, variant)),
                    ..Default::default()
                },
            );
        }
    }
    grid.mark_redrawn();
}

/// Editor debug overlay: outline every synthesized collision body.
pub fn draw_collision_debug(bodies: &[Rect]) {
    for body in bodies {
        draw_rectangle_lines(body.x, body.y, body.w, body.h, 2.0, GREEN);
    }
}
