use crate::collision::CollisionSynthesizer;
use crate::document::{
    EnemyDef, EnemyKind, EnemyProperties, EnemyType, MapDocument, Position, TileDef,
};
use crate::grid::TileGrid;
use crate::io::Map;
use crate::tile::TileType;
use macroquad::math::Rect;

/// Click radius in pixels within which enemy removal picks a target.
pub const ENEMY_PICK_RADIUS: f32 = 32.0;

/// The interactive tool currently driving click handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    None,
    PlaceSolid,
    Erase,
    PlacePlayer,
    PlacePortal,
    PlaceEnemy,
}

/// Translates editor events into lockstep mutations of the dense grid and the
/// sparse document, and keeps collision bodies and the visual layer
/// invalidated accordingly.
///
/// The document and grid never diverge: every placement writes both sides,
/// every erase removes both sides.
pub struct EditorReconciler {
    tool: Tool,
    sprite_variant: Option<u8>,
    place_type: TileType,
    enemy_kind: EnemyKind,
    enemy_type: EnemyType,
    document: MapDocument,
    grid: TileGrid,
    collision: CollisionSynthesizer,
    next_enemy_seq: u64,
}

impl EditorReconciler {
    /// Open an editing session over a validated document.
    pub fn new(mut document: MapDocument) -> Self {
        document.validate();
        let grid = TileGrid::from_document(&document);
        let mut collision = CollisionSynthesizer::new();
        collision.rebuild(&grid);
        // Continue numbering after any enemy-N ids already in the document.
        let next_enemy_seq = document
            .enemies
            .iter()
            .filter_map(|e| e.id.strip_prefix("enemy-")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        EditorReconciler {
            tool: Tool::None,
            sprite_variant: None,
            place_type: TileType::Ground,
            enemy_kind: EnemyKind::default(),
            enemy_type: EnemyType::default(),
            document,
            grid,
            collision,
            next_enemy_seq,
        }
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Sprite-variant index applied to subsequently placed tiles; `None`
    /// places the default skin.
    pub fn select_sprite_variant(&mut self, variant: Option<u8>) {
        self.sprite_variant = variant;
    }

    /// Tile type used by the place-solid tool.
    pub fn select_tile_type(&mut self, tile: TileType) {
        self.place_type = tile;
    }

    /// Enemy flavour used by the place-enemy tool.
    pub fn select_enemy(&mut self, kind: EnemyKind, enemy_type: EnemyType) {
        self.enemy_kind = kind;
        self.enemy_type = enemy_type;
    }

    pub fn document(&self) -> &MapDocument {
        &self.document
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// The grid with its redraw flag, for the renderer.
    pub fn grid_mut(&mut self) -> &mut TileGrid {
        &mut self.grid
    }

    /// Collision bodies, rebuilt first if any edit invalidated them.
    pub fn collision_bodies(&mut self) -> &[Rect] {
        self.collision.ensure_built(&self.grid);
        self.collision.bodies()
    }

    /// Dispatch a click in world pixels through the selected tool.
    pub fn handle_click(&mut self, px: f32, py: f32) {
        let (tx, ty) = self.grid.world_to_tile(px, py);
        match self.tool {
            Tool::None => {}
            Tool::PlaceSolid => self.place_tile(tx, ty, self.place_type),
            Tool::Erase => self.erase_tile(tx, ty),
            Tool::PlacePlayer => self.place_player(px, py),
            Tool::PlacePortal => self.place_portal(px, py),
            Tool::PlaceEnemy => {
                self.place_enemy(self.enemy_kind, self.enemy_type, px, py);
            }
        }
    }

    /// Place a tile, replacing any document entry at that coordinate
    /// (last write wins). Silent no-op outside the grid.
    pub fn place_tile(&mut self, tx: i32, ty: i32, tile: TileType) {
        if tile == TileType::Empty {
            self.erase_tile(tx, ty);
            return;
        }
        if !self.grid.set_tile(tx, ty, tile, self.sprite_variant) {
            return;
        }
        let def = TileDef {
            x: tx,
            y: ty,
            tile_type: tile.code(),
            sprite_variant: self.sprite_variant,
        };
        match self.document.tiles.iter_mut().find(|t| t.x == tx && t.y == ty) {
            Some(existing) => *existing = def,
            None => self.document.tiles.push(def),
        }
        self.collision.invalidate();
    }

    /// Clear a cell and its document entry; no-op when already empty.
    pub fn erase_tile(&mut self, tx: i32, ty: i32) {
        if self.grid.get_tile(tx, ty) == TileType::Empty {
            return;
        }
        self.grid.set_tile(tx, ty, TileType::Empty, None);
        self.document.tiles.retain(|t| !(t.x == tx && t.y == ty));
        self.collision.invalidate();
    }

    /// Move the single player spawn (singleton by replacement).
    pub fn place_player(&mut self, px: f32, py: f32) {
        self.document.player.start_position = Position { x: px, y: py };
    }

    /// Move the single portal (singleton by replacement).
    pub fn place_portal(&mut self, px: f32, py: f32) {
        self.document.portal.position = Position { x: px, y: py };
    }

    /// Append a new enemy record with a fresh sequential id and default
    /// properties for its flavour. Returns the generated id.
    pub fn place_enemy(
        &mut self,
        kind: EnemyKind,
        enemy_type: EnemyType,
        px: f32,
        py: f32,
    ) -> String {
        self.next_enemy_seq += 1;
        let id = format!("enemy-{}", self.next_enemy_seq);
        let properties = match enemy_type {
            EnemyType::Enemy1 => EnemyProperties::default(),
            EnemyType::Enemy2 => EnemyProperties {
                health: 50.0,
                damage: 15.0,
                ..EnemyProperties::default()
            },
        };
        self.document.enemies.push(EnemyDef {
            id: id.clone(),
            kind,
            enemy_type,
            position: Position { x: px, y: py },
            properties,
        });
        id
    }

    /// Delete the enemy nearest to the click within [`ENEMY_PICK_RADIUS`].
    /// On equidistant candidates the first in list order wins. Returns the
    /// removed id, or `None` when nothing was in range.
    pub fn remove_enemy_near(&mut self, px: f32, py: f32) -> Option<String> {
        let mut best: Option<(usize, f32)> = None;
        for (i, e) in self.document.enemies.iter().enumerate() {
            let dx = e.position.x - px;
            let dy = e.position.y - py;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > ENEMY_PICK_RADIUS {
                continue;
            }
            // Strict less-than keeps the earliest entry on ties.
            if best.map_or(true, |(_, d)| dist < d) {
                best = Some((i, dist));
            }
        }
        best.map(|(i, _)| self.document.enemies.remove(i).id)
    }

    /// Capture the current editor state as a fresh document snapshot with a
    /// regenerated creation timestamp.
    pub fn snapshot(&self) -> MapDocument {
        let mut doc = self.document.clone();
        doc.touch();
        doc
    }

    /// Rebuild the session around new world dimensions. Grids never reshape
    /// in place: the document's tile list is revalidated against the new
    /// bounds (dropping anything now out of range) and a new grid is built.
    pub fn resize_world(&mut self, width: u32, height: u32) {
        self.document.world.width = width;
        self.document.world.height = height;
        self.document.validate();
        self.grid = TileGrid::from_document(&self.document);
        self.collision.invalidate();
    }

    /// Hand the session state over to the runtime as a playable map.
    pub fn into_map(self) -> Map {
        Map::from_document(self.document)
    }
}
