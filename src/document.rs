use crate::error::ValidationWarning;
use crate::tile::{TileType, TILE_SIZE};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Schema version written by this build. Loaded documents keep whatever
/// version they arrived with; saving never silently upgrades the tag.
pub const SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub name: String,
    pub description: String,
    pub created: String,
    pub author: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Metadata {
            name: "Untitled".to_owned(),
            description: String::new(),
            created: unix_timestamp(),
            author: String::new(),
        }
    }
}

/// World dimensions in tile units plus the pixel size of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldDef {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
}

fn default_tile_size() -> f32 {
    TILE_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDef {
    pub start_position: Position,
    #[serde(default = "default_character")]
    pub character: String,
}

fn default_character() -> String {
    "player1".to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalDef {
    pub position: Position,
    #[serde(default = "default_portal_size")]
    pub size: Size,
}

fn default_portal_size() -> Size {
    Size { width: 64.0, height: 96.0 }
}

/// Movement behaviour of a placed enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    #[default]
    Stationary,
    Moving,
    Patrol,
}

/// Which enemy sprite family the record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyType {
    #[default]
    Enemy1,
    Enemy2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnemyProperties {
    pub damage: f32,
    pub health: f32,
    pub speed: f32,
    pub patrol_range: f32,
}

impl Default for EnemyProperties {
    fn default() -> Self {
        EnemyProperties {
            damage: 10.0,
            health: 30.0,
            speed: 60.0,
            patrol_range: 96.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyDef {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: EnemyKind,
    #[serde(default)]
    pub enemy_type: EnemyType,
    pub position: Position,
    #[serde(default)]
    pub properties: EnemyProperties,
}

/// One sparse entry of the authored tile list, in tile-grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDef {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub tile_type: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite_variant: Option<u8>,
}

/// The persisted, authoritative map description.
///
/// Field declaration order is the serialized key order; keep it stable so two
/// saves of the same document are byte-identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub world: WorldDef,
    pub player: PlayerDef,
    pub portal: PortalDef,
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
    #[serde(default)]
    pub tiles: Vec<TileDef>,
    // Reserved extension lists; round-trip losslessly, unused by gameplay.
    #[serde(default)]
    pub platforms: Vec<JsonValue>,
    #[serde(default)]
    pub collectibles: Vec<JsonValue>,
    #[serde(default)]
    pub checkpoints: Vec<JsonValue>,
}

impl MapDocument {
    /// A blank document for the editor's "new map" path: nominal spawn just
    /// above the ground band, portal near the right edge.
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        let ts = TILE_SIZE;
        let ground_top =
            height.saturating_sub(crate::collision::GROUND_BAND_ROWS as u32) as f32 * ts;
        MapDocument {
            version: SCHEMA_VERSION.to_owned(),
            metadata: Metadata {
                name: name.to_owned(),
                ..Metadata::default()
            },
            world: WorldDef { width, height, tile_size: ts },
            player: PlayerDef {
                start_position: Position { x: 2.0 * ts, y: ground_top - ts },
                character: default_character(),
            },
            portal: PortalDef {
                position: Position {
                    x: (width.saturating_sub(2)) as f32 * ts,
                    y: ground_top - 96.0,
                },
                size: default_portal_size(),
            },
            enemies: Vec::new(),
            tiles: Vec::new(),
            platforms: Vec::new(),
            collectibles: Vec::new(),
            checkpoints: Vec::new(),
        }
    }

    /// Best-effort validation: drops out-of-range or unknown-typed records,
    /// deduplicates the tile list (last write wins) and flags unrecognized
    /// schema versions. Never fails; everything dropped becomes a warning.
    pub fn validate(&mut self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if self.version != SCHEMA_VERSION {
            warnings.push(ValidationWarning::UnknownVersion {
                version: self.version.clone(),
            });
        }

        let (w, h) = (self.world.width as i32, self.world.height as i32);

        // Last write per coordinate wins; reverse scan keeps the final entry
        // for each (x, y) while preserving relative order.
        let mut seen: HashSet<(i32, i32)> = HashSet::new();
        let mut kept: Vec<TileDef> = Vec::with_capacity(self.tiles.len());
        let mut tile_warnings = Vec::new();
        for tile in self.tiles.iter().rev() {
            if !seen.insert((tile.x, tile.y)) {
                continue;
            }
            if tile.x < 0 || tile.x >= w || tile.y < 0 || tile.y >= h {
                tile_warnings.push(ValidationWarning::TileOutOfRange { x: tile.x, y: tile.y });
                continue;
            }
            if TileType::from_code(tile.tile_type).is_none() {
                tile_warnings.push(ValidationWarning::UnknownTileType {
                    x: tile.x,
                    y: tile.y,
                    code: tile.tile_type,
                });
                continue;
            }
            kept.push(*tile);
        }
        kept.reverse();
        tile_warnings.reverse();
        warnings.extend(tile_warnings);
        self.tiles = kept;

        let world_px = Size {
            width: w as f32 * self.world.tile_size,
            height: h as f32 * self.world.tile_size,
        };
        self.enemies.retain(|e| {
            let inside = e.position.x >= 0.0
                && e.position.x < world_px.width
                && e.position.y >= 0.0
                && e.position.y < world_px.height;
            if !inside {
                warnings.push(ValidationWarning::EnemyOutOfRange { id: e.id.clone() });
            }
            inside
        });

        warnings
    }

    /// Refresh the creation timestamp; used when the editor captures a new
    /// snapshot, never on plain save.
    pub fn touch(&mut self) {
        self.metadata.created = unix_timestamp();
    }
}

fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_default()
}
