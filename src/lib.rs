#![warn(missing_docs)]

//! Tile map core, collision synthesis & level editor backend for Macroquad
//! platformers.
//!
//! One [`MapDocument`] drives both gameplay and live editing: the sparse
//! authored JSON is validated into a dense [`TileGrid`], collision rectangles
//! are synthesized wholesale from the grid, and the [`EditorReconciler`]
//! keeps grid and document in lockstep while editing.

mod collision;
mod document;
mod editor;
mod error;
mod grid;
mod io;
mod loader {
    pub mod json_loader;
}
mod render;
mod tile;

pub use collision::{CollisionSynthesizer, GROUND_BAND_ROWS};
pub use document::{
    EnemyDef, EnemyKind, EnemyProperties, EnemyType, MapDocument, Metadata, PlayerDef, PortalDef,
    Position, Size, TileDef, WorldDef, SCHEMA_VERSION,
};
pub use editor::{EditorReconciler, Tool, ENEMY_PICK_RADIUS};
pub use error::{MapError, ValidationWarning};
pub use grid::TileGrid;
pub use io::{
    document_to_json, list_json_maps, save_document, LoadState, LoadTicket, Map, MapLoader,
};
pub use loader::json_loader::{decode_document, decode_document_file, DecodedDocument};
pub use render::{draw_collision_debug, draw_grid, TileAtlas};
pub use tile::{TileType, TILE_SIZE};
