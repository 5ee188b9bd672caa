/// Pixel size of one tile in the shipped runtime. The editor may vary it per
/// document; everything here reads the size from the document's world block.
pub const TILE_SIZE: f32 = 32.0;

/// Closed enumeration of tile-type codes as stored in map documents.
///
/// `Spike`, `Ladder` and `Water` are reserved by the editor: they parse and
/// round-trip but do not collide yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TileType {
    Empty = 0,
    Ground = 1,
    Wall = 2,
    Platform = 3,
    Spike = 4,
    Ladder = 5,
    Water = 6,
}

impl TileType {
    /// Decode a stored tile-type code. `None` for codes outside the
    /// enumeration (the validator drops those with a warning).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(TileType::Empty),
            1 => Some(TileType::Ground),
            2 => Some(TileType::Wall),
            3 => Some(TileType::Platform),
            4 => Some(TileType::Spike),
            5 => Some(TileType::Ladder),
            6 => Some(TileType::Water),
            _ => None,
        }
    }

    /// The code written into map documents.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether this tile participates in collision.
    ///
    /// Single source of truth for both collision-body synthesis and the
    /// runtime point-collision check.
    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(self, TileType::Ground | TileType::Wall | TileType::Platform)
    }
}
