//! Three-layer tile grid (floor, ceiling, wall).
use glam::Vec2;
use thiserror::Error;

pub const MAP_WIDTH_MAX: usize = 40;
pub const MAP_HEIGHT_MAX: usize = 30;
pub const MAP_WIDTH_DEFAULT: usize = 20;
pub const MAP_HEIGHT_DEFAULT: usize = 15;

/// Index into the texture store.
pub type TextureId = usize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TileKind {
    #[default]
    Empty,
    Solid,
}

impl TileKind {
    /// Numeric code used by the map text format. Anything but 1 is empty.
    pub fn from_code(code: i32) -> Self {
        if code == 1 { TileKind::Solid } else { TileKind::Empty }
    }

    pub fn code(self) -> i32 {
        match self {
            TileKind::Empty => 0,
            TileKind::Solid => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub texture: TextureId,
}

impl Tile {
    pub const EMPTY: Tile = Tile { kind: TileKind::Empty, texture: 0 };

    pub fn solid(texture: TextureId) -> Self {
        Self { kind: TileKind::Solid, texture }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Floor = 0,
    Ceiling = 1,
    Wall = 2,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Floor, Layer::Ceiling, Layer::Wall];
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map size {width}x{height} outside 1..=40 x 1..=30")]
    InvalidSize { width: usize, height: usize },
    #[error("cell ({x}, {y}) outside a {width}x{height} map")]
    OutOfBounds { x: usize, y: usize, width: usize, height: usize },
    #[error("failed to read map file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Static per-level tile data. Dimensions never change after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMap {
    width: usize,
    height: usize,
    layers: [Vec<Tile>; 3],
    player_start: Vec2,
}

impl GridMap {
    /// Empty map; the player start defaults to the center.
    pub fn new(width: usize, height: usize) -> Result<Self, MapError> {
        if !(1..=MAP_WIDTH_MAX).contains(&width) || !(1..=MAP_HEIGHT_MAX).contains(&height) {
            return Err(MapError::InvalidSize { width, height });
        }
        let cells = width * height;
        Ok(Self {
            width,
            height,
            layers: [vec![Tile::EMPTY; cells], vec![Tile::EMPTY; cells], vec![Tile::EMPTY; cells]],
            player_start: Vec2::new(width as f32 / 2.0, height as f32 / 2.0),
        })
    }

    /// Fallback level: solid outer ring (texture 1) and an inner wall at
    /// column 5 (texture 2) leaving a gap of three rows at each end.
    pub fn with_border(width: usize, height: usize) -> Result<Self, MapError> {
        let mut map = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                let tile = if x == 0 || x == width - 1 || y == 0 || y == height - 1 {
                    Tile::solid(1)
                } else if x == 5 && y > 3 && y + 3 < height {
                    Tile::solid(2)
                } else {
                    continue;
                };
                map.set_tile(Layer::Wall, x, y, tile)?;
            }
        }
        Ok(map)
    }

    #[inline] pub fn width(&self) -> usize { self.width }
    #[inline] pub fn height(&self) -> usize { self.height }
    #[inline] pub fn player_start(&self) -> Vec2 { self.player_start }
    #[inline] pub fn set_player_start(&mut self, start: Vec2) { self.player_start = start; }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn tile(&self, layer: Layer, x: i32, y: i32) -> Option<Tile> {
        self.index(x, y).map(|i| self.layers[layer as usize][i])
    }

    pub fn set_tile(&mut self, layer: Layer, x: usize, y: usize, tile: Tile) -> Result<(), MapError> {
        if x >= self.width || y >= self.height {
            return Err(MapError::OutOfBounds { x, y, width: self.width, height: self.height });
        }
        let i = y * self.width + x;
        self.layers[layer as usize][i] = tile;
        Ok(())
    }

    /// Anything outside the map counts as wall, so levels need no border tiles.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.tile(Layer::Wall, x, y).is_none_or(|t| t.kind == TileKind::Solid)
    }

    pub fn wall_texture(&self, x: i32, y: i32) -> TextureId {
        self.tile(Layer::Wall, x, y).map_or(0, |t| t.texture)
    }

    pub fn floor_texture(&self, x: i32, y: i32) -> TextureId {
        self.tile(Layer::Floor, x, y).map_or(0, |t| t.texture)
    }

    pub fn ceiling_texture(&self, x: i32, y: i32) -> TextureId {
        self.tile(Layer::Ceiling, x, y).map_or(0, |t| t.texture)
    }
}
