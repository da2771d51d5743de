//! Three-layer tile map: walls, floor and ceiling share one `width × height`
//! grid.  Raw ids keep the classic numbering (`0` = empty, `id = index + 1`),
//! everything inside the crate works with [`Tile`].

use glam::IVec2;

use super::texture::TextureId;

/// One cell of a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    #[default]
    Empty,
    Texture(TextureId),
}

impl Tile {
    /// Decode a raw map id.
    #[inline(always)]
    pub const fn from_id(id: u8) -> Self {
        match id {
            0 => Tile::Empty,
            n => Tile::Texture(n as TextureId - 1),
        }
    }

    /// Encode back to the raw map id.
    #[inline(always)]
    pub const fn id(self) -> u8 {
        match self {
            Tile::Empty => 0,
            Tile::Texture(t) => (t + 1) as u8,
        }
    }

    #[inline(always)]
    pub const fn texture(self) -> Option<TextureId> {
        match self {
            Tile::Empty => None,
            Tile::Texture(t) => Some(t),
        }
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        matches!(self, Tile::Empty)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Wall,
    Floor,
    Ceiling,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("{layer:?} layer has {found} cells, expected {expected}")]
    LayerSize {
        layer: Layer,
        expected: usize,
        found: usize,
    },
}

/// Read-only (for the renderer) tile grid, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    walls: Vec<Tile>,
    floors: Vec<Tile>,
    ceilings: Vec<Tile>,
}

impl TileGrid {
    /// All layers empty.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            walls: vec![Tile::Empty; width * height],
            floors: vec![Tile::Empty; width * height],
            ceilings: vec![Tile::Empty; width * height],
        }
    }

    /// Build from raw id layers (row-major).  Every layer must hold exactly
    /// `width * height` ids.
    pub fn from_ids(
        width: usize,
        height: usize,
        walls: &[u8],
        floors: &[u8],
        ceilings: &[u8],
    ) -> Result<Self, GridError> {
        let expected = width * height;
        let decode = |layer: Layer, ids: &[u8]| {
            if ids.len() != expected {
                return Err(GridError::LayerSize {
                    layer,
                    expected,
                    found: ids.len(),
                });
            }
            Ok(ids.iter().map(|&id| Tile::from_id(id)).collect::<Vec<_>>())
        };
        Ok(Self {
            width,
            height,
            walls: decode(Layer::Wall, walls)?,
            floors: decode(Layer::Floor, floors)?,
            ceilings: decode(Layer::Ceiling, ceilings)?,
        })
    }

    /// Width × height room enclosed by `wall`, floored and roofed everywhere.
    pub fn bordered(width: usize, height: usize, wall: Tile, floor: Tile, ceiling: Tile) -> Self {
        let mut g = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                let i = y * width + x;
                if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    g.walls[i] = wall;
                }
                g.floors[i] = floor;
                g.ceilings[i] = ceiling;
            }
        }
        g
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline(always)]
    fn layer(&self, layer: Layer) -> &[Tile] {
        match layer {
            Layer::Wall => &self.walls,
            Layer::Floor => &self.floors,
            Layer::Ceiling => &self.ceilings,
        }
    }

    /// Any read outside the grid is `Tile::Empty`.
    #[inline(always)]
    pub fn tile(&self, layer: Layer, x: i32, y: i32) -> Tile {
        if !self.in_bounds(x, y) {
            return Tile::Empty;
        }
        self.layer(layer)[y as usize * self.width + x as usize]
    }

    #[inline(always)]
    pub fn wall(&self, x: i32, y: i32) -> Tile {
        self.tile(Layer::Wall, x, y)
    }

    #[inline(always)]
    pub fn floor(&self, x: i32, y: i32) -> Tile {
        self.tile(Layer::Floor, x, y)
    }

    #[inline(always)]
    pub fn ceiling(&self, x: i32, y: i32) -> Tile {
        self.tile(Layer::Ceiling, x, y)
    }

    #[inline]
    pub fn is_solid(&self, cell: IVec2) -> bool {
        !self.wall(cell.x, cell.y).is_empty()
    }

    /// Out-of-range writes are ignored.
    pub fn set(&mut self, layer: Layer, x: i32, y: i32, tile: Tile) {
        if !self.in_bounds(x, y) {
            return;
        }
        let i = y as usize * self.width + x as usize;
        match layer {
            Layer::Wall => self.walls[i] = tile,
            Layer::Floor => self.floors[i] = tile,
            Layer::Ceiling => self.ceilings[i] = tile,
        }
    }

    /// Raw ids of one layer, row-major.
    pub fn ids(&self, layer: Layer) -> Vec<u8> {
        self.layer(layer).iter().map(|t| t.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_numbering_round_trips() {
        assert_eq!(Tile::from_id(0), Tile::Empty);
        assert_eq!(Tile::from_id(1), Tile::Texture(0));
        assert_eq!(Tile::from_id(255).texture(), Some(254));
        for id in 0..=255u8 {
            assert_eq!(Tile::from_id(id).id(), id);
        }
    }

    #[test]
    fn out_of_bounds_is_empty() {
        let g = TileGrid::bordered(3, 3, Tile::from_id(1), Tile::from_id(2), Tile::from_id(3));
        assert_eq!(g.wall(0, 0), Tile::Texture(0));
        assert_eq!(g.wall(1, 1), Tile::Empty);
        for (x, y) in [(-1, 0), (0, -1), (3, 1), (1, 3), (i32::MIN, i32::MAX)] {
            assert_eq!(g.wall(x, y), Tile::Empty);
            assert_eq!(g.floor(x, y), Tile::Empty);
            assert_eq!(g.ceiling(x, y), Tile::Empty);
        }
    }

    #[test]
    fn layer_size_checked() {
        let err = TileGrid::from_ids(2, 2, &[0; 4], &[0; 3], &[0; 4]).unwrap_err();
        assert_eq!(
            err,
            GridError::LayerSize {
                layer: Layer::Floor,
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn ids_preserve_numbering() {
        let g = TileGrid::from_ids(2, 1, &[0, 3], &[1, 1], &[0, 0]).unwrap();
        assert_eq!(g.ids(Layer::Wall), vec![0, 3]);
        assert_eq!(g.wall(1, 0).texture(), Some(2));
    }
}
