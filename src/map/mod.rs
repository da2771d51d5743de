//! Map files.
//!
//! * `.dat` – binary, **bincode 2** (`config::standard()`), see [`MapFile`].
//! * `.txt` – hand-editable text, parsed by [`MapFile::from_text`].
//!
//! Both carry the three raw id layers (`0` = empty, `id = texture + 1`) and
//! the object list the simulation spawns from.

use std::{fs, path::Path};

use bincode::{Decode, Encode, config};
use thiserror::Error;

use crate::world::{GridError, Layer, TileGrid};

mod text;

/// Something placed on the map: `kind` is matched by the spawner
/// (`"player"`, `"red_ogre"`, …), `(x, y)` is the tile it stands on.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct MapObject {
    pub kind: String,
    pub x: u32,
    pub y: u32,
}

impl MapObject {
    pub fn new<S: Into<String>>(kind: S, x: u32, y: u32) -> Self {
        Self {
            kind: kind.into(),
            x,
            y,
        }
    }
}

/// On-disk layout.  Layers are row-major, `width * height` ids each.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct MapFile {
    pub width: u32,
    pub height: u32,
    pub floor: Vec<u8>,
    pub walls: Vec<u8>,
    pub ceiling: Vec<u8>,
    pub objects: Vec<MapObject>,
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot encode map: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("cannot decode map: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl MapFile {
    /// Read a binary map.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let bytes = fs::read(path.as_ref())?;
        let map = Self::decode(&bytes)?;
        log::info!(
            "loaded {} ({}x{}, {} objects)",
            path.as_ref().display(),
            map.width,
            map.height,
            map.objects.len()
        );
        Ok(map)
    }

    /// Write a binary map.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MapError> {
        fs::write(path, self.encode()?)?;
        Ok(())
    }

    pub fn encode(&self) -> Result<Vec<u8>, MapError> {
        Ok(bincode::encode_to_vec(self, config::standard())?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, MapError> {
        let (map, _) = bincode::decode_from_slice(bytes, config::standard())?;
        Ok(map)
    }

    /// Snapshot a grid back into raw layers.
    pub fn from_grid(grid: &TileGrid, objects: Vec<MapObject>) -> Self {
        Self {
            width: grid.width() as u32,
            height: grid.height() as u32,
            floor: grid.ids(Layer::Floor),
            walls: grid.ids(Layer::Wall),
            ceiling: grid.ids(Layer::Ceiling),
            objects,
        }
    }

    /// Validate the layers and split into what the renderer and the
    /// simulation consume.
    pub fn into_parts(self) -> Result<(TileGrid, Vec<MapObject>), MapError> {
        let grid = TileGrid::from_ids(
            self.width as usize,
            self.height as usize,
            &self.walls,
            &self.floor,
            &self.ceiling,
        )?;
        Ok((grid, self.objects))
    }

    /// Small built-in level: a 6×7 room with a pillar, one opening in the
    /// ceiling, the player and an ogre.
    ///
    /// Ids: `1` blue bricks, `2` grey bricks, `3` floor slab, `4` ceiling,
    /// matching `world::texture::procedural::demo_assets`.
    pub fn demo() -> Self {
        #[rustfmt::skip]
        let walls = vec![
            1, 1, 1, 2, 2, 2,
            1, 0, 0, 0, 0, 2,
            1, 0, 0, 0, 0, 2,
            2, 0, 0, 0, 0, 2,
            2, 0, 2, 0, 0, 1,
            1, 0, 0, 0, 0, 1,
            1, 1, 1, 1, 1, 1,
        ];
        #[rustfmt::skip]
        let floor = vec![
            2, 2, 2, 2, 2, 2,
            2, 3, 3, 3, 3, 2,
            2, 3, 3, 3, 3, 2,
            2, 3, 3, 3, 3, 2,
            2, 3, 3, 3, 3, 2,
            2, 3, 3, 3, 3, 2,
            2, 2, 2, 2, 2, 2,
        ];
        #[rustfmt::skip]
        let ceiling = vec![
            4, 4, 4, 4, 4, 4,
            4, 4, 4, 4, 4, 4,
            4, 4, 4, 4, 4, 4,
            4, 4, 4, 4, 4, 4,
            4, 4, 4, 0, 4, 4,
            4, 4, 4, 4, 4, 4,
            4, 4, 4, 4, 4, 4,
        ];
        Self {
            width: 6,
            height: 7,
            floor,
            walls,
            ceiling,
            objects: vec![MapObject::new("player", 1, 1), MapObject::new("red_ogre", 4, 5)],
        }
    }
}
