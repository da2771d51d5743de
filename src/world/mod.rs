mod camera;
mod grid;
pub mod texture;

pub use camera::{Camera, DEFAULT_FOV};

pub use grid::{GridError, Layer, Tile, TileGrid};

pub use texture::{
    NO_TEXTURE, Rgb, Skybox, TEX_SIZE, Texture, TextureBank, TextureError, TextureId,
};
