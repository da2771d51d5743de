//! CPU column renderer.
//!
//! * Draws into a column-major [`PixelBuffer`]; one rayon task per column.
//! * Sprites are occluded against a per-column depth buffer filled by the
//!   wall pass, so the grid needs no visibility pre-pass.

mod buffer;
mod distance;
mod raycast;
mod renderer;
mod skybox;
mod sprites;
mod walls;

pub use buffer::PixelBuffer;
pub use distance::{DistanceTable, FAR};
pub use raycast::{RayHit, Side, cast, hit_triple};
pub use renderer::Software;
pub use skybox::draw_skybox;
pub use sprites::{VisSprite, draw_sprites};
pub use walls::{draw_walls, shade_factor};
