//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! It hands a [`Scene`] (camera, grid, textures, sprites) to a type that
//! implements [`Renderer`].
//!
//! * Back-ends can be swapped without changing game logic.
//! * A helper blanket-impl [`RendererExt`] adds `draw_frame`, which runs the
//!   passes in their fixed order: skybox → walls/floor/ceiling → sprites.

use bitflags::bitflags;
use glam::Vec2;

use crate::world::{Camera, Skybox, TextureBank, TextureId, TileGrid};

/// Pixel format of the presented frame (0x00RRGGBB).
pub type Rgba = u32;

bitflags! {
    /// Optional shading terms.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RenderFlags: u8 {
        /// Inverse-distance darkening of walls, floors and ceilings.
        const SHADE           = 0x01;
        /// Same darkening for sprites, using their camera-space depth.
        const SPRITE_SHADE    = 0x02;
        /// Floors under an open ceiling pick up the skybox ambient colour.
        const FLOOR_SKY_LIGHT = 0x04;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self::all()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// Projected wall height multiplier.
    pub wall_amplifier: f32,
    /// Ceiling slab thickness in pixels at row distance 1.
    pub ceiling_thickness: f32,
    pub flags: RenderFlags,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            wall_amplifier: 1.0,
            ceiling_thickness: 16.0,
            flags: RenderFlags::default(),
        }
    }
}

/// One billboard to draw this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteInstance {
    pub tex: TextureId,
    pub pos: Vec2,
}

/// Everything a frame is rendered from.  Borrowed, never owned.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub camera: &'a Camera,
    pub grid: &'a TileGrid,
    pub bank: &'a TextureBank,
    pub sky: &'a Skybox,
    pub sprites: &'a [SpriteInstance],
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Panorama above the horizon.
    fn draw_skybox(&mut self, camera: &Camera, sky: &Skybox);

    /// Walls, floor and ceiling; fills the depth buffer.
    fn draw_walls(&mut self, camera: &Camera, grid: &TileGrid, bank: &TextureBank, sky: &Skybox);

    /// Billboards, occluded against the depth buffer of `draw_walls`.
    fn draw_sprites(&mut self, camera: &Camera, sprites: &[SpriteInstance], bank: &TextureBank);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(&mut self, width: usize, height: usize, scene: &Scene<'_>, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        self.draw_skybox(scene.camera, scene.sky);
        self.draw_walls(scene.camera, scene.grid, scene.bank, scene.sky);
        self.draw_sprites(scene.camera, scene.sprites, scene.bank);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;
