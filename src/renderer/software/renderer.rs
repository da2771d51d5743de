use crate::{
    renderer::{
        RenderConfig, Renderer, Rgba, SpriteInstance,
        software::{
            buffer::PixelBuffer, distance::DistanceTable, skybox, sprites,
            sprites::VisSprite, walls,
        },
    },
    world::{Camera, Skybox, TextureBank, TileGrid},
};

/// Frame compositor: owns the pixel buffer, depth buffer and every
/// per-frame scratch vector so steady-state frames never allocate.
#[derive(Default)]
pub struct Software {
    pub config: RenderConfig,

    pixels: PixelBuffer,
    depth: Vec<f32>,
    distances: DistanceTable,
    sprites: Vec<VisSprite>,
    present: Vec<Rgba>,

    width: usize,
    height: usize,
}

impl Software {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Rebuild the floor-distance table.  `begin_frame` calls this on every
    /// height change; call it yourself after resizing `pixels` by hand.
    pub fn recompute_distance_table(&mut self, height: usize) {
        self.distances.recompute(height);
    }

    #[inline]
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Per-column wall distances of the last wall pass.
    #[inline]
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            log::debug!("resolution {}x{} -> {w}x{h}", self.width, self.height);
            self.width = w;
            self.height = h;
            self.pixels.resize(w, h);
            self.depth.resize(w, f32::INFINITY);
            if self.distances.len() != h {
                self.recompute_distance_table(h);
            }
        }
        self.depth.fill(f32::INFINITY);
    }

    fn draw_skybox(&mut self, camera: &Camera, sky: &Skybox) {
        skybox::draw_skybox(&mut self.pixels, camera, sky);
    }

    fn draw_walls(&mut self, camera: &Camera, grid: &TileGrid, bank: &TextureBank, sky: &Skybox) {
        walls::draw_walls(
            &mut self.pixels,
            &mut self.depth,
            &self.distances,
            &self.config,
            camera,
            grid,
            bank,
            sky,
        );
    }

    fn draw_sprites(&mut self, camera: &Camera, sprites: &[SpriteInstance], bank: &TextureBank) {
        sprites::draw_sprites(
            &mut self.pixels,
            &self.depth,
            &mut self.sprites,
            &self.config,
            camera,
            sprites,
            bank,
        );
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.pixels.present(&mut self.present);
        submit(&self.present, self.width, self.height);
    }
}
