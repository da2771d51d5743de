//! Column pass: one ray per screen column.
//!
//! Each column writes only its own slice of the frame buffer and its own
//! depth slot, so the pass runs on rayon with no locking; the parallel
//! iterator returning is the barrier the sprite pass relies on.

use glam::Vec2;
use rayon::prelude::*;

use super::{
    buffer::PixelBuffer,
    distance::DistanceTable,
    raycast::{RayHit, Side, cast},
};
use crate::{
    renderer::{RenderConfig, RenderFlags},
    world::{Camera, Rgb, Skybox, TextureBank, TileGrid},
};

/// Closest wall distance used for projection (camera standing on a face).
const MIN_DIST: f32 = 1e-4;

/// Inverse-distance fog: `clamp(1 / (d / 2), 0.1, 1)`.
#[inline(always)]
pub fn shade_factor(dist: f32) -> f32 {
    (1.0 / (dist / 2.0)).clamp(0.1, 1.0)
}

/// Read-only inputs shared by every column worker.
struct Columns<'a> {
    camera: &'a Camera,
    grid: &'a TileGrid,
    bank: &'a TextureBank,
    distances: &'a DistanceTable,
    cfg: &'a RenderConfig,
    ambient: Rgb,
    width: usize,
    height: usize,
}

/// Walls, floors and ceilings for every column.  `depth[x]` receives the
/// perpendicular wall distance, or `f32::INFINITY` when the ray escaped.
pub fn draw_walls(
    fb: &mut PixelBuffer,
    depth: &mut [f32],
    distances: &DistanceTable,
    cfg: &RenderConfig,
    camera: &Camera,
    grid: &TileGrid,
    bank: &TextureBank,
    sky: &Skybox,
) {
    debug_assert_eq!(
        distances.len(),
        fb.height(),
        "distance table is stale: recompute it after changing the screen height"
    );
    debug_assert_eq!(depth.len(), fb.width());

    let cols = Columns {
        camera,
        grid,
        bank,
        distances,
        cfg,
        ambient: sky.ambient(),
        width: fb.width(),
        height: fb.height(),
    };

    fb.par_columns_mut()
        .zip(depth.par_iter_mut())
        .enumerate()
        .for_each(|(x, (col, z))| *z = cols.draw_column(x, col));
}

impl Columns<'_> {
    fn draw_column(&self, x: usize, col: &mut [Rgb]) -> f32 {
        let camera_x = 2.0 * x as f32 / self.width as f32 - 1.0;
        let ray = self.camera.ray_dir(camera_x);
        let origin = self.camera.pos();

        let Some(hit) = cast(self.grid, origin, ray) else {
            // sky-only column
            return f32::INFINITY;
        };

        let wall_x = self.draw_wall_slice(&hit, ray, origin, col);
        let span = self.slice_span(hit.perp_dist.max(MIN_DIST));
        self.draw_floor_and_ceiling(&hit, ray, origin, wall_x, span.1, col);

        hit.perp_dist
    }

    /// Clamped `(start, end)` rows of the wall slice at distance `dist`,
    /// plus its unclamped height.
    #[inline(always)]
    fn slice_span(&self, dist: f32) -> (f32, f32, f32) {
        let h = self.height as f32;
        let half_h = h / 2.0;
        let line_h = ((self.cfg.wall_amplifier * h / dist) as i32).max(1) as f32;
        let start = (-line_h / 2.0 + half_h).max(0.0);
        let end = (line_h / 2.0 + half_h).min(h - 1.0);
        (start, end, line_h)
    }

    /// Draw the textured wall; returns the fractional hit offset along the
    /// struck face (reused by floor casting).
    fn draw_wall_slice(&self, hit: &RayHit, ray: Vec2, origin: Vec2, col: &mut [Rgb]) -> f32 {
        let dist = hit.perp_dist.max(MIN_DIST);
        let (start, end, line_h) = self.slice_span(dist);
        let half_h = self.height as f32 / 2.0;

        let mut wall_x = match hit.side {
            Side::X => origin.y + hit.perp_dist * ray.y,
            Side::Y => origin.x + hit.perp_dist * ray.x,
        };
        wall_x -= wall_x.floor();

        let Some(tex_id) = self.grid.wall(hit.tile.x, hit.tile.y).texture() else {
            return wall_x;
        };
        // y-side walls use the pre-darkened copy
        let tex = match hit.side {
            Side::X => self.bank.texture_or_missing(tex_id),
            Side::Y => self.bank.half_or_missing(tex_id),
        };
        let (tw, th) = (tex.w, tex.h);

        let mut tex_x = ((wall_x * tw as f32) as usize).min(tw - 1);
        let flip = match hit.side {
            Side::X => ray.x < 0.0,
            Side::Y => ray.y > 0.0,
        };
        if flip {
            tex_x = tw - tex_x - 1;
        }

        let step = th as f32 / line_h;
        let mut tex_pos = (start - half_h + line_h / 2.0) * step;
        let shade = self.cfg.flags.contains(RenderFlags::SHADE).then(|| shade_factor(dist));

        for px in &mut col[start as usize..end as usize] {
            let tex_y = tex_pos as usize % th;
            tex_pos += step;
            let c = tex.texel(tex_x, tex_y);
            *px = match shade {
                Some(k) => c.scale(k),
                None => c,
            };
        }
        wall_x
    }

    /// Inverse-perspective floor casting below the slice; the ceiling is the
    /// vertical mirror of the same world sample.
    fn draw_floor_and_ceiling(
        &self,
        hit: &RayHit,
        ray: Vec2,
        origin: Vec2,
        wall_x: f32,
        slice_end: f32,
        col: &mut [Rgb],
    ) {
        let tile = hit.tile.as_vec2();
        let floor_wall = match hit.side {
            Side::X if ray.x > 0.0 => Vec2::new(tile.x, tile.y + wall_x),
            Side::X => Vec2::new(tile.x + 1.0, tile.y + wall_x),
            Side::Y if ray.y > 0.0 => Vec2::new(tile.x + wall_x, tile.y),
            Side::Y => Vec2::new(tile.x + wall_x, tile.y + 1.0),
        };
        let wall_dist = hit.perp_dist.max(MIN_DIST);
        let (tw, th) = self.bank.tex_size();
        let shade_on = self.cfg.flags.contains(RenderFlags::SHADE);
        let sky_light = self.cfg.flags.contains(RenderFlags::FLOOR_SKY_LIGHT);

        for y in slice_end as usize..self.height {
            let row_dist = self.distances.get(y);
            let weight = row_dist / wall_dist;
            let p = floor_wall * weight + origin * (1.0 - weight);
            let cell = p.floor().as_ivec2();

            let floor = self.grid.floor(cell.x, cell.y);
            let ceiling = self.grid.ceiling(cell.x, cell.y);
            if floor.is_empty() && ceiling.is_empty() {
                continue;
            }

            let tex_x = ((p.x * tw as f32) as i64).rem_euclid(tw as i64) as usize;
            let tex_y = ((p.y * th as f32) as i64).rem_euclid(th as i64) as usize;
            let shade = if shade_on { shade_factor(row_dist) } else { 1.0 };

            if let Some(id) = floor.texture() {
                let mut c = self.bank.half_or_missing(id).texel(tex_x, tex_y).scale(shade);
                if ceiling.is_empty() && sky_light {
                    c = c.saturating_add(self.ambient);
                }
                col[y] = c;
            }

            if let Some(id) = ceiling.texture() {
                let cy = self.height - 1 - y;
                col[cy] = self.bank.half_or_missing(id).texel(tex_x, tex_y).scale(shade);

                // slab edge seen from below an opening
                let band = (self.cfg.ceiling_thickness / row_dist) as usize;
                let edge = self
                    .bank
                    .texture_or_missing(id)
                    .texel(tex_x, tex_y)
                    .quarter()
                    .scale(shade);
                col[cy.saturating_sub(band)..cy].fill(edge);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Layer, Texture, Tile, TEX_SIZE};

    const W: usize = 64;
    const H: usize = 120;

    const WALL: Rgb = Rgb::new(200, 0, 0);
    const FLOOR: Rgb = Rgb::new(0, 200, 0);
    const CEIL: Rgb = Rgb::new(200, 200, 200);
    const SKY: Rgb = Rgb::new(0, 0, 255);

    /// Solid textures: wall = tile 1, floor = tile 2, ceiling = tile 3.
    fn bank() -> TextureBank {
        let mut bank = TextureBank::default_with_checker();
        for (name, c) in [("WALL", WALL), ("FLOOR", FLOOR), ("CEIL", CEIL)] {
            bank.insert(name, Texture::solid(name, TEX_SIZE, TEX_SIZE, c))
                .unwrap();
        }
        bank
    }

    fn sky() -> Skybox {
        Skybox::new(Texture::solid("SKY", 32, 8, SKY), None)
    }

    fn flat_cfg() -> RenderConfig {
        RenderConfig {
            flags: RenderFlags::empty(),
            ..RenderConfig::default()
        }
    }

    fn render(grid: &TileGrid, cam: &Camera, cfg: &RenderConfig) -> (PixelBuffer, Vec<f32>) {
        let mut fb = PixelBuffer::new(W, H);
        fb.fill(SKY);
        let mut depth = vec![0.0; W];
        let table = DistanceTable::new(H);
        draw_walls(&mut fb, &mut depth, &table, cfg, cam, grid, &bank(), &sky());
        (fb, depth)
    }

    fn room(w: usize, h: usize) -> TileGrid {
        TileGrid::bordered(w, h, Tile::from_id(1), Tile::from_id(2), Tile::from_id(3))
    }

    #[test]
    fn shade_factor_clamps() {
        assert_eq!(shade_factor(0.0), 1.0);
        assert_eq!(shade_factor(1.0), 1.0);
        assert_eq!(shade_factor(4.0), 0.5);
        assert_eq!(shade_factor(1e30), 0.1);
    }

    #[test]
    fn centre_column_depth_matches_cast() {
        let cam = Camera::new(Vec2::new(1.5, 1.5), 0.0, 0.66);
        let (_, depth) = render(&room(3, 3), &cam, &flat_cfg());
        assert!((depth[W / 2] - 0.5).abs() < 1e-6);
        assert!(depth.iter().all(|d| d.is_finite() && *d > 0.0));
    }

    #[test]
    fn escaped_rays_store_infinite_depth() {
        let grid = TileGrid::empty(4, 4);
        let cam = Camera::new(Vec2::new(2.0, 2.0), 0.0, 0.66);
        let (fb, depth) = render(&grid, &cam, &flat_cfg());
        assert!(depth.iter().all(|d| d.is_infinite()));
        assert!((0..H).all(|y| fb.get(0, y) == SKY));
    }

    #[test]
    fn y_side_walls_use_half_texture() {
        let grid = room(7, 7);
        let cfg = flat_cfg();

        let east = Camera::new(Vec2::new(3.5, 3.5), 0.0, 0.66);
        let (fb, _) = render(&grid, &east, &cfg);
        assert_eq!(fb.get(W / 2, H / 2), WALL);

        let south = Camera::new(Vec2::new(3.5, 3.5), std::f32::consts::FRAC_PI_2, 0.66);
        let (fb, _) = render(&grid, &south, &cfg);
        assert_eq!(fb.get(W / 2, H / 2), WALL.half());
    }

    #[test]
    fn shading_darkens_far_walls() {
        let grid = room(12, 3);
        let cam = Camera::new(Vec2::new(1.5, 1.5), 0.0, 0.66);
        let (fb, depth) = render(&grid, &cam, &RenderConfig::default());
        let d = depth[W / 2];
        assert!((d - 9.5).abs() < 1e-5);
        assert_eq!(fb.get(W / 2, H / 2), WALL.scale(shade_factor(d)));
    }

    #[test]
    fn ceiling_mirrors_floor_sample() {
        // identical texture on floor and ceiling: mirrored rows must match
        let mut grid = room(9, 9);
        for y in 0..9 {
            for x in 0..9 {
                grid.set(Layer::Floor, x, y, Tile::from_id(3));
            }
        }
        let cam = Camera::new(Vec2::new(2.3, 4.1), 0.4, 0.66);
        let (fb, depth) = render(&grid, &cam, &flat_cfg());

        for x in [0, W / 3, W / 2, W - 1] {
            let dist = depth[x].max(MIN_DIST);
            let line_h = ((H as f32 / dist) as i32).max(1) as f32;
            let end = (line_h / 2.0 + H as f32 / 2.0).min(H as f32 - 1.0) as usize;
            for y in end..H {
                assert_eq!(fb.get(x, y), fb.get(x, H - 1 - y), "column {x} row {y}");
                assert_eq!(fb.get(x, y), CEIL.half());
            }
        }
    }

    #[test]
    fn open_ceiling_floor_gets_sky_light() {
        let mut grid = room(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                grid.set(Layer::Ceiling, x, y, Tile::Empty);
            }
        }
        let cam = Camera::new(Vec2::new(2.5, 2.5), 0.0, 0.66);
        let cfg = RenderConfig {
            flags: RenderFlags::FLOOR_SKY_LIGHT,
            ..RenderConfig::default()
        };
        let (fb, _) = render(&grid, &cam, &cfg);
        assert_eq!(fb.get(W / 2, H - 1), FLOOR.half().saturating_add(sky().ambient()));
        // no ceiling drawn: top rows still show the sky
        assert_eq!(fb.get(W / 2, 0), SKY);
    }

    #[test]
    fn ceiling_edge_band_above_opening() {
        // 8×3 corridor, ceiling only over the far half (x >= 4)
        let mut grid = room(8, 3);
        for x in 0..8 {
            for y in 0..3 {
                let t = if x >= 4 { Tile::from_id(3) } else { Tile::Empty };
                grid.set(Layer::Ceiling, x, y, t);
            }
        }
        let cam = Camera::new(Vec2::new(1.5, 1.5), 0.0, 0.66);
        let (fb, _) = render(&grid, &cam, &flat_cfg());

        let col = fb.column(W / 2);
        let band = CEIL.quarter();
        let ceil = CEIL.half();
        assert!(
            (0..H - 1).any(|r| col[r] == band && col[r + 1] == ceil),
            "no darker band directly above the ceiling"
        );
        assert_eq!(col[0], SKY);
    }
}
