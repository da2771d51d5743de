//! Panoramic sky.
//!
//! The upper half of every column samples a wrap-around panorama whose
//! horizontal offset follows the camera heading.  Walls and the ceiling pass
//! paint over it afterwards.

use std::f32::consts::TAU;

use rayon::prelude::*;

use super::buffer::PixelBuffer;
use crate::world::{Camera, Skybox};

/// Fill everything above the horizon with the panorama scrolled by the
/// camera heading.  Never touches rows below `height / 2` and has no depth
/// interaction.
pub fn draw_skybox(fb: &mut PixelBuffer, camera: &Camera, sky: &Skybox) {
    let (w, h) = (fb.width(), fb.height());
    let horizon = h / 2;
    if horizon == 0 || w == 0 {
        return;
    }

    // left-most visible heading mapped onto the panorama width
    let left = (camera.angle() - camera.fov()).rem_euclid(TAU);
    let offset = left / TAU * sky.width() as f32;
    // a quarter of the panorama spans the screen
    let step = sky.width() as f32 / (w * 4) as f32;
    let sky_h = sky.height();

    fb.par_columns_mut().enumerate().for_each(|(x, col)| {
        let tex_x = (offset + x as f32 * step) as i64;
        for (y, px) in col[..horizon].iter_mut().enumerate() {
            *px = sky.texel(tex_x, sky_h * y / horizon);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Rgb, Texture};
    use glam::Vec2;

    /// Every texel unique: r = column, g = row.
    fn striped_sky(w: usize, h: usize) -> Skybox {
        let mut tex = Texture::solid("SKY", w, h, Rgb::BLACK);
        for y in 0..h {
            for x in 0..w {
                tex.pixels[y * w + x] = Rgb::new(x as u8, y as u8, 7);
            }
        }
        Skybox::new(tex, None)
    }

    #[test]
    fn scrolls_with_heading() {
        let sky = striped_sky(64, 10);
        let fov = 0.66;
        // land half a texel into column 32 so rounding can't flip the index
        let angle = fov + std::f32::consts::PI + 0.5 / 64.0 * TAU;
        let cam = Camera::new(Vec2::ZERO, angle, fov);

        let mut fb = PixelBuffer::new(16, 20);
        draw_skybox(&mut fb, &cam, &sky);

        // 64 / (16 * 4) = one texel per column
        for x in 0..16 {
            for y in 0..10 {
                assert_eq!(fb.get(x, y), sky.texel(32 + x as i64, y), "({x},{y})");
            }
        }
    }

    #[test]
    fn wraps_around_seam() {
        let sky = striped_sky(64, 10);
        let fov = 0.66;
        // start 4.5 texels before the seam
        let angle = fov - 4.5 / 64.0 * TAU;
        let cam = Camera::new(Vec2::ZERO, angle, fov);

        let mut fb = PixelBuffer::new(16, 20);
        draw_skybox(&mut fb, &cam, &sky);

        assert_eq!(fb.get(0, 0).r, 59);
        assert_eq!(fb.get(4, 0).r, 63);
        assert_eq!(fb.get(5, 0).r, 0);
        assert_eq!(fb.get(15, 0).r, 10);
    }

    #[test]
    fn leaves_lower_half_alone() {
        let sky = striped_sky(64, 10);
        let cam = Camera::new(Vec2::ZERO, 1.0, 0.66);
        let marker = Rgb::new(1, 2, 3);
        let mut fb = PixelBuffer::new(8, 9);
        fb.fill(marker);
        draw_skybox(&mut fb, &cam, &sky);
        for x in 0..8 {
            assert_ne!(fb.get(x, 0), marker);
            assert_ne!(fb.get(x, 3), marker);
            for y in 4..9 {
                assert_eq!(fb.get(x, y), marker);
            }
        }
    }
}
