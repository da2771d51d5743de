//! Billboard sprites.
//!
//! Sorted far → near into a scratch copy, projected into camera space and
//! drawn column by column wherever they are nearer than the wall recorded in
//! the depth buffer.  Runs on the calling thread so later (nearer) sprites
//! overwrite earlier ones.

use glam::Vec2;

use super::{buffer::PixelBuffer, walls::shade_factor};
use crate::{
    renderer::{RenderConfig, RenderFlags, SpriteInstance},
    world::{Camera, TextureBank, TextureId},
};

/// Replaces an exact zero in camera space so `tx / ty` stays finite.
const NUDGE: f32 = 1e-8;

/// Largest billboard edge in pixels; keeps edge arithmetic well inside `i64`.
const MAX_SIZE: f32 = 1e9;

/// Sort entry: one per sprite instance, rebuilt every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisSprite {
    pub tex: TextureId,
    pub pos: Vec2,
    /// Squared distance to the camera.
    pub dist_sq: f32,
}

/// Screen-space footprint of one sprite.
#[derive(Clone, Copy, Debug)]
struct Projection {
    /// Camera-space depth.
    ty: f32,
    /// Unclipped left edge and side length of the square billboard.
    left: i64,
    top: i64,
    size: i64,
}

/// Fill `scratch` with `sprites` sorted farthest first.
pub fn sort_far_to_near(scratch: &mut Vec<VisSprite>, sprites: &[SpriteInstance], eye: Vec2) {
    scratch.clear();
    scratch.extend(sprites.iter().map(|s| VisSprite {
        tex: s.tex,
        pos: s.pos,
        dist_sq: eye.distance_squared(s.pos),
    }));
    scratch.sort_unstable_by(|a, b| b.dist_sq.total_cmp(&a.dist_sq));
}

fn project(camera: &Camera, pos: Vec2, width: usize, height: usize) -> Option<Projection> {
    let (dir, plane) = (camera.dir(), camera.plane());
    let det = plane.x * dir.y - dir.x * plane.y;
    if det == 0.0 {
        return None;
    }
    let inv_det = 1.0 / det;
    let rel = pos - camera.pos();

    let mut tx = inv_det * (dir.y * rel.x - dir.x * rel.y);
    let mut ty = inv_det * (-plane.y * rel.x + plane.x * rel.y);
    if tx == 0.0 {
        tx = NUDGE;
    }
    if ty == 0.0 {
        ty = NUDGE;
    }
    if !tx.is_finite() || !ty.is_finite() {
        return None;
    }

    let (w, h) = (width as f32, height as f32);
    let size = (h / ty).abs().min(MAX_SIZE);
    if size < 1.0 {
        return None;
    }
    // past one sprite width off either edge the billboard is hidden anyway
    let centre = (w / 2.0 * (1.0 + tx / ty)).clamp(-size, w + size);

    let size = size as i64;
    Some(Projection {
        ty,
        left: centre as i64 - size / 2,
        top: height as i64 / 2 - size / 2,
        size,
    })
}

/// Draw `sprites` (in any order) over the wall pass.  `scratch` is reused
/// across frames; the caller's slice is left untouched.
pub fn draw_sprites(
    fb: &mut PixelBuffer,
    depth: &[f32],
    scratch: &mut Vec<VisSprite>,
    cfg: &RenderConfig,
    camera: &Camera,
    sprites: &[SpriteInstance],
    bank: &TextureBank,
) {
    let (w, h) = (fb.width(), fb.height());
    sort_far_to_near(scratch, sprites, camera.pos());

    for s in scratch.iter() {
        let Some(p) = project(camera, s.pos, w, h) else {
            continue;
        };
        if p.ty <= 0.0 {
            continue;
        }

        let tex = bank.texture_or_missing(s.tex);
        let shade = cfg
            .flags
            .contains(RenderFlags::SPRITE_SHADE)
            .then(|| shade_factor(p.ty));

        let x0 = p.left.max(0);
        let x1 = (p.left + p.size).min(w as i64);
        let y0 = p.top.max(0);
        let y1 = (p.top + p.size).min(h as i64);

        for x in x0..x1 {
            let col = x as usize;
            if p.ty >= depth[col] {
                continue;
            }
            let tex_x = (((x - p.left) * tex.w as i64 / p.size) as usize).min(tex.w - 1);
            let column = fb.column_mut(col);
            for y in y0..y1 {
                let tex_y = (((y - p.top) * tex.h as i64 / p.size) as usize).min(tex.h - 1);
                let c = tex.texel(tex_x, tex_y);
                if c.is_black() {
                    continue;
                }
                column[y as usize] = match shade {
                    Some(k) => c.scale(k),
                    None => c,
                };
            }
        }
    }
}
