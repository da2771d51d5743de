// Format-agnostic repository of textures decoded by the asset loader.
// The renderer and world logic interact through `TextureId` only.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` that is never assigned; it always resolves to the
/// checkerboard fallback.
pub const NO_TEXTURE: TextureId = TextureId::MAX;

/// Default edge length of every bank texture.
pub const TEX_SIZE: usize = 64;

/// One 24-bit colour.  `Rgb::BLACK` doubles as the sprite chroma key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiply every channel by `k` (expected in `0.0..=1.0`).
    #[inline(always)]
    pub fn scale(self, k: f32) -> Self {
        Self {
            r: (self.r as f32 * k) as u8,
            g: (self.g as f32 * k) as u8,
            b: (self.b as f32 * k) as u8,
        }
    }

    #[inline(always)]
    pub fn half(self) -> Self {
        Self::new(self.r >> 1, self.g >> 1, self.b >> 1)
    }

    #[inline(always)]
    pub fn quarter(self) -> Self {
        Self::new(self.r >> 2, self.g >> 2, self.b >> 2)
    }

    #[inline(always)]
    pub fn saturating_add(self, o: Rgb) -> Self {
        Self::new(
            self.r.saturating_add(o.r),
            self.g.saturating_add(o.g),
            self.b.saturating_add(o.b),
        )
    }

    #[inline(always)]
    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }

    /// Pack as 0x00RRGGBB (minifb frame-buffer layout).
    #[inline(always)]
    pub fn to_u32(self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// CPU-side storage: RGB texels in row-major order (`pixels[y * w + x]`).
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgb>,
}

/// Convenience checkerboard (dark/light grey) at the default bank size.
impl Default for Texture {
    fn default() -> Self {
        CHECKER.clone()
    }
}

static CHECKER: Lazy<Texture> =
    Lazy::new(|| procedural::checker("CHECKER", Rgb::new(96, 96, 96), Rgb::new(160, 160, 160)));

impl Texture {
    pub fn solid<S: Into<String>>(name: S, w: usize, h: usize, colour: Rgb) -> Self {
        Self {
            name: name.into(),
            w,
            h,
            pixels: vec![colour; w * h],
        }
    }

    #[inline(always)]
    pub fn texel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.w + x]
    }

    /// Copy with every texel at half brightness.
    pub fn halved(&self) -> Texture {
        Texture {
            name: self.name.clone(),
            w: self.w,
            h: self.h,
            pixels: self.pixels.iter().map(|p| p.half()).collect(),
        }
    }

    /// Darken towards the bottom edge: row `y` is scaled by `1 − y/(2h)`.
    pub fn add_shade(&mut self) {
        let h = self.h as f32;
        for y in 0..self.h {
            let k = 1.0 - y as f32 / h / 2.0;
            for p in &mut self.pixels[y * self.w..(y + 1) * self.w] {
                *p = p.scale(k);
            }
        }
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Every texture in a bank must share the bank's dimensions.
    #[error("texture `{name}` is {w}×{h}, bank expects {bank_w}×{bank_h}")]
    SizeMismatch {
        name: String,
        w: usize,
        h: usize,
        bank_w: usize,
        bank_h: usize,
    },

    /// Pixel vector does not match the advertised size.
    #[error("texture `{0}` pixel count does not match its dimensions")]
    BadPixelCount(String),

    /// Every assignable id is taken.
    #[error("texture bank is full")]
    Full,
}

/// A format-agnostic cache of equally sized textures.
///
/// * Does **not** know about image or map files; loaders fill it.
/// * Stores exactly one copy of every name plus a half-brightness variant.
/// * The n-th inserted texture gets id `n - 1`, i.e. tile id `n`.
/// * The “missing” checkerboard lives outside the table and answers every
///   unknown id, including [`NO_TEXTURE`].
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
    halves: Vec<Texture>,
    missing: Texture,
    missing_half: Texture,
    w: usize,
    h: usize,
}

impl TextureBank {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The fallback takes no id and fixes the bank's texture size.
    pub fn new(missing_tex: Texture) -> Self {
        Self {
            by_name: HashMap::new(),
            data: Vec::new(),
            halves: Vec::new(),
            w: missing_tex.w,
            h: missing_tex.h,
            missing_half: missing_tex.halved(),
            missing: missing_tex,
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of inserted textures (the fallback is not counted).
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Shared `(width, height)` of every texture in the bank.
    #[inline]
    pub fn tex_size(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Fallback-safe query: unknown names resolve to [`NO_TEXTURE`].
    pub fn id_or_missing(&self, name: &str) -> TextureId {
        self.id(name).unwrap_or(NO_TEXTURE)
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Half-brightness variant of `id`.
    pub fn half(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.halves.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Hot-path lookup: unknown ids fall back to the checkerboard.
    #[inline(always)]
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data.get(id as usize).unwrap_or(&self.missing)
    }

    #[inline(always)]
    pub fn half_or_missing(&self, id: TextureId) -> &Texture {
        self.halves.get(id as usize).unwrap_or(&self.missing_half)
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`), the texture does
    ///   not match the bank size (`SizeMismatch`) or the table is full.
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        if tex.w != self.w || tex.h != self.h {
            return Err(TextureError::SizeMismatch {
                name,
                w: tex.w,
                h: tex.h,
                bank_w: self.w,
                bank_h: self.h,
            });
        }
        if tex.pixels.len() != tex.w * tex.h {
            return Err(TextureError::BadPixelCount(name));
        }
        // NO_TEXTURE stays unassigned
        let id = TextureId::try_from(self.data.len())
            .ok()
            .filter(|&id| id != NO_TEXTURE)
            .ok_or(TextureError::Full)?;
        self.halves.push(tex.halved());
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/// Panoramic background scrolled by view angle.
#[derive(Clone, Debug)]
pub struct Skybox {
    tex: Texture,
    light: Rgb,
}

impl Skybox {
    /// Wrap a panorama.  Without an explicit `light` the average colour of
    /// the image is used as the open-sky light.
    pub fn new(tex: Texture, light: Option<Rgb>) -> Self {
        let light = light.unwrap_or_else(|| average(&tex.pixels));
        Self { tex, light }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.tex.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.tex.h
    }

    #[inline]
    pub fn light(&self) -> Rgb {
        self.light
    }

    /// Half of the light colour, added to floors under an open ceiling.
    #[inline]
    pub fn ambient(&self) -> Rgb {
        self.light.half()
    }

    /// Sample the panorama; `x` wraps around the full width.
    #[inline(always)]
    pub fn texel(&self, x: i64, y: usize) -> Rgb {
        let x = x.rem_euclid(self.tex.w as i64) as usize;
        self.tex.texel(x, y.min(self.tex.h - 1))
    }
}

fn average(pixels: &[Rgb]) -> Rgb {
    if pixels.is_empty() {
        return Rgb::BLACK;
    }
    let (r, g, b) = pixels.iter().fold((0u64, 0u64, 0u64), |(r, g, b), p| {
        (r + p.r as u64, g + p.g as u64, b + p.b as u64)
    });
    let n = pixels.len() as u64;
    Rgb::new((r / n) as u8, (g / n) as u8, (b / n) as u8)
}

/// Generated textures so the viewers run without any asset files.
pub mod procedural {
    use super::{Rgb, TEX_SIZE, Texture};

    pub fn checker(name: &str, dark: Rgb, light: Rgb) -> Texture {
        let mut pix = Vec::with_capacity(TEX_SIZE * TEX_SIZE);
        for y in 0..TEX_SIZE {
            for x in 0..TEX_SIZE {
                pix.push(if ((x / 8) ^ (y / 8)) & 1 == 0 { light } else { dark });
            }
        }
        Texture {
            name: name.into(),
            w: TEX_SIZE,
            h: TEX_SIZE,
            pixels: pix,
        }
    }

    /// Running-bond bricks with a one-texel mortar line.
    pub fn bricks(name: &str, brick: Rgb, mortar: Rgb) -> Texture {
        const BRICK_H: usize = 16;
        const BRICK_W: usize = 32;
        let mut pix = Vec::with_capacity(TEX_SIZE * TEX_SIZE);
        for y in 0..TEX_SIZE {
            let row = y / BRICK_H;
            let offset = if row % 2 == 0 { 0 } else { BRICK_W / 2 };
            for x in 0..TEX_SIZE {
                let joint = y % BRICK_H == 0 || (x + offset) % BRICK_W == 0;
                // cheap per-brick tint so the wall isn't flat
                let tint = (((x + offset) / BRICK_W + row * 7) % 5) as f32 * 0.04;
                pix.push(if joint { mortar } else { brick.scale(0.8 + tint) });
            }
        }
        Texture {
            name: name.into(),
            w: TEX_SIZE,
            h: TEX_SIZE,
            pixels: pix,
        }
    }

    /// Vertical gradient from `top` to `bottom` with sparse stars.
    pub fn sky_gradient(name: &str, w: usize, h: usize, top: Rgb, bottom: Rgb) -> Texture {
        let mut pix = Vec::with_capacity(w * h);
        for y in 0..h {
            let t = y as f32 / h.max(1) as f32;
            let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
            let base = Rgb::new(lerp(top.r, bottom.r), lerp(top.g, bottom.g), lerp(top.b, bottom.b));
            for x in 0..w {
                let star = (x * 7919 + y * 104_729) % 211 == 0 && t < 0.6;
                pix.push(if star { Rgb::WHITE } else { base });
            }
        }
        Texture {
            name: name.into(),
            w,
            h,
            pixels: pix,
        }
    }

    /// Round-bodied creature on a black (transparent) background.
    pub fn ogre(name: &str, skin: Rgb) -> Texture {
        let c = TEX_SIZE as f32 / 2.0;
        let mut pix = vec![Rgb::BLACK; TEX_SIZE * TEX_SIZE];
        for y in 0..TEX_SIZE {
            for x in 0..TEX_SIZE {
                let dx = (x as f32 - c) / (c * 0.6);
                let dy = (y as f32 - c * 1.15) / (c * 0.85);
                let head = ((x as f32 - c).powi(2) + (y as f32 - c * 0.45).powi(2)).sqrt() < c * 0.28;
                if dx * dx + dy * dy < 1.0 || head {
                    pix[y * TEX_SIZE + x] = skin;
                }
            }
        }
        // eyes
        for (ex, ey) in [(c as usize - 5, (c * 0.4) as usize), (c as usize + 4, (c * 0.4) as usize)] {
            pix[ey * TEX_SIZE + ex] = Rgb::new(255, 230, 0);
        }
        Texture {
            name: name.into(),
            w: TEX_SIZE,
            h: TEX_SIZE,
            pixels: pix,
        }
    }

    /// Bank and sky for the built-in demo map.  Insertion order lines up with
    /// the map's tile ids: `1` blue bricks, `2` grey bricks, `3` floor,
    /// `4` ceiling, then the ogre sprite.
    pub fn demo_assets() -> Result<(super::TextureBank, super::Skybox), super::TextureError> {
        let mut bank = super::TextureBank::default_with_checker();
        bank.insert("BLUE_BRICKS", bricks("BLUE_BRICKS", Rgb::new(63, 63, 116), Rgb::new(34, 32, 52)))?;
        bank.insert("GREY_BRICKS", bricks("GREY_BRICKS", Rgb::new(132, 126, 135), Rgb::new(70, 70, 70)))?;
        bank.insert("FLOOR", checker("FLOOR", Rgb::new(34, 32, 52), Rgb::new(60, 56, 80)))?;
        let mut ceiling = checker("CEILING", Rgb::new(90, 80, 70), Rgb::new(120, 110, 96));
        ceiling.add_shade();
        bank.insert("CEILING", ceiling)?;
        bank.insert("RED_OGRE", ogre("RED_OGRE", Rgb::new(172, 50, 50)))?;

        let sky = sky_gradient("SKY", 512, 128, Rgb::new(20, 30, 90), Rgb::new(200, 150, 120));
        Ok((bank, super::Skybox::new(sky, None)))
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Tile;

    fn dummy_tex(v: u8) -> Texture {
        Texture::solid("Dummy", TEX_SIZE, TEX_SIZE, Rgb::new(v, v, v))
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::default_with_checker();
        let red = bank.insert("RED", dummy_tex(0x00)).unwrap();
        let blue = bank.insert("BLUE", dummy_tex(0xFF)).unwrap();

        assert_ne!(red, NO_TEXTURE);
        assert_ne!(blue, red);
        assert_eq!(bank.id("RED"), Some(red));
        assert_eq!(bank.id("BLUE"), Some(blue));
        assert_eq!(bank.id("NOPE"), None);

        assert_eq!(bank.texture(red).unwrap().pixels[0], Rgb::BLACK);
        assert_eq!(bank.texture(blue).unwrap().pixels[0], Rgb::WHITE);
    }

    #[test]
    fn first_texture_answers_tile_one() {
        let mut bank = TextureBank::default_with_checker();
        assert!(bank.is_empty());
        let first = bank.insert("FIRST", dummy_tex(10)).unwrap();
        let second = bank.insert("SECOND", dummy_tex(20)).unwrap();
        assert_eq!((first, second), (0, 1));
        assert_eq!(bank.len(), 2);

        let tile = Tile::from_id(1).texture().unwrap();
        assert_eq!(bank.texture_or_missing(tile).name, "FIRST");
        let second_tile = Tile::from_id(2).texture().unwrap();
        assert_eq!(bank.half_or_missing(second_tile).pixels[0], Rgb::new(10, 10, 10));
        // the fallback never shadows a real id
        assert_eq!(bank.texture_or_missing(NO_TEXTURE).name, "CHECKER");
        assert_eq!(bank.half_or_missing(2).pixels[0], Texture::default().halved().pixels[0]);
        assert_eq!(bank.texture(NO_TEXTURE).unwrap_err(), TextureError::BadId(NO_TEXTURE));
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::default_with_checker();
        bank.insert("WOOD", dummy_tex(1)).unwrap();
        let err = bank.insert("WOOD", dummy_tex(2)).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn bad_id_guard() {
        let bank = TextureBank::default_with_checker();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert_eq!(bank.texture_or_missing(bad).name, "CHECKER");
    }

    #[test]
    fn mismatched_size_rejected() {
        let mut bank = TextureBank::default_with_checker();
        let err = bank
            .insert("TINY", Texture::solid("TINY", 8, 8, Rgb::WHITE))
            .unwrap_err();
        assert!(matches!(err, TextureError::SizeMismatch { w: 8, h: 8, .. }));
    }

    #[test]
    fn half_variant_is_precomputed() {
        let mut bank = TextureBank::default_with_checker();
        let id = bank.insert("GREY", dummy_tex(200)).unwrap();
        assert_eq!(bank.half(id).unwrap().pixels[0], Rgb::new(100, 100, 100));
    }

    #[test]
    fn add_shade_darkens_bottom_rows() {
        let mut tex = dummy_tex(200);
        tex.add_shade();
        assert_eq!(tex.texel(0, 0), Rgb::new(200, 200, 200));
        assert!(tex.texel(0, TEX_SIZE - 1).r < 110);
    }

    #[test]
    fn skybox_average_light() {
        let mut tex = Texture::solid("SKY", 4, 2, Rgb::new(100, 0, 0));
        tex.pixels[0] = Rgb::new(200, 40, 0);
        tex.pixels[1] = Rgb::new(200, 40, 0);
        let sky = Skybox::new(tex, None);
        assert_eq!(sky.light(), Rgb::new(125, 10, 0));
        assert_eq!(sky.ambient(), Rgb::new(62, 5, 0));
    }

    #[test]
    fn skybox_texel_wraps() {
        let sky = Skybox::new(
            procedural::sky_gradient("SKY", 90, 12, Rgb::new(0, 0, 40), Rgb::new(40, 0, 80)),
            None,
        );
        let w = sky.width() as i64;
        for k in -3..w {
            for y in [0, 5, 11] {
                assert_eq!(sky.texel(w + k, y), sky.texel(k, y));
            }
        }
    }

    #[test]
    fn rgb_ops() {
        let c = Rgb::new(200, 100, 255);
        assert_eq!(c.half(), Rgb::new(100, 50, 127));
        assert_eq!(c.quarter(), Rgb::new(50, 25, 63));
        assert_eq!(c.saturating_add(Rgb::new(100, 0, 1)), Rgb::new(255, 100, 255));
        assert_eq!(c.to_u32(), 0x00C8_64FF);
    }
}
