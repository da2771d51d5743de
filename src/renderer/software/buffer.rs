//! Column-major RGB frame buffer.
//!
//! Every screen column is one contiguous slice (`columns[x * h .. x * h + h]`)
//! so the column pass can hand each rayon worker its own `&mut [Rgb]`
//! without locking.  [`PixelBuffer::present`] transposes into the row-major
//! `0x00RRGGBB` layout window back-ends expect.

use rayon::prelude::*;

use crate::{renderer::Rgba, world::Rgb};

#[derive(Default, Clone, Debug)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    columns: Vec<Rgb>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            columns: vec![Rgb::BLACK; width * height],
        }
    }

    /// Resize in place; contents are kept (callers overwrite every frame).
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.columns.resize(width * height, Rgb::BLACK);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at `(x, y)`.  Panics when out of range.
    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.columns[x * self.height + y]
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, c: Rgb) {
        self.columns[x * self.height + y] = c;
    }

    #[inline]
    pub fn column(&self, x: usize) -> &[Rgb] {
        &self.columns[x * self.height..(x + 1) * self.height]
    }

    #[inline]
    pub fn column_mut(&mut self, x: usize) -> &mut [Rgb] {
        &mut self.columns[x * self.height..(x + 1) * self.height]
    }

    /// Parallel iterator over `(x, column)`.
    pub fn par_columns_mut(&mut self) -> rayon::slice::ChunksMut<'_, Rgb> {
        // height 0 would make chunk size 0, which rayon rejects
        self.columns.par_chunks_mut(self.height.max(1))
    }

    pub fn fill(&mut self, c: Rgb) {
        self.columns.fill(c);
    }

    /// Write the row-major presentation copy into `dst`.
    pub fn present(&self, dst: &mut Vec<Rgba>) {
        dst.resize(self.width * self.height, 0);
        let h = self.height;
        let cols = &self.columns;
        dst.par_chunks_mut(self.width.max(1))
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.iter_mut().enumerate() {
                    *px = cols[x * h + y].to_u32();
                }
            });
    }
}
