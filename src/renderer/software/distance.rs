//! Row → floor-distance lookup used by floor/ceiling casting.
//!
//! ```text
//! distance(y) = h / (2y − h)        (centre row → 1e30)
//! ```
//!
//! Must be rebuilt whenever the screen height changes; the column pass
//! `debug_assert!`s the table length against the frame height.

/// Stand-in for "infinitely far" wherever a reciprocal would divide by 0.
pub const FAR: f32 = 1e30;

#[derive(Default, Clone, Debug, PartialEq)]
pub struct DistanceTable {
    rows: Vec<f32>,
}

impl DistanceTable {
    pub fn new(height: usize) -> Self {
        let mut t = Self::default();
        t.recompute(height);
        t
    }

    /// Rebuild for `height` rows.  Calling it again with the same height
    /// yields an identical table.
    pub fn recompute(&mut self, height: usize) {
        let h = height as f32;
        self.rows.clear();
        self.rows.extend((0..height).map(|y| {
            let denom = 2.0 * y as f32 - h;
            if denom == 0.0 { FAR } else { h / denom }
        }));
        log::debug!("distance table rebuilt for {height} rows");
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline(always)]
    pub fn get(&self, y: usize) -> f32 {
        self.rows[y]
    }

    #[inline]
    pub fn rows(&self) -> &[f32] {
        &self.rows
    }
}
