//! Grid ray caster (DDA).
//!
//! Steps the ray one tile boundary at a time along whichever axis is reached
//! first until a non-empty wall tile is found or the ray leaves the grid.
//! The returned distance is measured along the camera's forward axis, not
//! Euclidean, so projected wall heights show no fisheye bowing.

use glam::{IVec2, Vec2};

use super::distance::FAR;
use crate::world::TileGrid;

/// Which grid-line orientation the ray crossed to hit the wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Vertical grid-line (an X step caused the hit).
    X = 0,
    /// Horizontal grid-line (a Y step caused the hit).
    Y = 1,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub tile: IVec2,
    pub perp_dist: f32,
    pub side: Side,
}

/// Cast a ray from `origin` along `dir` (tile units, `dir` need not be
/// normalised).  `None` when the ray leaves the grid without hitting a wall
/// or starts outside it.
pub fn cast(grid: &TileGrid, origin: Vec2, dir: Vec2) -> Option<RayHit> {
    let cell = origin.floor();
    if !cell.is_finite()
        || cell.x < 0.0
        || cell.y < 0.0
        || cell.x >= grid.width() as f32
        || cell.y >= grid.height() as f32
    {
        return None;
    }
    // in-grid start: stepping stays within one tile of the bounds
    let mut map = cell.as_ivec2();

    let delta_x = if dir.x == 0.0 { FAR } else { (1.0 / dir.x).abs() };
    let delta_y = if dir.y == 0.0 { FAR } else { (1.0 / dir.y).abs() };

    let (step_x, mut side_x) = if dir.x < 0.0 {
        (-1, (origin.x - map.x as f32) * delta_x)
    } else {
        (1, (map.x as f32 + 1.0 - origin.x) * delta_x)
    };
    let (step_y, mut side_y) = if dir.y < 0.0 {
        (-1, (origin.y - map.y as f32) * delta_y)
    } else {
        (1, (map.y as f32 + 1.0 - origin.y) * delta_y)
    };

    loop {
        let side = if side_x < side_y {
            side_x += delta_x;
            map.x += step_x;
            Side::X
        } else {
            side_y += delta_y;
            map.y += step_y;
            Side::Y
        };

        if !grid.in_bounds(map.x, map.y) {
            return None;
        }

        if !grid.wall(map.x, map.y).is_empty() {
            let perp_dist = match side {
                Side::X => side_x - delta_x,
                Side::Y => side_y - delta_y,
            };
            return Some(RayHit {
                tile: map,
                perp_dist,
                side,
            });
        }
    }
}

/// Legacy triple `(tile, distance, side)` with `((-1, -1), -1, -1)` as the
/// no-hit sentinel.
pub fn hit_triple(hit: Option<RayHit>) -> ((i32, i32), f32, i32) {
    match hit {
        Some(h) => ((h.tile.x, h.tile.y), h.perp_dist, h.side as i32),
        None => ((-1, -1), -1.0, -1),
    }
}
