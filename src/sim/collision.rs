//! Circle-vs-grid sliding.
//!
//! Motion is resolved one axis at a time (X then Y), so an actor pushing
//! diagonally into a wall keeps the parallel component and glides along it.
//! Cells outside the grid block like walls.

use glam::{IVec2, Vec2};

use crate::world::TileGrid;

#[inline]
fn blocks(grid: &TileGrid, cell: IVec2) -> bool {
    !grid.in_bounds(cell.x, cell.y) || grid.is_solid(cell)
}

/// Strict overlap between a circle and the unit square at `cell`; touching
/// does not count.
#[inline]
fn circle_hits_cell(centre: Vec2, radius: f32, cell: IVec2) -> bool {
    let min = cell.as_vec2();
    let closest = centre.clamp(min, min + Vec2::ONE);
    centre.distance_squared(closest) < radius * radius
}

/// Leading-edge test along one axis.  Returns the corrected coordinate on
/// that axis when the circle at `p` overlaps a blocking cell.
fn resolve_axis(grid: &TileGrid, p: Vec2, radius: f32, axis: usize, dir: f32) -> Option<f32> {
    let other = 1 - axis;
    let lead = (p[axis] + radius * dir).floor() as i32;
    let lo = (p[other] - radius).floor() as i32;
    let hi = (p[other] + radius).floor() as i32;

    for o in lo..=hi {
        let mut cell = IVec2::ZERO;
        cell[axis] = lead;
        cell[other] = o;
        if blocks(grid, cell) && circle_hits_cell(p, radius, cell) {
            return Some(if dir < 0.0 {
                lead as f32 + 1.0 + radius
            } else {
                lead as f32 - radius
            });
        }
    }
    None
}

/// Move a circle of `radius` at `pos` by `motion`; returns the new centre.
pub fn move_and_collide(grid: &TileGrid, pos: Vec2, radius: f32, motion: Vec2) -> Vec2 {
    let mut p = pos;
    for axis in 0..2 {
        if motion[axis] == 0.0 {
            continue;
        }
        p[axis] += motion[axis];
        if let Some(fixed) = resolve_axis(grid, p, radius, axis, motion[axis].signum()) {
            p[axis] = fixed;
        }
    }
    p
}
