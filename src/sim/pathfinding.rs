//! Grid A* over the wall layer.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

use glam::IVec2;

use crate::world::TileGrid;

/// Node expansions before a search gives up.
pub const MAX_DEPTH: usize = 5000;

const ORTHO: [IVec2; 4] = [IVec2::new(0, -1), IVec2::new(0, 1), IVec2::new(-1, 0), IVec2::new(1, 0)];
const DIAG: [IVec2; 4] = [
    IVec2::new(-1, -1),
    IVec2::new(-1, 1),
    IVec2::new(1, -1),
    IVec2::new(1, 1),
];

#[derive(Clone, Copy, PartialEq, Eq)]
struct Open {
    f: u32,
    g: u32,
    cell: IVec2,
}

// min-heap on f, ties broken towards deeper nodes
impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| (other.cell.x, other.cell.y).cmp(&(self.cell.x, self.cell.y)))
    }
}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[inline]
fn walkable(grid: &TileGrid, c: IVec2) -> bool {
    grid.in_bounds(c.x, c.y) && !grid.is_solid(c)
}

/// Admissible for unit step cost: Manhattan for 4-way, Chebyshev for 8-way.
#[inline]
fn heuristic(a: IVec2, b: IVec2, diagonals: bool) -> u32 {
    let d = (a - b).abs();
    if diagonals {
        d.x.max(d.y) as u32
    } else {
        (d.x + d.y) as u32
    }
}

/// Shortest walkable path from `start` to `goal`, both ends included.
///
/// Every step costs 1.  Diagonal steps never cut a wall corner.  Returns an
/// empty path when the goal is unreachable, either end is a wall, or the
/// search exceeds [`MAX_DEPTH`] expansions.
pub fn find_path(grid: &TileGrid, start: IVec2, goal: IVec2, diagonals: bool) -> Vec<IVec2> {
    if !walkable(grid, start) || !walkable(grid, goal) {
        return Vec::new();
    }

    let mut open = BinaryHeap::new();
    let mut best_g: HashMap<IVec2, u32> = HashMap::new();
    let mut parent: HashMap<IVec2, IVec2> = HashMap::new();

    best_g.insert(start, 0);
    open.push(Open {
        f: heuristic(start, goal, diagonals),
        g: 0,
        cell: start,
    });

    let mut expanded = 0usize;
    while let Some(Open { g, cell, .. }) = open.pop() {
        if best_g.get(&cell).is_some_and(|&b| g > b) {
            continue; // stale entry
        }
        if cell == goal {
            let mut path = vec![goal];
            let mut c = goal;
            while let Some(&p) = parent.get(&c) {
                path.push(p);
                c = p;
            }
            path.reverse();
            return path;
        }

        expanded += 1;
        if expanded > MAX_DEPTH {
            log::warn!("path search {start} → {goal} hit the depth limit ({MAX_DEPTH})");
            return Vec::new();
        }

        let diag: &[IVec2] = if diagonals { &DIAG } else { &[] };
        for &d in ORTHO.iter().chain(diag) {
            let next = cell + d;
            if !walkable(grid, next) {
                continue;
            }
            if d.x != 0
                && d.y != 0
                && (!walkable(grid, cell + IVec2::new(d.x, 0))
                    || !walkable(grid, cell + IVec2::new(0, d.y)))
            {
                continue;
            }
            let ng = g + 1;
            if best_g.get(&next).is_some_and(|&b| ng >= b) {
                continue;
            }
            best_g.insert(next, ng);
            parent.insert(next, cell);
            open.push(Open {
                f: ng + heuristic(next, goal, diagonals),
                g: ng,
                cell: next,
            });
        }
    }
    Vec::new()
}
