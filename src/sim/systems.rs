use std::f32::consts::TAU;

use glam::Vec2;
use hecs::World;

use super::{
    collision::move_and_collide,
    components::{Angle, Collider, Enemy, InputCmd, Player, Position, Velocity},
    pathfinding::find_path,
    tic::DT,
};
use crate::{renderer::software::cast, world::TileGrid};

pub const MOVE_SPEED: f32 = 1.5625; // tiles / second
pub const RUN_FACTOR: f32 = 1.5;
pub const TURN_RATE: f32 = std::f32::consts::PI; // rad / second (180°/s)

/// Enemies sprint straight at a visible player closer than this.
pub const CHASE_RANGE: f32 = 3.125;
/// Seconds between path searches.
pub const REPATH_SECS: f32 = 5.0;

pub fn player_input(world: &mut World, player: hecs::Entity, cmd: InputCmd) {
    let Ok(mut q) = world.query_one::<(&mut Angle, &mut Velocity)>(player) else {
        return;
    };
    let Some((ang, vel)) = q.get() else {
        return;
    };

    /* 1. turn (scaled inside system) */
    if cmd.turn != 0.0 {
        ang.0 = (ang.0 + cmd.turn * TURN_RATE * DT).rem_euclid(TAU);
    }

    let speed = if cmd.run {
        MOVE_SPEED * RUN_FACTOR
    } else {
        MOVE_SPEED
    };

    /* 2. wish-vel (scaled inside system) */
    if cmd.forward != 0.0 || cmd.strafe != 0.0 {
        let fwd = Vec2::from_angle(ang.0);
        let right = fwd.perp();
        let wish = (fwd * cmd.forward + right * cmd.strafe).normalize_or_zero();
        vel.0 = wish * speed * DT;
    } else {
        vel.0 = Vec2::ZERO;
    }
}

/// Apply every velocity through the wall collider.
pub fn movement(world: &mut World, grid: &TileGrid) {
    for (_, (pos, vel, col)) in world.query_mut::<(&mut Position, &Velocity, &Collider)>() {
        if vel.0 != Vec2::ZERO {
            pos.0 = move_and_collide(grid, pos.0, col.radius, vel.0);
        }
    }
}

/// No wall tile between `from` and `to`.
pub fn line_of_sight(grid: &TileGrid, from: Vec2, to: Vec2) -> bool {
    // with an unnormalised direction the hit distance is the fraction of
    // the segment travelled
    match cast(grid, from, to - from) {
        None => true,
        Some(hit) => hit.perp_dist >= 1.0,
    }
}

/// Chase the player when in range and visible, otherwise walk the last
/// planned path.  Paths are re-planned every [`REPATH_SECS`].
pub fn enemy_ai(world: &mut World, grid: &TileGrid, dt: f32) {
    let Some(target) = world
        .query::<(&Position, &Player)>()
        .iter()
        .next()
        .map(|(_, (p, _))| p.0)
    else {
        return;
    };

    for (_, (pos, ang, enemy, col)) in
        world.query_mut::<(&mut Position, &mut Angle, &mut Enemy, &Collider)>()
    {
        enemy.repath_in -= dt;
        if enemy.repath_in <= 0.0 {
            let path = find_path(grid, pos.0.floor().as_ivec2(), target.floor().as_ivec2(), false);
            // first node is the tile we stand on
            enemy.path = path.iter().skip(1).map(|c| c.as_vec2() + 0.5).collect();
            enemy.repath_in = REPATH_SECS;
        }

        let step = enemy.speed * dt;
        let to_player = target - pos.0;
        let dist = to_player.length();

        if dist > col.radius && dist < CHASE_RANGE && line_of_sight(grid, pos.0, target) {
            ang.0 = to_player.y.atan2(to_player.x);
            pos.0 = move_and_collide(grid, pos.0, col.radius, to_player / dist * step);
        } else if let Some(&next) = enemy.path.first() {
            let d = next - pos.0;
            if d.length() <= step {
                pos.0 = move_and_collide(grid, pos.0, col.radius, d);
                enemy.path.remove(0);
            } else {
                ang.0 = d.y.atan2(d.x);
                pos.0 = move_and_collide(grid, pos.0, col.radius, d.normalize() * step);
            }
        }
    }
}
