//! 2-D top-down map viewer.
//!
//! ```bash
//! cargo run --release --bin wolfcast -- [map.dat|map.txt]
//! ```
//!
//! Shows the wall layer, every entity and its heading.  The player can be
//! steered with the first-person keys so the enemy AI has something to chase.

use minifb::{Key, Window, WindowOptions};

use wolfcast::{
    map::MapFile,
    sim::{Angle, Collider, InputCmd, Player, Position, TicRunner},
    world::{TileGrid, texture::procedural},
};

const WIDTH: usize = 768;
const HEIGHT: usize = 768;

const FLOOR: u32 = 0x00_646464;
const WALL: u32 = 0x00_C8C8C8;
const PLAYER: u32 = 0x00_30BE6A;
const ENEMY: u32 = 0x00_FF0000;
const HEADING: u32 = 0x00_FFFF00;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // ─────────── parse CLI ────────────
    let map = match std::env::args().nth(1) {
        Some(p) if p.ends_with(".txt") => MapFile::from_text(&std::fs::read_to_string(&p)?)?,
        Some(p) => MapFile::load(&p)?,
        None => MapFile::demo(),
    };
    let (grid, objects) = map.into_parts()?;
    let (bank, _) = procedural::demo_assets()?;

    let mut sim = TicRunner::new();
    sim.spawn_objects(&objects, &bank)?;

    // ─────────── tile → screen transform ────────────
    let tile = (WIDTH / grid.width().max(1)).min(HEIGHT / grid.height().max(1)).max(1);
    let offset_x = WIDTH.saturating_sub(tile * grid.width()) / 2;
    let offset_y = HEIGHT.saturating_sub(tile * grid.height()) / 2;
    let to_screen = |x: f32, y: f32| -> (i32, i32) {
        (
            (x * tile as f32) as i32 + offset_x as i32,
            (y * tile as f32) as i32 + offset_y as i32,
        )
    };

    let mut buffer = vec![0u32; WIDTH * HEIGHT];
    let mut window = Window::new("wolfcast map", WIDTH, HEIGHT, WindowOptions::default())?;
    window.set_target_fps(60);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let mut cmd = InputCmd::default();
        if window.is_key_down(Key::W) {
            cmd.forward += 1.0;
        }
        if window.is_key_down(Key::S) {
            cmd.forward -= 1.0;
        }
        if window.is_key_down(Key::Left) {
            cmd.turn -= 1.0;
        }
        if window.is_key_down(Key::Right) {
            cmd.turn += 1.0;
        }
        sim.set_input(cmd);
        sim.pump(&grid);

        buffer.fill(0);
        draw_grid(&mut buffer, &grid, tile, offset_x, offset_y);

        // ─────────── entities ────────────
        let world = sim.world();
        for (e, (pos, ang, col)) in world.query::<(&Position, &Angle, &Collider)>().iter() {
            let colour = if world.get::<&Player>(e).is_ok() {
                PLAYER
            } else {
                ENEMY
            };
            let (cx, cy) = to_screen(pos.0.x, pos.0.y);
            let r = (col.radius * tile as f32) as i32;
            fill_rect(&mut buffer, cx - r, cy - r, 2 * r, 2 * r, colour);

            let tip = pos.0 + glam::Vec2::from_angle(ang.0) * 0.6;
            let (tx, ty) = to_screen(tip.x, tip.y);
            draw_line(&mut buffer, WIDTH, HEIGHT, cx, cy, tx, ty, HEADING);
        }

        window.update_with_buffer(&buffer, WIDTH, HEIGHT)?;
    }
    Ok(())
}

fn draw_grid(buf: &mut [u32], grid: &TileGrid, tile: usize, ox: usize, oy: usize) {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let colour = if grid.wall(x as i32, y as i32).is_empty() {
                FLOOR
            } else {
                WALL
            };
            // one-pixel gap shows the grid lines
            let side = tile.saturating_sub(1) as i32;
            fill_rect(
                buf,
                (ox + x * tile) as i32,
                (oy + y * tile) as i32,
                side,
                side,
                colour,
            );
        }
    }
}

fn fill_rect(buf: &mut [u32], x0: i32, y0: i32, w: i32, h: i32, colour: u32) {
    for y in y0.max(0)..(y0 + h).min(HEIGHT as i32) {
        for x in x0.max(0)..(x0 + w).min(WIDTH as i32) {
            buf[y as usize * WIDTH + x as usize] = colour;
        }
    }
}

/// Integer Bresenham line-drawing algorithm.
#[allow(clippy::too_many_arguments)]
fn draw_line(
    buf: &mut [u32],
    w: usize,
    h: usize,
    mut x0: i32,
    mut y0: i32,
    x1: i32,
    y1: i32,
    colour: u32,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if (0..w as i32).contains(&x0) && (0..h as i32).contains(&y0) {
            buf[y0 as usize * w + x0 as usize] = colour;
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
