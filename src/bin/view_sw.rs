//! First-person viewer.
//!
//! ```bash
//! cargo run --release --bin view_sw -- [--map level.dat|level.txt] [--scale 2]
//! ```
//!
//! W/S move, A/D strafe, ←/→ turn, Shift runs, Esc quits.

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use minifb::{Key, Scale, Window, WindowOptions};

use wolfcast::{
    map::MapFile,
    renderer::{RenderConfig, RenderFlags, RendererExt, Scene, software::Software},
    sim::{InputCmd, SIM_FPS, TicRunner},
    world::{Camera, DEFAULT_FOV, texture::procedural},
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Map to load (`.dat` binary or `.txt` text); the built-in demo if omitted
    #[arg(long, value_name = "FILE")]
    map: Option<PathBuf>,

    /// Render width in pixels
    #[arg(long, default_value_t = 320)]
    width: usize,

    /// Render height in pixels
    #[arg(long, default_value_t = 200)]
    height: usize,

    /// Window upscale factor (1, 2, 4 or 8)
    #[arg(long, default_value_t = 4)]
    scale: u8,

    /// Projected wall height multiplier
    #[arg(long, default_value_t = 1.0)]
    amplifier: f32,

    /// Disable distance shading of walls and floors
    #[arg(long)]
    no_shade: bool,

    /// Disable distance shading of sprites
    #[arg(long)]
    no_sprite_shade: bool,

    /// Disable the sky tint on floors under open ceilings
    #[arg(long)]
    no_sky_light: bool,
}

impl Opts {
    fn render_config(&self) -> RenderConfig {
        let mut flags = RenderFlags::all();
        flags.set(RenderFlags::SHADE, !self.no_shade);
        flags.set(RenderFlags::SPRITE_SHADE, !self.no_sprite_shade);
        flags.set(RenderFlags::FLOOR_SKY_LIGHT, !self.no_sky_light);
        RenderConfig {
            wall_amplifier: self.amplifier,
            flags,
            ..RenderConfig::default()
        }
    }

    fn window_scale(&self) -> Scale {
        match self.scale {
            0 | 1 => Scale::X1,
            2 | 3 => Scale::X2,
            4..=7 => Scale::X4,
            _ => Scale::X8,
        }
    }
}

fn load_map(path: Option<&Path>) -> anyhow::Result<MapFile> {
    let Some(path) = path else {
        log::info!("no --map given, using the built-in demo level");
        return Ok(MapFile::demo());
    };
    let map = if path.extension().is_some_and(|e| e == "txt") {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        MapFile::from_text(&src)?
    } else {
        MapFile::load(path)?
    };
    Ok(map)
}

fn read_input(win: &Window) -> InputCmd {
    let mut cmd = InputCmd::default();
    if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
        cmd.forward += 1.0;
    }
    if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
        cmd.forward -= 1.0;
    }
    if win.is_key_down(Key::A) {
        cmd.strafe -= 1.0;
    }
    if win.is_key_down(Key::D) {
        cmd.strafe += 1.0;
    }
    if win.is_key_down(Key::Left) {
        cmd.turn -= 1.0;
    }
    if win.is_key_down(Key::Right) {
        cmd.turn += 1.0;
    }
    cmd.run = win.is_key_down(Key::LeftShift) || win.is_key_down(Key::RightShift);
    cmd
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    let (grid, objects) = load_map(opts.map.as_deref())?.into_parts()?;
    let (bank, sky) = procedural::demo_assets()?;

    let mut sim = TicRunner::new();
    sim.spawn_objects(&objects, &bank)?;
    let (pos, angle) = sim.player_pose().context("player entity vanished")?;
    let mut camera = Camera::new(pos, angle, DEFAULT_FOV);

    let mut renderer = Software::new(opts.render_config());
    let mut sprites = Vec::new();

    let (w, h) = (opts.width, opts.height);
    let mut win = Window::new(
        "wolfcast",
        w,
        h,
        WindowOptions {
            scale: opts.window_scale(),
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(SIM_FPS as usize * 2);
    log::info!("{}x{} map, rendering at {w}x{h}", grid.width(), grid.height());

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        sim.set_input(read_input(&win));
        sim.pump(&grid);

        if let Some((pos, angle)) = sim.player_pose() {
            camera.set_pos(pos);
            camera.look_at(angle);
        }
        sim.sprite_snapshot(&mut sprites);

        let scene = Scene {
            camera: &camera,
            grid: &grid,
            bank: &bank,
            sky: &sky,
            sprites: &sprites,
        };
        let mut shown = Ok(());
        renderer.draw_frame(w, h, &scene, |fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            shown = win.update_with_buffer(fb, w, h);
        });
        shown?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            log::info!("avg render: {avg_ms:.2} ms  ({:.1} FPS)", 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
