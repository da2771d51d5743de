use glam::Vec2;

use wolfcast::{
    map::MapFile,
    renderer::{
        RenderConfig, RenderFlags, Renderer, RendererExt, Scene, SpriteInstance,
        software::{Software, cast, hit_triple},
    },
    sim::TicRunner,
    world::{Camera, Rgb, Skybox, TEX_SIZE, Texture, TextureBank, Tile, TileGrid},
};

const WALL: Rgb = Rgb::new(180, 40, 40);
const SPRITE: Rgb = Rgb::new(40, 220, 40);
const SKY: Rgb = Rgb::new(10, 10, 160);

fn bank() -> TextureBank {
    let mut bank = TextureBank::default_with_checker();
    bank.insert("WALL", Texture::solid("WALL", TEX_SIZE, TEX_SIZE, WALL))
        .unwrap();
    bank.insert("SPRITE", Texture::solid("SPRITE", TEX_SIZE, TEX_SIZE, SPRITE))
        .unwrap();
    bank
}

fn flat() -> RenderConfig {
    RenderConfig {
        flags: RenderFlags::empty(),
        ..RenderConfig::default()
    }
}

fn render(
    r: &mut Software,
    (w, h): (usize, usize),
    camera: &Camera,
    grid: &TileGrid,
    sprites: &[SpriteInstance],
) -> Vec<u32> {
    let bank = bank();
    let sky = Skybox::new(Texture::solid("SKY", 64, 16, SKY), None);
    let scene = Scene {
        camera,
        grid,
        bank: &bank,
        sky: &sky,
        sprites,
    };
    let mut out = Vec::new();
    r.draw_frame(w, h, &scene, |fb, _, _| out.extend_from_slice(fb));
    out
}

#[test]
fn three_by_three_room() {
    let grid = TileGrid::bordered(3, 3, Tile::from_id(1), Tile::Empty, Tile::Empty);
    assert_eq!(
        hit_triple(cast(&grid, Vec2::new(1.5, 1.5), Vec2::X)),
        ((2, 1), 0.5, 0)
    );

    let cam = Camera::new(Vec2::new(1.5, 1.5), 0.0, 0.66);
    let mut r = Software::new(flat());
    let (w, h) = (40, 30);
    let fb = render(&mut r, (w, h), &cam, &grid, &[]);

    assert_eq!(fb.len(), w * h);
    // near walls fill the view; the slice end is clamped to h - 1, exclusive
    assert!(
        fb[..w * (h - 1)]
            .iter()
            .all(|&px| px == WALL.to_u32() || px == WALL.half().to_u32())
    );
    assert!((r.depth()[w / 2] - 0.5).abs() < 1e-6);
}

#[test]
fn sprite_in_front_of_far_wall() {
    let grid = TileGrid::bordered(12, 5, Tile::from_id(1), Tile::Empty, Tile::Empty);
    let cam = Camera::new(Vec2::new(1.5, 2.5), 0.0, 0.66);
    let (w, h) = (64, 48);
    let mut r = Software::new(flat());

    let visible = [SpriteInstance {
        tex: 1,
        pos: Vec2::new(4.5, 2.5),
    }];
    let fb = render(&mut r, (w, h), &cam, &grid, &visible);
    assert_eq!(fb[h / 2 * w + w / 2], SPRITE.to_u32());

    // same sprite pushed into the wall tile: hidden
    let hidden = [SpriteInstance {
        tex: 1,
        pos: Vec2::new(11.5, 2.5),
    }];
    let fb = render(&mut r, (w, h), &cam, &grid, &hidden);
    assert_eq!(fb[h / 2 * w + w / 2], WALL.to_u32());
}

#[test]
fn open_sky_shows_panorama() {
    let grid = TileGrid::empty(8, 8);
    let cam = Camera::new(Vec2::new(4.0, 4.0), 1.0, 0.66);
    let mut r = Software::new(flat());
    let (w, h) = (32, 20);
    let fb = render(&mut r, (w, h), &cam, &grid, &[]);
    assert!(fb[..w * h / 2].iter().all(|&px| px == SKY.to_u32()));
    assert!(r.depth().iter().all(|d| d.is_infinite()));
}

#[test]
fn resize_between_frames() {
    let grid = TileGrid::bordered(5, 5, Tile::from_id(1), Tile::Empty, Tile::Empty);
    let cam = Camera::new(Vec2::new(2.5, 2.5), 0.3, 0.66);
    let mut r = Software::new(flat());
    assert_eq!(render(&mut r, (16, 10), &cam, &grid, &[]).len(), 160);
    assert_eq!(render(&mut r, (24, 30), &cam, &grid, &[]).len(), 720);
    r.begin_frame(24, 30);
    assert_eq!(r.size(), (24, 30));
}

#[test]
fn demo_level_runs_end_to_end() {
    let (grid, objects) = MapFile::demo().into_parts().unwrap();
    let (bank, sky) = wolfcast::world::texture::procedural::demo_assets().unwrap();
    let mut sim = TicRunner::new();
    sim.spawn_objects(&objects, &bank).unwrap();
    for _ in 0..35 {
        sim.tick(&grid);
    }

    let (pos, angle) = sim.player_pose().unwrap();
    let cam = Camera::new(pos, angle, 0.66);
    let mut sprites = Vec::new();
    sim.sprite_snapshot(&mut sprites);

    let scene = Scene {
        camera: &cam,
        grid: &grid,
        bank: &bank,
        sky: &sky,
        sprites: &sprites,
    };
    let mut r = Software::default();
    let mut frames = 0;
    r.draw_frame(80, 50, &scene, |fb, w, h| {
        assert_eq!(fb.len(), w * h);
        frames += 1;
    });
    assert_eq!(frames, 1);
}
