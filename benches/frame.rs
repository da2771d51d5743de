use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use glam::Vec2;

use wolfcast::{
    map::MapFile,
    renderer::{RendererExt, Scene, SpriteInstance, software::Software},
    world::{Camera, DEFAULT_FOV, texture::procedural},
};

fn benchmark_full_frame(c: &mut Criterion) {
    let (grid, _) = MapFile::demo().into_parts().expect("demo map");
    let (bank, sky) = procedural::demo_assets().expect("demo assets");
    let ogre = bank.id("RED_OGRE").expect("ogre texture");
    let sprites = [
        SpriteInstance {
            tex: ogre,
            pos: Vec2::new(4.5, 5.5),
        },
        SpriteInstance {
            tex: ogre,
            pos: Vec2::new(3.5, 2.5),
        },
    ];
    let camera = Camera::new(Vec2::new(1.5, 1.5), 0.9, DEFAULT_FOV);
    let scene = Scene {
        camera: &camera,
        grid: &grid,
        bank: &bank,
        sky: &sky,
        sprites: &sprites,
    };

    let mut group = c.benchmark_group("full_frame");
    for (w, h) in [(320, 200), (640, 400), (1280, 800)] {
        let mut renderer = Software::default();
        group.bench_with_input(BenchmarkId::from_parameter(format!("{w}x{h}")), &(w, h), |b, &(w, h)| {
            b.iter(|| {
                renderer.draw_frame(w, h, &scene, |fb, _, _| {
                    black_box(fb[0]);
                })
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_full_frame);
criterion_main!(benches);
