use std::hint::black_box;
use std::time::Instant;

use aviator_common::{SkyConfig, WaveConfig};
use aviator_kernel::SceneGraph;
use aviator_models::{AirPlane, Sea, Sky};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_sea_build(iterations: usize) {
    let start = Instant::now();
    for i in 0..iterations {
        let mut scene = SceneGraph::new();
        let mut rng = StdRng::seed_from_u64(i as u64);
        let _ = black_box(Sea::build(&mut scene, &WaveConfig::default(), &mut rng));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  sea build ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_sea_advance(iterations: usize) {
    let mut scene = SceneGraph::new();
    let mut rng = StdRng::seed_from_u64(42);
    let Ok(mut sea) = Sea::build(&mut scene, &WaveConfig::default(), &mut rng) else {
        return;
    };

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(sea.advance(black_box(&mut scene)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  sea advance ({} vertices, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        sea.waves().len()
    );
}

fn bench_full_scene_build(iterations: usize) {
    let start = Instant::now();
    for i in 0..iterations {
        let mut scene = SceneGraph::new();
        let mut rng = StdRng::seed_from_u64(i as u64);
        let _ = black_box(AirPlane::build(&mut scene));
        let _ = black_box(Sea::build(&mut scene, &WaveConfig::default(), &mut rng));
        let _ = black_box(Sky::build(&mut scene, &SkyConfig::default(), &mut rng));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  full scene build ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_state_hash(iterations: usize) {
    let mut scene = SceneGraph::new();
    let mut rng = StdRng::seed_from_u64(42);
    let _ = AirPlane::build(&mut scene);
    let _ = Sea::build(&mut scene, &WaveConfig::default(), &mut rng);
    let _ = Sky::build(&mut scene, &SkyConfig::default(), &mut rng);

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(black_box(&scene).state_hash());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  state hash ({} nodes, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}",
        scene.node_count()
    );
}

fn main() {
    println!("=== Wave Field Benchmarks ===\n");

    println!("Sea construction:");
    bench_sea_build(200);

    println!("\nSea advance:");
    bench_sea_advance(1000);
    bench_sea_advance(10000);

    println!("\nFull scene:");
    bench_full_scene_build(200);
    bench_state_hash(1000);

    println!("\n=== Done ===");
}
