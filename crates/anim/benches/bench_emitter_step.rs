use std::hint::black_box;
use std::time::Instant;

use beachfire_anim::{Emitter, EmitterConfig};

fn bench_step(label: &str, config: EmitterConfig, frames: usize) {
    let mut emitter = Emitter::new(config, 42).expect("valid preset");
    let dt = 1.0 / 60.0;

    let start = Instant::now();
    for _ in 0..frames {
        emitter.step(black_box(dt));
    }
    let elapsed = start.elapsed();
    let per_frame = elapsed / frames as u32;
    println!(
        "  {label} ({} particles, {frames} frames): {per_frame:?}/frame, total {elapsed:?}",
        emitter.len()
    );
}

fn main() {
    println!("=== Emitter step benchmarks ===");
    println!();

    bench_step("fire", EmitterConfig::fire(), 10_000);
    bench_step("smoke", EmitterConfig::smoke(), 10_000);
    bench_step("embers", EmitterConfig::embers(), 10_000);

    let large = EmitterConfig {
        count: 100_000,
        ..EmitterConfig::fire()
    };
    bench_step("fire x1000", large, 100);
}
