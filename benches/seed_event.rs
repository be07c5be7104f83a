//! Benchmarks for SeedFinder::run over a synthetic event.
//!
//! Run with:
//!   cargo bench --bench seed_event
//!   cargo bench seed_event -- seed_event/tracks_only
//!   cargo bench seed_event -- seed_event/tracks_with_noise

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use seedling::{ChannelId, Half, HitPool, PlaneDescriptor, SeedFinder, SeedingParams};

const Z_REF: f64 = 8520.0;
const PLANE_Z: [f64; 12] = [
    7826.0, 7896.0, 7966.0, 8036.0, 8508.0, 8578.0, 8648.0, 8718.0, 9193.0, 9263.0, 9333.0,
    9403.0,
];
const STEREO_SLOPE: f64 = 0.0874;

fn planes() -> Vec<PlaneDescriptor> {
    PLANE_Z
        .iter()
        .enumerate()
        .map(|(p, &z)| PlaneDescriptor {
            z,
            dxdy: match p % 4 {
                1 => STEREO_SLOPE,
                2 => -STEREO_SLOPE,
                _ => 0.0,
            },
        })
        .collect()
}

/// Deposit one straight 3-D track per call; ids stay globally unique.
fn add_track(pool: &mut HitPool, half: Half, x0: f64, tx: f64, ty: f64, next_id: &mut u32) {
    for (plane, &z) in PLANE_Z.iter().enumerate() {
        let dxdy = match plane % 4 {
            1 => STEREO_SLOPE,
            2 => -STEREO_SLOPE,
            _ => 0.0,
        };
        let x = x0 + tx * z - dxdy * ty * z;
        let id = ChannelId(*next_id);
        *next_id += 1;
        pool.add_hit(2 * plane + half.index(), id, x, 1.0).unwrap();
    }
}

fn add_noise(pool: &mut HitPool, per_zone: usize, next_id: &mut u32, rng: &mut StdRng) {
    for zone in 0..24 {
        for _ in 0..per_zone {
            let x = rng.random_range(-2500.0..2500.0);
            let id = ChannelId(*next_id);
            *next_id += 1;
            pool.add_hit(zone, id, x, 1.0).unwrap();
        }
    }
}

/// Deterministic event: 20 tracks spread over both halves.
fn make_event(noise_per_zone: usize) -> HitPool {
    let mut pool = HitPool::new(&planes(), Z_REF).unwrap();
    let mut next_id = 0;
    let mut rng = StdRng::seed_from_u64(42);
    for k in 0..20 {
        let half = if k % 2 == 0 { Half::Upper } else { Half::Lower };
        let sign = if half == Half::Upper { 1.0 } else { -1.0 };
        let x0 = -1900.0 + 200.0 * k as f64;
        let tx = rng.random_range(-0.15..0.15);
        let ty = sign * rng.random_range(0.005..0.05);
        add_track(&mut pool, half, x0, tx, ty, &mut next_id);
    }
    if noise_per_zone > 0 {
        add_noise(&mut pool, noise_per_zone, &mut next_id, &mut rng);
    }
    pool
}

fn bench_seed_event(c: &mut Criterion) {
    let mut group = c.benchmark_group("seed_event");

    let finder = SeedFinder::new(SeedingParams::default());
    let clean = make_event(0);
    let noisy = make_event(10);

    group.bench_function("tracks_only", |b| {
        b.iter_batched(
            || clean.clone(),
            |mut pool| {
                let tracks = finder.run(&mut pool);
                black_box(tracks);
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("tracks_with_noise", |b| {
        b.iter_batched(
            || noisy.clone(),
            |mut pool| {
                let tracks = finder.run(&mut pool);
                black_box(tracks);
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("x_only", |b| {
        let x_only = SeedFinder::new(
            SeedingParams::builder().x_only(true).build().unwrap(),
        );
        b.iter_batched(
            || noisy.clone(),
            |mut pool| {
                let tracks = x_only.run(&mut pool);
                black_box(tracks);
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(seed_benches, bench_seed_event);
criterion_main!(seed_benches);
