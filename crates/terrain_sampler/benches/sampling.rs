mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Vec2, Vec3};
use terrain_sampler::sampling::{
    PoissonDiscSampler, PoissonDiscSampling, PositionSampling, SamplingRegion, SpatialGrid,
    TerrainProbe, XorShift32,
};

const RADII: [f32; 5] = [64.0, 32.0, 16.0, 8.0, 4.0];
const EXTENT: f32 = 1024.0;

fn rolling_height(x: f32, z: f32) -> f32 {
    2.0 * (x * 0.05).sin() * (z * 0.07).cos()
}

fn sampling_poisson_disc_benches(c: &mut Criterion) {
    let region = SamplingRegion::from_extent(EXTENT, EXTENT);
    let mut group = c.benchmark_group("sampling/poisson_disc");

    for &radius in &RADII {
        let Ok(mut sampler) = PoissonDiscSampler::new(region, radius, 0xBEEF) else {
            continue;
        };
        let expected = sampler.generate(&mut ()).map(<[_]>::len).unwrap_or(0);
        group.throughput(common::elements_throughput(expected));

        let mut seed = 0u32;
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
            b.iter(|| {
                seed = seed.wrapping_add(1);
                let n = sampler.resample(seed, &mut ()).map(<[_]>::len).unwrap_or(0);
                black_box(n);
            });
        });
    }

    group.finish();
}

fn sampling_terrain_probe_benches(c: &mut Criterion) {
    let region = SamplingRegion::new(
        Vec3::new(EXTENT / 2.0, 5.0, EXTENT / 2.0),
        Vec3::new(EXTENT, 10.0, EXTENT),
    );
    let mut group = c.benchmark_group("sampling/terrain_probe");

    for &radius in &RADII[1..] {
        let Ok(mut sampler) = PoissonDiscSampler::new(region, radius, 0xC0FFEE) else {
            continue;
        };
        // reject a band of "water" across the middle of the map
        let mut probe = TerrainProbe::new(rolling_height, |p: Vec3| {
            !(EXTENT * 0.45..EXTENT * 0.55).contains(&p.z)
        });
        let expected = sampler.generate(&mut probe).map(<[_]>::len).unwrap_or(0);
        group.throughput(common::elements_throughput(expected));

        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
            b.iter(|| {
                let n = sampler.generate(&mut probe).map(<[_]>::len).unwrap_or(0);
                black_box(n);
            });
        });
    }

    group.finish();
}

fn sampling_position_benches(c: &mut Criterion) {
    let extent = Vec2::new(EXTENT, EXTENT);
    let mut group = c.benchmark_group("sampling/position_sampling");

    for &radius in &RADII {
        let strategy = PoissonDiscSampling::new(radius);
        let mut rng_est = XorShift32::from_user_seed(0xA11CE ^ radius as u32);
        let expected = strategy.generate(extent.into(), &mut rng_est).len();
        group.throughput(common::elements_throughput(expected));

        let mut rng = XorShift32::from_user_seed(0xE57 ^ radius as u32);
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
            b.iter(|| {
                let pts = strategy.generate(extent.into(), &mut rng);
                black_box(pts.len());
            });
        });
    }

    group.finish();
}

fn sampling_grid_benches(c: &mut Criterion) {
    let extent = Vec2::new(EXTENT, EXTENT);
    let mut group = c.benchmark_group("sampling/grid_neighbors");

    for &radius in &RADII {
        let mut grid = SpatialGrid::new(extent, radius);
        let (cols, rows) = grid.dims();
        let cell = grid.cell_size();
        let mut index = 0;
        for row in 0..rows {
            for col in 0..cols {
                let p = Vec2::new((col as f32 + 0.5) * cell, (row as f32 + 0.5) * cell);
                grid.insert(p, index);
                index += 1;
            }
        }
        group.throughput(common::elements_throughput(index));

        let mut rng = XorShift32::from_user_seed(radius as u32);
        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
            b.iter(|| {
                let p = Vec2::new(rng.next_f32() * EXTENT, rng.next_f32() * EXTENT);
                black_box(grid.neighbors(p).count());
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = sampling_poisson_disc_benches, sampling_terrain_probe_benches,
        sampling_position_benches, sampling_grid_benches
}
criterion_main!(benches);
