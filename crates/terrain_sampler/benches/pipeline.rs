mod common;

use std::hint::black_box;
use std::path::{Path, PathBuf};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use terrain_sampler::prelude::*;

fn rolling_height(x: f32, z: f32) -> f32 {
    2.0 * (x * 0.05).sin() * (z * 0.07).cos()
}

/// Backend that answers probes from a height function and renders nothing.
struct HeadlessBackend;

impl SiteProbe for HeadlessBackend {
    fn accepts(&mut self, _candidate: Vec3) -> Result<bool> {
        Ok(true)
    }

    fn ground_distance(&mut self, origin: Vec3, max_distance: f32) -> Result<f32> {
        let drop = origin.y - rolling_height(origin.x, origin.z);
        if (0.0..=max_distance).contains(&drop) {
            Ok(drop)
        } else {
            Ok(0.0)
        }
    }
}

impl SceneBackend for HeadlessBackend {
    fn generate_terrain(&mut self, _seed: i32, _scene: i32, _layout: &DataLayout) -> Result<()> {
        Ok(())
    }

    fn camera(&self) -> DepthCamera {
        DepthCamera::new(120.0, 60.0, 256, 192)
    }

    fn capture_image(
        &mut self,
        _channel: &ImageChannel,
        _sample: &Sample,
        _path: &Path,
    ) -> Result<()> {
        Ok(())
    }
}

fn bench_dir() -> PathBuf {
    std::env::temp_dir().join(format!("terrain_sampler_bench_{}", std::process::id()))
}

fn pipeline_manifest_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline/manifest_toml");
    let camera = DepthCamera::new(120.0, 60.0, 256, 192);

    for &radius in &[16.0f32, 8.0, 4.0] {
        let Ok(mut sampler) = PoissonDiscSampler::new(SamplingRegion::default(), radius, 7) else {
            continue;
        };
        let samples = sampler.generate(&mut ()).map(<[_]>::to_vec).unwrap_or_default();
        group.throughput(common::elements_throughput(samples.len()));

        group.bench_with_input(BenchmarkId::from_parameter(radius), &radius, |b, _| {
            b.iter(|| {
                let mut manifest = SceneManifest::new(&camera);
                for (i, s) in samples.iter().enumerate() {
                    manifest.push(ManifestEntry::from_engine_pose(
                        vec![format!("depth_{i}.exr")],
                        s.position,
                        s.yaw_degrees(),
                    ));
                }
                black_box(manifest.to_toml_string().map(|t| t.len()).unwrap_or(0));
            });
        });
    }

    group.finish();
}

fn pipeline_run_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline/run");
    let base = bench_dir();

    for &rounds in &[1u32, 4] {
        let config = GenerationConfig::new(SamplingRegion::new(
            Vec3::new(50.0, 5.0, 50.0),
            Vec3::new(100.0, 10.0, 100.0),
        ))
        .with_training(PassSettings::training().with_rounds(2, rounds))
        .with_testing(PassSettings::testing().with_rounds(1, rounds));
        let Ok(mut runner) = GenerationRunner::try_new(config, DataLayout::new(&base)) else {
            continue;
        };
        group.throughput(common::elements_throughput(3 * rounds as usize));

        group.bench_with_input(BenchmarkId::from_parameter(rounds), &rounds, |b, _| {
            b.iter(|| {
                let samples = runner
                    .run(&mut HeadlessBackend)
                    .map(|s| s.total_samples())
                    .unwrap_or(0);
                black_box(samples);
            });
        });
    }

    group.finish();
    let _ = std::fs::remove_dir_all(&base);
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = pipeline_manifest_benches, pipeline_run_benches
}
criterion_main!(benches);
