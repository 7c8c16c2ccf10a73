//! Generates a small dataset with the headless raster backend.
//!
//! Usage: `pipeline-raster-dataset [config.toml] [output-dir]`
use std::path::PathBuf;

use glam::Vec3;
use terrain_sampler::prelude::*;
use terrain_sampler_examples::RasterBackend;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GenerationConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => default_config(),
    };
    let out = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dataset"));

    let camera = DepthCamera::new(60.0, 60.0, 128, 96);
    let mut backend = RasterBackend::new(config.region, camera);
    let mut runner = GenerationRunner::try_new(config, DataLayout::new(&out))?;

    let mut sink = FnSink::new(|event: GenerationEvent| match event {
        GenerationEvent::PassStarted { pass, data_dir } => {
            println!("== {pass} -> {}", data_dir.display())
        }
        GenerationEvent::PointsSampled {
            scene_index,
            poisson_seed,
            count,
        } => println!("scene {scene_index}: seed {poisson_seed} gave {count} samples"),
        GenerationEvent::ManifestWritten { path, entries, .. } => {
            println!("  {entries} entries -> {}", path.display())
        }
        GenerationEvent::Warning { context, message } => {
            eprintln!("warning [{context}]: {message}")
        }
        _ => {}
    });

    let summary = runner.run_with_events(&mut backend, &mut sink)?;
    println!(
        "done: {} scenes, {} samples",
        summary.scenes.len(),
        summary.total_samples()
    );
    Ok(())
}

fn default_config() -> GenerationConfig {
    GenerationConfig::new(SamplingRegion::new(
        Vec3::new(50.0, 5.0, 50.0),
        Vec3::new(100.0, 10.0, 100.0),
    ))
    .with_seeds(1, 1)
    .with_training(PassSettings::training().with_rounds(3, 2))
    .with_testing(PassSettings::testing().with_rounds(1, 1))
    .with_sampler(SamplerSettings::default().with_min_radius(12.0))
    .with_channels(vec![ImageChannel::new("depth", "depth_", ImageEncoding::Png)])
}
