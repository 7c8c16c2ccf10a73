use glam::{Vec2, Vec3};
use terrain_sampler::prelude::*;
use terrain_sampler_examples::{render_samples_to_png, HeightField, RenderConfig, SampleStyle};

fn main() -> anyhow::Result<()> {
    let region = SamplingRegion::new(Vec3::new(100.0, 5.0, 100.0), Vec3::new(200.0, 10.0, 200.0));
    let field = HeightField::generate(7, &region, 3.0, 60);

    let mut probe_calls = 0;
    let mut probe = TerrainProbe::new(
        |x: f32, z: f32| field.height(x, z),
        |p: Vec3| {
            probe_calls += 1;
            field.height(p.x, p.z) >= -1.5 && !field.blocked(p.x, p.z)
        },
    );

    let mut sampler = PoissonDiscSampler::new(region, 8.0, 3)?.with_elevation(0.5);
    let samples = sampler.generate(&mut probe)?.to_vec();
    drop(probe);

    let lowest = samples
        .iter()
        .map(|s| s.position.y)
        .fold(f32::INFINITY, f32::min);
    println!(
        "{} samples after {probe_calls} probe calls, lowest rover height {lowest:.2}",
        samples.len()
    );

    let config = RenderConfig::new((800, 800), Vec2::new(200.0, 200.0))
        .with_background([200, 220, 190])
        .with_style(SampleStyle {
            color: [40, 60, 200],
            radius: 4,
            heading_len: 12,
        });
    render_samples_to_png(&samples, &config, "poisson-terrain-probe.png")?;
    Ok(())
}
