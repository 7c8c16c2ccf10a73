use glam::Vec2;
use terrain_sampler::prelude::*;
use terrain_sampler_examples::{render_samples_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    let samples = generate_samples(42, 100.0, 100.0, 10.0, DEFAULT_ATTEMPTS, &mut ())?;

    let mut closest = f32::INFINITY;
    for (i, a) in samples.iter().enumerate() {
        for b in &samples[i + 1..] {
            closest = closest.min(a.local.distance(b.local));
        }
    }
    println!(
        "seed 42, 100x100, r=10: {} samples, closest pair {closest:.2}",
        samples.len()
    );

    let config = RenderConfig::new((800, 800), Vec2::new(100.0, 100.0)).with_exclusion_radius(5.0);
    render_samples_to_png(&samples, &config, "poisson-scenario.png")?;
    Ok(())
}
