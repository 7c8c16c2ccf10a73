use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use terrain_sampler::prelude::*;
use terrain_sampler_examples::{render_samples_to_png, RenderConfig, SampleStyle};

fn main() -> anyhow::Result<()> {
    let extent = Vec2::new(120.0, 80.0);
    let mut rng = StdRng::seed_from_u64(42);
    let points = PoissonDiscSampling::new(6.0).generate(extent.into(), &mut rng);

    let samples: Vec<Sample> = points
        .into_iter()
        .map(|p| {
            let local = Vec2::from(p);
            Sample {
                local,
                position: Vec3::new(local.x, 0.0, local.y),
                direction: Vec3::ZERO,
            }
        })
        .collect();
    println!("{} points in {}x{}", samples.len(), extent.x, extent.y);

    let config = RenderConfig::new((900, 600), extent).with_style(SampleStyle {
        color: [20, 120, 60],
        radius: 4,
        heading_len: 0,
    });
    render_samples_to_png(&samples, &config, "samplers-position-sampling.png")?;
    Ok(())
}
