//! Poisson-disc sampling of positions in a rectangular region.
//!
//! [`PoissonDiscSampler`] is the full sampler: it consults a [`SiteProbe`] for
//! every candidate and produces [`Sample`]s with a world placement and heading.
//! [`PositionSampling`] is the plain 2D view used when only points are needed.
use mint::Vector2;
use rand::RngCore;

pub mod grid;
pub mod poisson;
pub mod probe;
pub mod region;
pub mod rng;

pub use grid::SpatialGrid;
pub use poisson::{
    generate_samples, PoissonDiscSampler, PoissonDiscSampling, Sample, DEFAULT_ATTEMPTS,
    DEFAULT_ELEVATION,
};
pub use probe::{FnProbe, SiteProbe, TerrainProbe};
pub use region::{RegionTest, SamplingRegion};
pub use rng::XorShift32;

/// Trait for position sampling.
///
/// Implementations return points in `[0, width) x [0, height)` for the given extent.
pub trait PositionSampling: Send + Sync {
    fn generate(&self, domain_extent: Vector2<f32>, rng: &mut dyn RngCore) -> Vec<Vector2<f32>>;
}
