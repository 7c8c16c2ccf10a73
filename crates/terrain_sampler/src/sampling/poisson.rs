//! Seeded Poisson-disc sampling of rover start poses.
//!
//! Candidates grow outward from the center of the sampling region (Bridson's
//! active-front method). Each candidate must pass, in order, the region
//! containment test, the caller's [`SiteProbe`], and the minimum-distance check
//! against samples in the surrounding 5x5 grid block.
use glam::{Vec2, Vec3};
use mint::Vector2;
use rand::RngCore;
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampling::grid::SpatialGrid;
use crate::sampling::probe::SiteProbe;
use crate::sampling::region::{RegionTest, SamplingRegion};
use crate::sampling::rng::XorShift32;
use crate::sampling::PositionSampling;

/// Candidates tried around a spawn point before it is retired.
pub const DEFAULT_ATTEMPTS: u32 = 30;
/// Height of a placed sample above the probed ground.
pub const DEFAULT_ELEVATION: f32 = 0.5;

/// An accepted sample.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Position in the sampling plane, relative to the region corner.
    pub local: Vec2,
    /// World placement, lifted to `elevation` above the probed ground.
    pub position: Vec3,
    /// Random planar heading (unit length, `y == 0`).
    pub direction: Vec3,
}

impl Sample {
    /// Heading as a yaw about +Y in degrees, measured from +Z toward +X, in `[0, 360)`.
    pub fn yaw_degrees(&self) -> f32 {
        let yaw = self.direction.x.atan2(self.direction.z).to_degrees();
        let yaw = yaw.rem_euclid(360.0);
        if yaw >= 360.0 {
            0.0
        } else {
            yaw
        }
    }
}

/// Poisson-disc sampler over a [`SamplingRegion`].
///
/// All run state (grid, active front, sample list and random stream) is rebuilt
/// from the stored seed on every [`PoissonDiscSampler::generate`] call, so repeated
/// calls with a pure probe return identical samples.
#[derive(Clone, Debug)]
pub struct PoissonDiscSampler {
    region: SamplingRegion,
    min_radius: f32,
    attempts: u32,
    elevation: f32,
    region_test: RegionTest,
    seed: u32,
    grid: SpatialGrid,
    samples: Vec<Sample>,
}

impl PoissonDiscSampler {
    /// Creates a sampler, failing with [`Error::InvalidArgument`] on a degenerate
    /// region, a non-positive radius, or a radius so small that the grid would
    /// exceed [`MAX_CELLS`](crate::sampling::grid::MAX_CELLS).
    pub fn new(region: SamplingRegion, min_radius: f32, seed: u32) -> Result<Self> {
        region.validate()?;
        if !min_radius.is_finite() || min_radius <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "min_radius must be > 0, got {min_radius}"
            )));
        }

        Ok(Self {
            region,
            min_radius,
            attempts: DEFAULT_ATTEMPTS,
            elevation: DEFAULT_ELEVATION,
            region_test: RegionTest::default(),
            seed,
            grid: SpatialGrid::new(region.extent(), min_radius)?,
            samples: Vec::new(),
        })
    }

    /// Sets the number of candidates tried per spawn point.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Sets the height above ground at which samples are placed.
    pub fn with_elevation(mut self, elevation: f32) -> Self {
        self.elevation = elevation;
        self
    }

    /// Sets the containment test used for candidates.
    pub fn with_region_test(mut self, region_test: RegionTest) -> Self {
        self.region_test = region_test;
        self
    }

    /// Sets the seed used by the next run.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn region(&self) -> &SamplingRegion {
        &self.region
    }

    pub fn min_radius(&self) -> f32 {
        self.min_radius
    }

    pub fn cell_size(&self) -> f32 {
        self.grid.cell_size()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn region_test(&self) -> RegionTest {
        self.region_test
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Grid index built by the last run.
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Samples accepted by the last run.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Reseeds and runs the sampler.
    pub fn resample<P>(&mut self, seed: u32, probe: &mut P) -> Result<&[Sample]>
    where
        P: SiteProbe + ?Sized,
    {
        self.seed = seed;
        self.generate(probe)
    }

    /// Runs the sampler, returning the accepted samples.
    ///
    /// The region center only seeds the active front; it is never probed or
    /// emitted. If every candidate around it is rejected the result is empty.
    /// Probe errors abort the run and are returned unchanged; the partial run is
    /// discarded, leaving [`samples`](Self::samples) empty.
    pub fn generate<P>(&mut self, probe: &mut P) -> Result<&[Sample]>
    where
        P: SiteProbe + ?Sized,
    {
        if self.attempts == 0 {
            return Err(Error::InvalidArgument("attempts must be >= 1".into()));
        }

        self.grid.clear();
        self.samples.clear();
        if let Err(e) = self.fill(probe) {
            self.grid.clear();
            self.samples.clear();
            return Err(e);
        }

        if self.samples.is_empty() {
            warn!(
                "Poisson sampling (seed {}) accepted no samples; the region center may be blocked.",
                self.seed
            );
        } else {
            debug!(
                "Poisson sampling (seed {}) accepted {} samples.",
                self.seed,
                self.samples.len()
            );
        }

        Ok(&self.samples)
    }

    fn fill<P>(&mut self, probe: &mut P) -> Result<()>
    where
        P: SiteProbe + ?Sized,
    {
        let mut rng = XorShift32::from_user_seed(self.seed);
        let mut front = vec![self.region.local_center()];

        while !front.is_empty() {
            let spawn_index = rng.next_index(front.len());
            let center = front[spawn_index];
            let mut accepted = false;

            for _ in 0..self.attempts {
                let dir = rng.next_direction();
                let distance = rng.next_f32_range(self.min_radius, 2.0 * self.min_radius);
                let candidate = center + dir * distance;
                let world = self.region.to_world(candidate);

                if self.is_valid(candidate, world, probe)? {
                    self.accept(candidate, world, &mut rng, probe)?;
                    front.push(candidate);
                    accepted = true;
                    break;
                }
            }

            if !accepted {
                front.remove(spawn_index);
            }
        }
        Ok(())
    }

    fn is_valid<P>(&self, candidate: Vec2, world: Vec3, probe: &mut P) -> Result<bool>
    where
        P: SiteProbe + ?Sized,
    {
        if !self.region.contains(self.region_test, candidate, world) {
            return Ok(false);
        }
        if !probe.accepts(world)? {
            return Ok(false);
        }
        Ok(self.is_far_enough(candidate))
    }

    fn is_far_enough(&self, candidate: Vec2) -> bool {
        self.grid
            .neighbors(candidate)
            .all(|i| self.samples[i].local.distance(candidate) >= self.min_radius)
    }

    fn accept<P>(
        &mut self,
        candidate: Vec2,
        world: Vec3,
        rng: &mut XorShift32,
        probe: &mut P,
    ) -> Result<()>
    where
        P: SiteProbe + ?Sized,
    {
        let heading = rng.next_direction();
        let ground = probe.ground_distance(world, self.region.size.y)?;
        self.samples.push(Sample {
            local: candidate,
            position: world + Vec3::new(0.0, self.elevation - ground, 0.0),
            direction: Vec3::new(heading.x, 0.0, heading.y),
        });
        self.grid.insert(candidate, self.samples.len() - 1);
        Ok(())
    }
}

/// Samples a `width x height` region whose local and world XZ coordinates coincide.
pub fn generate_samples<P>(
    seed: u32,
    width: f32,
    height: f32,
    min_radius: f32,
    attempts: u32,
    probe: &mut P,
) -> Result<Vec<Sample>>
where
    P: SiteProbe + ?Sized,
{
    let region = SamplingRegion::from_extent(width, height);
    let mut sampler = PoissonDiscSampler::new(region, min_radius, seed)?.with_attempts(attempts);
    sampler.generate(probe)?;
    Ok(sampler.samples)
}

/// Poisson-disc strategy for plain 2D point sets.
#[derive(Debug, Clone)]
pub struct PoissonDiscSampling {
    /// Minimum distance between samples in world units.
    pub radius: f32,
    /// Candidates tried per spawn point.
    pub attempts: u32,
}

impl PoissonDiscSampling {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            attempts: DEFAULT_ATTEMPTS,
        }
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }
}

impl PositionSampling for PoissonDiscSampling {
    fn generate(&self, domain_extent: Vector2<f32>, rng: &mut dyn RngCore) -> Vec<Vector2<f32>> {
        let extent = Vec2::from(domain_extent);
        let seed = rng.next_u32();
        match generate_samples(seed, extent.x, extent.y, self.radius, self.attempts, &mut ()) {
            Ok(samples) => samples.into_iter().map(|s| s.local.into()).collect(),
            Err(e) => {
                debug!("Poisson sampling skipped: {e}");
                Vec::new()
            }
        }
    }
}
