//! Site probes: the caller-side oracle consulted for every candidate.
//!
//! A probe answers two questions about a projected world point: whether the
//! spot is free (obstacle and collision checks) and how far below it the ground
//! lies. Errors are returned to the sampler, which aborts the run with them.
use glam::Vec3;

use crate::error::Result;

/// Acceptance and elevation oracle for candidate positions.
pub trait SiteProbe {
    /// Whether a rover may be placed at `candidate`.
    fn accepts(&mut self, candidate: Vec3) -> Result<bool>;

    /// Distance from `origin` straight down to the ground, at most `max_distance`.
    ///
    /// Returning `0.0` places samples on the top face of the region.
    fn ground_distance(&mut self, origin: Vec3, max_distance: f32) -> Result<f32> {
        let _ = (origin, max_distance);
        Ok(0.0)
    }
}

/// Accepts everything over flat ground.
impl SiteProbe for () {
    #[inline]
    fn accepts(&mut self, _candidate: Vec3) -> Result<bool> {
        Ok(true)
    }
}

impl<P: SiteProbe + ?Sized> SiteProbe for &mut P {
    #[inline]
    fn accepts(&mut self, candidate: Vec3) -> Result<bool> {
        (**self).accepts(candidate)
    }

    #[inline]
    fn ground_distance(&mut self, origin: Vec3, max_distance: f32) -> Result<f32> {
        (**self).ground_distance(origin, max_distance)
    }
}

/// A probe that forwards acceptance to a closure over flat ground.
pub struct FnProbe<F>
where
    F: FnMut(Vec3) -> bool,
{
    f: F,
}

impl<F> FnProbe<F>
where
    F: FnMut(Vec3) -> bool,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> SiteProbe for FnProbe<F>
where
    F: FnMut(Vec3) -> bool,
{
    #[inline]
    fn accepts(&mut self, candidate: Vec3) -> Result<bool> {
        Ok((self.f)(candidate))
    }
}

/// A probe backed by a height function `height(x, z)` and an obstacle predicate.
///
/// Ground distance is measured from the probe origin down to `height`, clamped to
/// `[0, max_distance]`; a ground above the origin counts as a miss.
pub struct TerrainProbe<H, A>
where
    H: FnMut(f32, f32) -> f32,
    A: FnMut(Vec3) -> bool,
{
    height: H,
    accept: A,
}

impl<H, A> TerrainProbe<H, A>
where
    H: FnMut(f32, f32) -> f32,
    A: FnMut(Vec3) -> bool,
{
    pub fn new(height: H, accept: A) -> Self {
        Self { height, accept }
    }
}

impl<H, A> SiteProbe for TerrainProbe<H, A>
where
    H: FnMut(f32, f32) -> f32,
    A: FnMut(Vec3) -> bool,
{
    fn accepts(&mut self, candidate: Vec3) -> Result<bool> {
        Ok((self.accept)(candidate))
    }

    fn ground_distance(&mut self, origin: Vec3, max_distance: f32) -> Result<f32> {
        let drop = origin.y - (self.height)(origin.x, origin.z);
        if (0.0..=max_distance).contains(&drop) {
            Ok(drop)
        } else {
            Ok(0.0)
        }
    }
}
