//! Sampling region geometry and containment tests.
use glam::{Vec2, Vec3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How a candidate is tested against the region bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RegionTest {
    /// Local coordinate in `[0, width) x [0, height)`.
    #[default]
    HalfOpen,
    /// Projected world point inside the closed box, all three axes inclusive.
    Closed,
}

/// Axis-aligned box that candidates are drawn in.
///
/// The sampling plane is XZ. `size.x` is the width, `size.z` the height of the
/// plane and `size.y` the vertical extent probed below the top face.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplingRegion {
    /// World-space center of the box.
    pub center: Vec3,
    /// Full box extent.
    pub size: Vec3,
}

impl SamplingRegion {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    /// Region whose local and world XZ coordinates coincide, with a unit vertical extent.
    pub fn from_extent(width: f32, height: f32) -> Self {
        Self {
            center: Vec3::new(width / 2.0, 0.0, height / 2.0),
            size: Vec3::new(width, 1.0, height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.z
    }

    /// Planar extent `(width, height)`.
    #[inline]
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.size.x, self.size.z)
    }

    /// Center of the sampling plane in local coordinates.
    #[inline]
    pub fn local_center(&self) -> Vec2 {
        self.extent() / 2.0
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.size / 2.0
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.size / 2.0
    }

    /// World point on the top face for local `(0, 0)`.
    #[inline]
    pub fn local_origin(&self) -> Vec3 {
        self.center - Vec3::new(self.size.x, -self.size.y, self.size.z) / 2.0
    }

    /// Projects a local coordinate onto the top face of the box.
    #[inline]
    pub fn to_world(&self, local: Vec2) -> Vec3 {
        Vec3::new(local.x, 0.0, local.y) + self.local_origin()
    }

    pub fn contains_local(&self, local: Vec2) -> bool {
        local.x >= 0.0 && local.x < self.size.x && local.y >= 0.0 && local.y < self.size.z
    }

    pub fn contains_world(&self, world: Vec3) -> bool {
        let min = self.min();
        let max = self.max();
        world.cmpge(min).all() && world.cmple(max).all()
    }

    /// Applies `test` to a candidate given in both local and projected world form.
    pub fn contains(&self, test: RegionTest, local: Vec2, world: Vec3) -> bool {
        match test {
            RegionTest::HalfOpen => self.contains_local(local),
            RegionTest::Closed => self.contains_world(world),
        }
    }

    /// Checks that the planar extent is finite and positive.
    pub fn validate(&self) -> Result<()> {
        if !self.size.x.is_finite() || self.size.x <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "region width must be > 0, got {}",
                self.size.x
            )));
        }
        if !self.size.z.is_finite() || self.size.z <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "region height must be > 0, got {}",
                self.size.z
            )));
        }
        if !self.center.is_finite() || !self.size.y.is_finite() || self.size.y < 0.0 {
            return Err(Error::InvalidArgument(
                "region center and vertical extent must be finite".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SamplingRegion {
    fn default() -> Self {
        Self::from_extent(100.0, 100.0)
    }
}
