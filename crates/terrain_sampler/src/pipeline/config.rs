//! Configuration for dataset generation runs.
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampling::{
    PoissonDiscSampler, RegionTest, SamplingRegion, DEFAULT_ATTEMPTS, DEFAULT_ELEVATION,
};

/// Which half of the dataset a pass produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pass {
    Training,
    Testing,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Training => f.write_str("training"),
            Pass::Testing => f.write_str("testing"),
        }
    }
}

/// Round counts and output folder for one pass.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PassSettings {
    /// Number of terrains (scenes) generated in this pass.
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub terrain_rounds: u32,
    /// Number of sampler seeds run on each terrain.
    #[cfg_attr(feature = "serde", serde(default = "one"))]
    pub poisson_rounds: u32,
    /// Folder under the layout base directory receiving this pass.
    pub data_folder_name: String,
}

impl PassSettings {
    pub fn new(data_folder_name: impl Into<String>) -> Self {
        Self {
            terrain_rounds: 1,
            poisson_rounds: 1,
            data_folder_name: data_folder_name.into(),
        }
    }

    pub fn training() -> Self {
        Self::new("TrainingData")
    }

    pub fn testing() -> Self {
        Self::new("TestingData")
    }

    /// Sets both round counts.
    pub fn with_rounds(mut self, terrain_rounds: u32, poisson_rounds: u32) -> Self {
        self.terrain_rounds = terrain_rounds;
        self.poisson_rounds = poisson_rounds;
        self
    }
}

#[cfg(feature = "serde")]
fn one() -> u32 {
    1
}

impl Default for PassSettings {
    fn default() -> Self {
        Self::training()
    }
}

/// Sampler parameters shared by every round.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SamplerSettings {
    pub min_radius: f32,
    pub attempts: u32,
    pub elevation: f32,
    pub region_test: RegionTest,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            min_radius: 10.0,
            attempts: DEFAULT_ATTEMPTS,
            elevation: DEFAULT_ELEVATION,
            region_test: RegionTest::HalfOpen,
        }
    }
}

impl SamplerSettings {
    pub fn with_min_radius(mut self, min_radius: f32) -> Self {
        self.min_radius = min_radius;
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_elevation(mut self, elevation: f32) -> Self {
        self.elevation = elevation;
        self
    }

    pub fn with_region_test(mut self, region_test: RegionTest) -> Self {
        self.region_test = region_test;
        self
    }

    /// Builds a sampler over `region` seeded with `seed`.
    pub fn build(&self, region: SamplingRegion, seed: u32) -> Result<PoissonDiscSampler> {
        if self.attempts == 0 {
            return Err(Error::InvalidArgument("attempts must be >= 1".into()));
        }
        Ok(PoissonDiscSampler::new(region, self.min_radius, seed)?
            .with_attempts(self.attempts)
            .with_elevation(self.elevation)
            .with_region_test(self.region_test))
    }
}

/// Output encoding of a captured image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ImageEncoding {
    Exr,
    Png,
    Jpg,
}

impl ImageEncoding {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageEncoding::Exr => "exr",
            ImageEncoding::Png => "png",
            ImageEncoding::Jpg => "jpg",
        }
    }
}

/// A camera output captured at every sample.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageChannel {
    /// Sensor name handed to the backend.
    pub name: String,
    /// File name prefix; empty means `image_`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub prefix: String,
    pub encoding: ImageEncoding,
}

impl ImageChannel {
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        encoding: ImageEncoding,
    ) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            encoding,
        }
    }

    /// File name of image number `index`.
    pub fn file_name(&self, index: usize) -> String {
        let prefix = if self.prefix.is_empty() {
            "image_"
        } else {
            self.prefix.as_str()
        };
        format!("{prefix}{index}.{}", self.encoding.extension())
    }
}

/// Configuration for a full generation run.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GenerationConfig {
    /// Terrain seed of the first scene; also its scene index.
    pub terrain_seed_start: i32,
    /// Sampler seed of the first round.
    pub poisson_seed_start: u32,
    pub training: PassSettings,
    pub testing: PassSettings,
    pub sampler: SamplerSettings,
    pub region: SamplingRegion,
    pub channels: Vec<ImageChannel>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            terrain_seed_start: 0,
            poisson_seed_start: 0,
            training: PassSettings::training(),
            testing: PassSettings::testing(),
            sampler: SamplerSettings::default(),
            region: SamplingRegion::default(),
            channels: vec![ImageChannel::new("depth", "depth_", ImageEncoding::Exr)],
        }
    }
}

impl GenerationConfig {
    /// Creates a configuration sampling `region` with default passes and sampler.
    pub fn new(region: SamplingRegion) -> Self {
        Self {
            region,
            ..Default::default()
        }
    }

    pub fn with_seeds(mut self, terrain_seed_start: i32, poisson_seed_start: u32) -> Self {
        self.terrain_seed_start = terrain_seed_start;
        self.poisson_seed_start = poisson_seed_start;
        self
    }

    pub fn with_training(mut self, training: PassSettings) -> Self {
        self.training = training;
        self
    }

    pub fn with_testing(mut self, testing: PassSettings) -> Self {
        self.testing = testing;
        self
    }

    pub fn with_sampler(mut self, sampler: SamplerSettings) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_channels(mut self, channels: Vec<ImageChannel>) -> Self {
        self.channels = channels;
        self
    }

    /// Settings for `pass`.
    pub fn pass(&self, pass: Pass) -> &PassSettings {
        match pass {
            Pass::Training => &self.training,
            Pass::Testing => &self.testing,
        }
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.region.validate()?;
        if !self.sampler.min_radius.is_finite() || self.sampler.min_radius <= 0.0 {
            return Err(Error::InvalidArgument("sampler.min_radius must be > 0".into()));
        }
        if self.sampler.attempts == 0 {
            return Err(Error::InvalidArgument("sampler.attempts must be >= 1".into()));
        }
        for pass in [Pass::Training, Pass::Testing] {
            let settings = self.pass(pass);
            if settings.data_folder_name.trim().is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "{pass} data_folder_name must not be empty"
                )));
            }
        }
        if self.training.data_folder_name == self.testing.data_folder_name {
            return Err(Error::InvalidArgument(
                "training and testing must use different data folders".into(),
            ));
        }
        Ok(())
    }

    /// Parses a configuration from TOML; missing fields take their defaults.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = basic_toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}
