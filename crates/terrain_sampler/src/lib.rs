#![forbid(unsafe_code)]
//! terrain_sampler: seeded Poisson-disc placement of sample sites over terrain, with
//! an acceptance probe and a staged dataset generation pipeline.
//!
//! Modules:
//! - sampling: xorshift RNG, sampling region, spatial grid, site probes, Poisson-disc sampler
//! - pipeline: run configuration, data layout, scene manifests, events, stage runner
//!
//! For examples, see the terrain_sampler_examples crate.
pub mod error;
pub mod pipeline;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use terrain_sampler::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::pipeline::config::{
        GenerationConfig, ImageChannel, ImageEncoding, Pass, PassSettings, SamplerSettings,
    };
    pub use crate::pipeline::events::{
        EventSink, FnSink, GenerationEvent, GenerationEventKind, MultiSink, VecSink,
    };
    pub use crate::pipeline::layout::DataLayout;
    pub use crate::pipeline::manifest::{DepthCamera, ManifestEntry, SceneManifest};
    #[cfg(feature = "toml")]
    pub use crate::pipeline::runner::{GenerationRunner, RunSummary, SceneBackend, SceneSummary};
    pub use crate::pipeline::Stage;
    pub use crate::sampling::{
        generate_samples, FnProbe, PoissonDiscSampler, PoissonDiscSampling, PositionSampling,
        RegionTest, Sample, SamplingRegion, SiteProbe, SpatialGrid, TerrainProbe, XorShift32,
        DEFAULT_ATTEMPTS, DEFAULT_ELEVATION,
    };
}
