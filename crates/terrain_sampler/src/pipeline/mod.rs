//! Dataset generation: configuration, on-disk layout, manifests, events and the stage runner.
use std::fmt;

pub mod config;
pub mod events;
pub mod layout;
pub mod manifest;
#[cfg(feature = "toml")]
pub mod runner;

/// Steps a scene goes through during a run, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    GenerateTerrain,
    SamplePoints,
    CaptureImages,
    WriteManifest,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::GenerateTerrain,
        Stage::SamplePoints,
        Stage::CaptureImages,
        Stage::WriteManifest,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::GenerateTerrain => "generate-terrain",
            Stage::SamplePoints => "sample-points",
            Stage::CaptureImages => "capture-images",
            Stage::WriteManifest => "write-manifest",
        };
        f.write_str(name)
    }
}
