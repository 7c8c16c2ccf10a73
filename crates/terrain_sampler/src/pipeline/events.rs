//! Event types and sinks for observing generation runs.
//!
//! This module defines [`GenerationEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while a [`crate::pipeline::runner::GenerationRunner`]
//! works through its passes and stages.
use std::path::PathBuf;

use glam::Vec3;

use crate::pipeline::config::Pass;
use crate::pipeline::Stage;

/// Describes events emitted during a generation run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum GenerationEvent {
    /// Emitted when a run starts.
    RunStarted {
        /// Total scenes across both passes.
        scene_count: u32,
    },

    /// Emitted when the run finishes successfully.
    RunFinished {
        /// Scenes written.
        scenes: usize,
        /// Samples accepted across all scenes.
        samples: usize,
    },

    /// Emitted when a pass starts, after its data folder was cleared.
    PassStarted {
        pass: Pass,
        /// Data folder receiving this pass.
        data_dir: PathBuf,
    },

    /// Emitted when a pass finishes.
    PassFinished { pass: Pass, scenes: usize },

    /// Emitted before a stage runs.
    StageStarted { stage: Stage, scene_index: i32 },

    /// Emitted when a stage fails; the run stops after this event.
    StageFailed {
        stage: Stage,
        scene_index: i32,
        /// Rendered error message.
        message: String,
    },

    /// Emitted after the backend generated a terrain.
    TerrainGenerated { scene_index: i32, terrain_seed: i32 },

    /// Emitted after one sampler round.
    PointsSampled {
        scene_index: i32,
        poisson_seed: u32,
        /// Samples accepted in this round.
        count: usize,
    },

    /// Emitted after all channels were captured at one sample.
    ImageCaptured {
        scene_index: i32,
        /// Image number within the scene.
        image_index: usize,
        /// Rover position in engine coordinates.
        position: Vec3,
        /// Rover yaw in degrees.
        yaw_deg: f32,
        file_names: Vec<String>,
    },

    /// Emitted after a scene manifest was written.
    ManifestWritten {
        scene_index: i32,
        path: PathBuf,
        entries: usize,
    },

    /// Non-fatal warning generated during the run.
    Warning {
        /// Context string (e.g. pass, scene index).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of a [`GenerationEvent`], used for filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenerationEventKind {
    RunStarted,
    RunFinished,
    PassStarted,
    PassFinished,
    StageStarted,
    StageFailed,
    TerrainGenerated,
    PointsSampled,
    ImageCaptured,
    ManifestWritten,
    Warning,
}

impl GenerationEvent {
    pub fn kind(&self) -> GenerationEventKind {
        match self {
            GenerationEvent::RunStarted { .. } => GenerationEventKind::RunStarted,
            GenerationEvent::RunFinished { .. } => GenerationEventKind::RunFinished,
            GenerationEvent::PassStarted { .. } => GenerationEventKind::PassStarted,
            GenerationEvent::PassFinished { .. } => GenerationEventKind::PassFinished,
            GenerationEvent::StageStarted { .. } => GenerationEventKind::StageStarted,
            GenerationEvent::StageFailed { .. } => GenerationEventKind::StageFailed,
            GenerationEvent::TerrainGenerated { .. } => GenerationEventKind::TerrainGenerated,
            GenerationEvent::PointsSampled { .. } => GenerationEventKind::PointsSampled,
            GenerationEvent::ImageCaptured { .. } => GenerationEventKind::ImageCaptured,
            GenerationEvent::ManifestWritten { .. } => GenerationEventKind::ManifestWritten,
            GenerationEvent::Warning { .. } => GenerationEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`GenerationEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: GenerationEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, kind: GenerationEventKind) -> bool {
        let _ = kind;
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = GenerationEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: GenerationEvent) {}

    #[inline]
    fn wants(&self, _kind: GenerationEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(GenerationEvent),
{
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally restricted to some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<GenerationEvent>,
    only: Option<Vec<GenerationEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects only events of the given kinds.
    pub fn only(kinds: impl IntoIterator<Item = GenerationEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<GenerationEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[GenerationEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: GenerationEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: GenerationEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: GenerationEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: GenerationEvent) {
        let kind = event.kind();
        let mut targets: Vec<&mut S> = self.sinks.iter_mut().filter(|s| s.wants(kind)).collect();
        let Some(last) = targets.pop() else {
            return;
        };
        for sink in targets {
            sink.send(event.clone());
        }
        last.send(event);
    }

    fn wants(&self, kind: GenerationEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
