//! Sequential driver for dataset generation.
//!
//! A run walks the training pass and then the testing pass. For every scene it
//! calls the stages in order: [`Stage::GenerateTerrain`], then per sampler seed
//! [`Stage::SamplePoints`] and [`Stage::CaptureImages`], and finally
//! [`Stage::WriteManifest`]. Each stage is a plain call that either succeeds or
//! ends the run with its error.
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::Result;
use crate::pipeline::config::{GenerationConfig, ImageChannel, Pass};
use crate::pipeline::events::{EventSink, GenerationEvent, GenerationEventKind};
use crate::pipeline::layout::DataLayout;
use crate::pipeline::manifest::{DepthCamera, ManifestEntry, SceneManifest};
use crate::pipeline::Stage;
use crate::sampling::{PoissonDiscSampler, Sample, SiteProbe};

/// Engine-side collaborator: builds terrain, answers probes and renders images.
pub trait SceneBackend: SiteProbe {
    /// Builds the terrain for `terrain_seed` and exports its point clouds into the
    /// scene folder (see [`DataLayout::terrain_path`] and [`DataLayout::tree_path`]).
    fn generate_terrain(
        &mut self,
        terrain_seed: i32,
        scene_index: i32,
        layout: &DataLayout,
    ) -> Result<()>;

    /// Intrinsics of the depth camera, recorded in each manifest.
    fn camera(&self) -> DepthCamera;

    /// Places the rover at `sample` and writes the image of `channel` to `path`.
    fn capture_image(&mut self, channel: &ImageChannel, sample: &Sample, path: &Path) -> Result<()>;
}

/// Outcome of one scene.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub pass: Pass,
    pub scene_index: i32,
    pub terrain_seed: i32,
    /// Sampler seeds used on this scene, in order.
    pub poisson_seeds: Vec<u32>,
    /// Samples accepted across all rounds.
    pub samples: usize,
    /// Image files written across all channels.
    pub images: usize,
    pub manifest_path: PathBuf,
}

/// Result of a full run.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub scenes: Vec<SceneSummary>,
}

impl RunSummary {
    /// Samples accepted across all scenes.
    pub fn total_samples(&self) -> usize {
        self.scenes.iter().map(|s| s.samples).sum()
    }

    /// Scenes produced by `pass`.
    pub fn scenes_in(&self, pass: Pass) -> impl Iterator<Item = &SceneSummary> {
        self.scenes.iter().filter(move |s| s.pass == pass)
    }
}

/// Drives generation runs for one configuration.
pub struct GenerationRunner {
    /// Run configuration applied to this runner.
    pub config: GenerationConfig,
    layout: DataLayout,
    sampler: PoissonDiscSampler,
    terrain_seed: i32,
    poisson_seed: u32,
}

impl GenerationRunner {
    /// Validates `config` and prepares a runner writing below `layout.base_dir`.
    pub fn try_new(config: GenerationConfig, layout: DataLayout) -> Result<Self> {
        config.validate()?;
        let sampler = config
            .sampler
            .build(config.region, config.poisson_seed_start)?;
        Ok(Self {
            terrain_seed: config.terrain_seed_start,
            poisson_seed: config.poisson_seed_start,
            config,
            layout,
            sampler,
        })
    }

    /// Layout the runner was created with; its data folder is never changed by a run.
    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Layout used for `pass`: the base layout pointed at the pass data folder.
    pub fn pass_layout(&self, pass: Pass) -> DataLayout {
        self.layout
            .clone()
            .with_data_folder_name(&self.config.pass(pass).data_folder_name)
    }

    /// Runs both passes.
    pub fn run<B: SceneBackend>(&mut self, backend: &mut B) -> Result<RunSummary> {
        self.run_with_events(backend, &mut ())
    }

    /// Runs both passes, reporting progress to `sink`.
    ///
    /// Seeds restart from the configured values on every call and continue from
    /// the training pass into the testing pass.
    pub fn run_with_events<B: SceneBackend>(
        &mut self,
        backend: &mut B,
        sink: &mut dyn EventSink,
    ) -> Result<RunSummary> {
        self.terrain_seed = self.config.terrain_seed_start;
        self.poisson_seed = self.config.poisson_seed_start;

        let scene_count = self.config.training.terrain_rounds + self.config.testing.terrain_rounds;
        if sink.wants(GenerationEventKind::RunStarted) {
            sink.send(GenerationEvent::RunStarted { scene_count });
        }

        let mut summary = RunSummary::default();
        for pass in [Pass::Training, Pass::Testing] {
            self.run_pass(pass, backend, sink, &mut summary)?;
        }

        info!(
            "Generated {} scenes with {} samples.",
            summary.scenes.len(),
            summary.total_samples()
        );
        if sink.wants(GenerationEventKind::RunFinished) {
            sink.send(GenerationEvent::RunFinished {
                scenes: summary.scenes.len(),
                samples: summary.total_samples(),
            });
        }
        Ok(summary)
    }

    fn run_pass<B: SceneBackend>(
        &mut self,
        pass: Pass,
        backend: &mut B,
        sink: &mut dyn EventSink,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let settings = self.config.pass(pass).clone();
        let layout = self.pass_layout(pass);
        layout.clear_data_dir()?;

        info!(
            "Starting {pass} pass: {} terrains x {} sampler rounds into {}.",
            settings.terrain_rounds,
            settings.poisson_rounds,
            layout.data_dir().display()
        );
        if sink.wants(GenerationEventKind::PassStarted) {
            sink.send(GenerationEvent::PassStarted {
                pass,
                data_dir: layout.data_dir(),
            });
        }

        for _ in 0..settings.terrain_rounds {
            let scene = self.run_scene(pass, &layout, settings.poisson_rounds, backend, sink)?;
            summary.scenes.push(scene);
            self.terrain_seed = self.terrain_seed.wrapping_add(1);
        }

        if sink.wants(GenerationEventKind::PassFinished) {
            sink.send(GenerationEvent::PassFinished {
                pass,
                scenes: settings.terrain_rounds as usize,
            });
        }
        Ok(())
    }

    fn run_scene<B: SceneBackend>(
        &mut self,
        pass: Pass,
        layout: &DataLayout,
        poisson_rounds: u32,
        backend: &mut B,
        sink: &mut dyn EventSink,
    ) -> Result<SceneSummary> {
        let terrain_seed = self.terrain_seed;
        let scene_index = terrain_seed;
        layout.ensure_scene_dirs(scene_index)?;

        run_stage(Stage::GenerateTerrain, scene_index, sink, || {
            backend.generate_terrain(terrain_seed, scene_index, layout)
        })?;
        if sink.wants(GenerationEventKind::TerrainGenerated) {
            sink.send(GenerationEvent::TerrainGenerated {
                scene_index,
                terrain_seed,
            });
        }

        let mut manifest = SceneManifest::new(&backend.camera());
        let mut scene = SceneSummary {
            pass,
            scene_index,
            terrain_seed,
            poisson_seeds: Vec::with_capacity(poisson_rounds as usize),
            samples: 0,
            images: 0,
            manifest_path: layout.manifest_path(scene_index),
        };
        let mut image_index = 0;

        for _ in 0..poisson_rounds {
            let poisson_seed = self.poisson_seed;
            let sampler = &mut self.sampler;
            let samples = run_stage(Stage::SamplePoints, scene_index, sink, || {
                sampler.resample(poisson_seed, backend).map(<[Sample]>::to_vec)
            })?;
            if samples.is_empty() {
                warn!("Scene {scene_index} produced no samples with seed {poisson_seed}.");
                if sink.wants(GenerationEventKind::Warning) {
                    sink.send(GenerationEvent::Warning {
                        context: format!("{pass} scene:{scene_index} seed:{poisson_seed}"),
                        message: "Sampler accepted no samples".into(),
                    });
                }
            }
            if sink.wants(GenerationEventKind::PointsSampled) {
                sink.send(GenerationEvent::PointsSampled {
                    scene_index,
                    poisson_seed,
                    count: samples.len(),
                });
            }

            let channels = &self.config.channels;
            let written = run_stage(Stage::CaptureImages, scene_index, sink, || {
                capture_round(
                    backend,
                    channels,
                    layout,
                    scene_index,
                    image_index,
                    &samples,
                    &mut manifest,
                )
            })?;
            if sink.wants(GenerationEventKind::ImageCaptured) {
                for (offset, (sample, entry)) in samples
                    .iter()
                    .zip(&manifest.data_array[manifest.len() - samples.len()..])
                    .enumerate()
                {
                    sink.send(GenerationEvent::ImageCaptured {
                        scene_index,
                        image_index: image_index + offset,
                        position: sample.position,
                        yaw_deg: sample.yaw_degrees(),
                        file_names: entry.image_file_name_list.clone(),
                    });
                }
            }

            image_index += samples.len();
            scene.samples += samples.len();
            scene.images += written;
            scene.poisson_seeds.push(poisson_seed);
            self.poisson_seed = self.poisson_seed.wrapping_add(1);
        }

        let path = scene.manifest_path.clone();
        run_stage(Stage::WriteManifest, scene_index, sink, || manifest.save(&path))?;
        if sink.wants(GenerationEventKind::ManifestWritten) {
            sink.send(GenerationEvent::ManifestWritten {
                scene_index,
                path,
                entries: manifest.len(),
            });
        }

        Ok(scene)
    }
}

/// Captures every channel at every sample, appending one manifest entry per sample.
///
/// Returns the number of files written.
fn capture_round<B: SceneBackend>(
    backend: &mut B,
    channels: &[ImageChannel],
    layout: &DataLayout,
    scene_index: i32,
    first_image_index: usize,
    samples: &[Sample],
    manifest: &mut SceneManifest,
) -> Result<usize> {
    let mut written = 0;
    for (offset, sample) in samples.iter().enumerate() {
        let image_index = first_image_index + offset;
        let mut file_names = Vec::with_capacity(channels.len());
        for channel in channels {
            let file_name = channel.file_name(image_index);
            let path = layout.image_path(scene_index, &file_name);
            backend.capture_image(channel, sample, &path)?;
            file_names.push(file_name);
            written += 1;
        }
        manifest.push(ManifestEntry::from_engine_pose(
            file_names,
            sample.position,
            sample.yaw_degrees(),
        ));
    }
    Ok(written)
}

fn run_stage<T>(
    stage: Stage,
    scene_index: i32,
    sink: &mut dyn EventSink,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    if sink.wants(GenerationEventKind::StageStarted) {
        sink.send(GenerationEvent::StageStarted { stage, scene_index });
    }
    f().inspect_err(|e| {
        warn!("Stage {stage} failed for scene {scene_index}: {e}.");
        if sink.wants(GenerationEventKind::StageFailed) {
            sink.send(GenerationEvent::StageFailed {
                stage,
                scene_index,
                message: e.to_string(),
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use glam::Vec3;

    use super::*;
    use crate::error::Error;
    use crate::pipeline::config::{ImageEncoding, PassSettings, SamplerSettings};
    use crate::pipeline::events::VecSink;
    use crate::sampling::SamplingRegion;

    /// Flat terrain that writes small placeholder files.
    #[derive(Default)]
    struct MemoryBackend {
        terrains: Vec<(i32, i32)>,
        captures: HashMap<PathBuf, Vec3>,
        fail_capture: bool,
        blocked: bool,
    }

    impl SiteProbe for MemoryBackend {
        fn accepts(&mut self, _candidate: Vec3) -> Result<bool> {
            Ok(!self.blocked)
        }

        fn ground_distance(&mut self, _origin: Vec3, _max_distance: f32) -> Result<f32> {
            Ok(1.0)
        }
    }

    impl SceneBackend for MemoryBackend {
        fn generate_terrain(
            &mut self,
            terrain_seed: i32,
            scene_index: i32,
            layout: &DataLayout,
        ) -> Result<()> {
            self.terrains.push((terrain_seed, scene_index));
            fs::write(layout.terrain_path(scene_index).with_extension("ply"), "ply")?;
            Ok(())
        }

        fn camera(&self) -> DepthCamera {
            DepthCamera::new(100.0, 60.0, 64, 64)
        }

        fn capture_image(
            &mut self,
            _channel: &ImageChannel,
            sample: &Sample,
            path: &Path,
        ) -> Result<()> {
            if self.fail_capture {
                return Err(Error::Backend("camera not ready".into()));
            }
            fs::write(path, b"img")?;
            self.captures.insert(path.to_path_buf(), sample.position);
            Ok(())
        }
    }

    fn temp_base(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "terrain_sampler_runner_{name}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn small_config() -> GenerationConfig {
        GenerationConfig::new(SamplingRegion::new(
            Vec3::new(20.0, 5.0, 20.0),
            Vec3::new(40.0, 10.0, 40.0),
        ))
        .with_seeds(3, 100)
        .with_training(PassSettings::training().with_rounds(2, 2))
        .with_testing(PassSettings::testing().with_rounds(1, 1))
        .with_sampler(SamplerSettings::default().with_min_radius(8.0))
        .with_channels(vec![
            ImageChannel::new("depth", "depth_", ImageEncoding::Exr),
            ImageChannel::new("rgb", "", ImageEncoding::Png),
        ])
    }

    #[test]
    fn runs_all_stages_and_writes_manifests() {
        let base = temp_base("full");
        let mut runner = GenerationRunner::try_new(small_config(), DataLayout::new(&base)).unwrap();
        let mut backend = MemoryBackend::default();
        let mut sink = VecSink::new();

        let summary = runner.run_with_events(&mut backend, &mut sink).unwrap();

        assert_eq!(summary.scenes.len(), 3);
        assert_eq!(backend.terrains, vec![(3, 3), (4, 4), (5, 5)]);
        let training: Vec<_> = summary.scenes_in(Pass::Training).collect();
        assert_eq!(training[0].poisson_seeds, vec![100, 101]);
        assert_eq!(training[1].poisson_seeds, vec![102, 103]);
        let testing: Vec<_> = summary.scenes_in(Pass::Testing).collect();
        assert_eq!(testing[0].poisson_seeds, vec![104]);
        assert!(testing[0].manifest_path.starts_with(base.join("TestingData")));

        for scene in &summary.scenes {
            assert!(scene.samples > 0);
            assert_eq!(scene.images, scene.samples * 2);
            let text = fs::read_to_string(&scene.manifest_path).unwrap();
            let manifest = SceneManifest::from_toml_str(&text).unwrap();
            assert_eq!(manifest.len(), scene.samples);
            assert_eq!(manifest.depth_camera_far_clip_plane, 100.0);
        }
        assert_eq!(backend.captures.len(), summary.total_samples() * 2);

        assert_eq!(sink.count(GenerationEventKind::RunStarted), 1);
        assert_eq!(sink.count(GenerationEventKind::PassStarted), 2);
        assert_eq!(sink.count(GenerationEventKind::TerrainGenerated), 3);
        assert_eq!(sink.count(GenerationEventKind::PointsSampled), 5);
        assert_eq!(sink.count(GenerationEventKind::ManifestWritten), 3);
        assert_eq!(
            sink.count(GenerationEventKind::ImageCaptured),
            summary.total_samples()
        );
        assert_eq!(sink.count(GenerationEventKind::StageFailed), 0);

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn image_indices_continue_across_rounds_and_reset_per_scene() {
        let base = temp_base("indices");
        let config = small_config().with_testing(PassSettings::testing().with_rounds(0, 0));
        let mut runner = GenerationRunner::try_new(config, DataLayout::new(&base)).unwrap();
        let mut backend = MemoryBackend::default();
        let summary = runner.run(&mut backend).unwrap();

        assert_eq!(runner.layout().data_folder_name, "TrainingData");
        assert_eq!(runner.layout().data_dir(), base.join("TrainingData"));

        let first = &summary.scenes[0];
        let layout = runner.pass_layout(Pass::Training);
        for i in 0..first.samples {
            assert!(layout.image_path(first.scene_index, &format!("depth_{i}.exr")).is_file());
            assert!(layout.image_path(first.scene_index, &format!("image_{i}.png")).is_file());
        }
        let second = &summary.scenes[1];
        assert!(layout.image_path(second.scene_index, "depth_0.exr").is_file());

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn manifest_entries_use_converted_pose() {
        let base = temp_base("pose");
        let config = small_config()
            .with_training(PassSettings::training().with_rounds(1, 1))
            .with_testing(PassSettings::testing().with_rounds(0, 0));
        let mut runner = GenerationRunner::try_new(config.clone(), DataLayout::new(&base)).unwrap();
        let mut backend = MemoryBackend::default();
        let summary = runner.run(&mut backend).unwrap();

        let text = fs::read_to_string(&summary.scenes[0].manifest_path).unwrap();
        let manifest = SceneManifest::from_toml_str(&text).unwrap();

        let mut sampler = config.sampler.build(config.region, 100).unwrap();
        let samples = sampler.generate(&mut backend).unwrap();
        assert_eq!(manifest.len(), samples.len());
        for (entry, sample) in manifest.data_array.iter().zip(samples) {
            assert_eq!(entry.pos_start, [sample.position.z, -sample.position.x]);
            assert_eq!(entry.yaw_start, 360.0 - sample.yaw_degrees());
            // top face is y = 10, ground one unit below, rover half a unit above
            assert!((sample.position.y - 9.5).abs() < 1e-5);
        }

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn rerun_clears_previous_pass_output() {
        let base = temp_base("rerun");
        let layout = DataLayout::new(&base).with_data_folder_name("TrainingData");
        layout.ensure_scene_dirs(999).unwrap();
        let stale = layout.manifest_path(999);
        fs::write(&stale, "stale").unwrap();

        let mut runner = GenerationRunner::try_new(small_config(), layout).unwrap();
        runner.run(&mut MemoryBackend::default()).unwrap();
        assert!(!stale.exists());

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn failing_stage_stops_run_with_event() {
        let base = temp_base("fail");
        let mut runner = GenerationRunner::try_new(small_config(), DataLayout::new(&base)).unwrap();
        let mut backend = MemoryBackend {
            fail_capture: true,
            ..Default::default()
        };
        let mut sink = VecSink::new();
        let err = runner.run_with_events(&mut backend, &mut sink).unwrap_err();

        assert!(matches!(err, Error::Backend(_)));
        assert_eq!(backend.terrains.len(), 1);
        let failed: Vec<_> = sink
            .as_slice()
            .iter()
            .filter_map(|e| match e {
                GenerationEvent::StageFailed { stage, .. } => Some(*stage),
                _ => None,
            })
            .collect();
        assert_eq!(failed, vec![Stage::CaptureImages]);
        assert_eq!(sink.count(GenerationEventKind::RunFinished), 0);

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn blocked_scene_warns_and_writes_empty_manifest() {
        let base = temp_base("blocked");
        let config = small_config()
            .with_training(PassSettings::training().with_rounds(1, 1))
            .with_testing(PassSettings::testing().with_rounds(0, 0));
        let mut runner = GenerationRunner::try_new(config, DataLayout::new(&base)).unwrap();
        let mut backend = MemoryBackend {
            blocked: true,
            ..Default::default()
        };
        let mut sink = VecSink::only([GenerationEventKind::Warning]);
        let summary = runner.run_with_events(&mut backend, &mut sink).unwrap();

        assert_eq!(summary.total_samples(), 0);
        assert_eq!(sink.len(), 1);
        let text = fs::read_to_string(&summary.scenes[0].manifest_path).unwrap();
        assert!(SceneManifest::from_toml_str(&text).unwrap().is_empty());

        let _ = fs::remove_dir_all(&base);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = small_config().with_sampler(SamplerSettings::default().with_min_radius(-1.0));
        assert!(matches!(
            GenerationRunner::try_new(config, DataLayout::new("unused")),
            Err(Error::InvalidArgument(_))
        ));
    }
}
