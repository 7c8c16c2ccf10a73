use std::fs;
use std::path::Path;

use glam::{Vec2, Vec3};
use image::{GrayImage, ImageFormat, Luma};
use terrain_sampler::error::{Error, Result};
use terrain_sampler::pipeline::config::{ImageChannel, ImageEncoding};
use terrain_sampler::pipeline::layout::DataLayout;
use terrain_sampler::pipeline::manifest::DepthCamera;
use terrain_sampler::pipeline::runner::SceneBackend;
use terrain_sampler::sampling::{Sample, SamplingRegion, SiteProbe, XorShift32};

const WAVES: usize = 4;

/// Seeded rolling terrain with round tree trunks scattered over it.
#[derive(Clone, Debug)]
pub struct HeightField {
    origin: Vec2,
    extent: Vec2,
    amplitude: f32,
    waves: [(Vec2, f32); WAVES],
    trees: Vec<(Vec2, f32)>,
}

impl HeightField {
    /// Builds the terrain for `seed` over the footprint of `region`.
    pub fn generate(seed: i32, region: &SamplingRegion, amplitude: f32, tree_count: usize) -> Self {
        let mut rng = XorShift32::from_user_seed(seed as u32);
        let waves = std::array::from_fn(|i| {
            let freq = 0.02 * (i as f32 + 1.0);
            let k = rng.next_direction() * freq;
            (k, rng.next_f32() * std::f32::consts::TAU)
        });
        let min = region.min();
        let origin = Vec2::new(min.x, min.z);
        let extent = region.extent();
        let trees = (0..tree_count)
            .map(|_| {
                let p = origin + Vec2::new(rng.next_f32(), rng.next_f32()) * extent;
                (p, rng.next_f32_range(0.5, 2.0))
            })
            .collect();
        Self {
            origin,
            extent,
            amplitude,
            waves,
            trees,
        }
    }

    /// Ground height at world `(x, z)`.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        let p = Vec2::new(x, z);
        let sum: f32 = self
            .waves
            .iter()
            .map(|(k, phase)| (k.dot(p) + phase).sin())
            .sum();
        self.amplitude * sum / WAVES as f32
    }

    /// Whether world `(x, z)` lies inside a tree trunk.
    pub fn blocked(&self, x: f32, z: f32) -> bool {
        let p = Vec2::new(x, z);
        self.trees.iter().any(|(c, r)| c.distance(p) < *r)
    }

    pub fn trees(&self) -> &[(Vec2, f32)] {
        &self.trees
    }

    fn save_heightmap(&self, path: &Path) -> Result<()> {
        let (w, h) = (self.extent.x.max(1.0) as u32, self.extent.y.max(1.0) as u32);
        let img = GrayImage::from_fn(w, h, |px, pz| {
            let v = self.height(self.origin.x + px as f32, self.origin.y + pz as f32);
            let t = (v / self.amplitude.max(f32::EPSILON) * 0.5 + 0.5).clamp(0.0, 1.0);
            Luma([(t * 255.0) as u8])
        });
        img.save_with_format(path, ImageFormat::Png)
            .map_err(|e| Error::Backend(e.to_string()))
    }
}

/// Headless backend that renders top-down depth patches of a [`HeightField`] as PNG.
pub struct RasterBackend {
    region: SamplingRegion,
    camera: DepthCamera,
    amplitude: f32,
    tree_count: usize,
    /// Ground below this height is water and rejected.
    water_level: f32,
    terrain: Option<HeightField>,
}

impl RasterBackend {
    pub fn new(region: SamplingRegion, camera: DepthCamera) -> Self {
        Self {
            region,
            camera,
            amplitude: 3.0,
            tree_count: 40,
            water_level: -2.0,
            terrain: None,
        }
    }

    pub fn with_tree_count(mut self, tree_count: usize) -> Self {
        self.tree_count = tree_count;
        self
    }

    pub fn terrain(&self) -> Option<&HeightField> {
        self.terrain.as_ref()
    }

    fn field(&self) -> Result<&HeightField> {
        self.terrain
            .as_ref()
            .ok_or_else(|| Error::Backend("no terrain generated yet".into()))
    }
}

impl SiteProbe for RasterBackend {
    fn accepts(&mut self, candidate: Vec3) -> Result<bool> {
        let field = self.field()?;
        let ground = field.height(candidate.x, candidate.z);
        Ok(ground >= self.water_level && !field.blocked(candidate.x, candidate.z))
    }

    fn ground_distance(&mut self, origin: Vec3, max_distance: f32) -> Result<f32> {
        let drop = origin.y - self.field()?.height(origin.x, origin.z);
        Ok(if (0.0..=max_distance).contains(&drop) {
            drop
        } else {
            0.0
        })
    }
}

impl SceneBackend for RasterBackend {
    fn generate_terrain(
        &mut self,
        terrain_seed: i32,
        scene_index: i32,
        layout: &DataLayout,
    ) -> Result<()> {
        let field =
            HeightField::generate(terrain_seed, &self.region, self.amplitude, self.tree_count);
        field.save_heightmap(&layout.terrain_path(scene_index).with_extension("png"))?;

        let trees: String = field
            .trees()
            .iter()
            .map(|(p, r)| format!("{} {} {}\n", p.x, p.y, r))
            .collect();
        fs::write(layout.tree_path(scene_index).with_extension("txt"), trees)?;

        self.terrain = Some(field);
        Ok(())
    }

    fn camera(&self) -> DepthCamera {
        self.camera
    }

    fn capture_image(
        &mut self,
        channel: &ImageChannel,
        sample: &Sample,
        path: &Path,
    ) -> Result<()> {
        if channel.encoding != ImageEncoding::Png {
            return Err(Error::Backend(format!(
                "channel {} uses {:?}, only png is supported",
                channel.name, channel.encoding
            )));
        }
        let field = self.field()?;
        let (w, h) = (self.camera.width_px.max(1), self.camera.height_px.max(1));
        let forward = Vec2::new(sample.direction.x, sample.direction.z);
        let right = Vec2::new(forward.y, -forward.x);
        let far = self.camera.far_clip_plane.max(f32::EPSILON);
        let footprint = 0.25 * far;

        let img = GrayImage::from_fn(w, h, |px, py| {
            let u = (px as f32 / w as f32 - 0.5) * footprint;
            let v = (1.0 - py as f32 / h as f32) * footprint;
            let ground = Vec2::new(sample.position.x, sample.position.z) + right * u + forward * v;
            let depth = if field.blocked(ground.x, ground.y) {
                0.0
            } else {
                let eye = Vec3::new(sample.position.x, sample.position.y, sample.position.z);
                let hit = Vec3::new(ground.x, field.height(ground.x, ground.y), ground.y);
                eye.distance(hit)
            };
            Luma([((depth / far).clamp(0.0, 1.0) * 255.0) as u8])
        });
        img.save_with_format(path, ImageFormat::Png)
            .map_err(|e| Error::Backend(e.to_string()))
    }
}
