//! Per-scene manifest listing captured images and the rover pose they were taken from.
//!
//! Poses are stored in a right-handed frame: the engine's left-handed world
//! position `(x, y, z)` becomes `pos_start = [z, -x]` and a yaw of `y` degrees
//! becomes `yaw_start = 360 - y`.
#[cfg(feature = "toml")]
use std::path::Path;

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "toml")]
use tracing::info;

#[cfg(feature = "toml")]
use crate::error::Result;

/// Depth camera intrinsics recorded in the manifest header.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthCamera {
    pub far_clip_plane: f32,
    /// Vertical field of view in degrees.
    pub vertical_fov_deg: f32,
    pub width_px: u32,
    pub height_px: u32,
}

impl DepthCamera {
    pub fn new(far_clip_plane: f32, vertical_fov_deg: f32, width_px: u32, height_px: u32) -> Self {
        Self {
            far_clip_plane,
            vertical_fov_deg,
            width_px,
            height_px,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width_px as f32 / self.height_px.max(1) as f32
    }

    /// Horizontal field of view in degrees.
    pub fn horizontal_fov_deg(&self) -> f32 {
        let half = (self.vertical_fov_deg.to_radians() / 2.0).tan() * self.aspect();
        2.0 * half.atan().to_degrees()
    }
}

/// One capture: the images taken at a sample and the pose they were taken from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ManifestEntry {
    pub image_file_name_list: Vec<String>,
    pub pos_start: [f32; 2],
    pub yaw_start: f32,
}

impl ManifestEntry {
    /// Builds an entry from an engine-frame position and yaw in degrees.
    pub fn from_engine_pose(
        image_file_name_list: Vec<String>,
        position: Vec3,
        yaw_deg: f32,
    ) -> Self {
        Self {
            image_file_name_list,
            pos_start: [position.z, -position.x],
            yaw_start: 360.0 - yaw_deg,
        }
    }
}

/// Manifest of a single scene.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SceneManifest {
    pub depth_camera_far_clip_plane: f32,
    #[cfg_attr(feature = "serde", serde(rename = "depthCameraHorizontalFOV"))]
    pub depth_camera_horizontal_fov: f32,
    pub data_array: Vec<ManifestEntry>,
}

impl SceneManifest {
    pub fn new(camera: &DepthCamera) -> Self {
        Self {
            depth_camera_far_clip_plane: camera.far_clip_plane,
            depth_camera_horizontal_fov: camera.horizontal_fov_deg(),
            data_array: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ManifestEntry) {
        self.data_array.push(entry);
    }

    pub fn len(&self) -> usize {
        self.data_array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_array.is_empty()
    }

    pub fn clear(&mut self) {
        self.data_array.clear();
    }

    #[cfg(feature = "toml")]
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(basic_toml::to_string(self)?)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(basic_toml::from_str(s)?)
    }

    /// Writes the manifest as TOML to `path`.
    #[cfg(feature = "toml")]
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        info!("Saved manifest with {} entries to {}.", self.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_fov_widens_with_aspect() {
        let square = DepthCamera::new(100.0, 60.0, 256, 256);
        assert!((square.horizontal_fov_deg() - 60.0).abs() < 1e-3);

        let wide = DepthCamera::new(100.0, 60.0, 640, 480);
        // 2 * atan(tan(30°) * 4/3)
        assert!((wide.horizontal_fov_deg() - 75.1785).abs() < 1e-2);
    }

    #[test]
    fn engine_pose_converts_to_right_handed_frame() {
        let entry = ManifestEntry::from_engine_pose(
            vec!["depth_0.exr".into()],
            Vec3::new(3.0, 1.0, 7.0),
            90.0,
        );
        assert_eq!(entry.pos_start, [7.0, -3.0]);
        assert_eq!(entry.yaw_start, 270.0);
    }

    #[test]
    fn manifest_takes_header_from_camera() {
        let camera = DepthCamera::new(50.0, 90.0, 100, 100);
        let mut manifest = SceneManifest::new(&camera);
        assert!(manifest.is_empty());
        manifest.push(ManifestEntry::from_engine_pose(vec![], Vec3::ZERO, 0.0));
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.depth_camera_far_clip_plane, 50.0);
        assert!((manifest.depth_camera_horizontal_fov - 90.0).abs() < 1e-3);
        manifest.clear();
        assert!(manifest.is_empty());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn toml_uses_camel_case_keys() {
        let mut manifest = SceneManifest::new(&DepthCamera::new(80.0, 60.0, 1, 1));
        manifest.push(ManifestEntry::from_engine_pose(
            vec!["depth_0.exr".into(), "rgb_0.png".into()],
            Vec3::new(1.0, 0.0, 2.0),
            45.0,
        ));
        let text = manifest.to_toml_string().unwrap();
        assert!(text.contains("depthCameraFarClipPlane = 80"));
        assert!(text.contains("depthCameraHorizontalFOV"));
        assert!(text.contains("[[dataArray]]"));
        assert!(text.contains("imageFileNameList = [\"depth_0.exr\", \"rgb_0.png\"]"));
        assert!(text.contains("yawStart = 315"));

        let parsed = SceneManifest::from_toml_str(&text).unwrap();
        assert_eq!(parsed, manifest);
    }
}
