//! On-disk layout of a generated dataset.
//!
//! ```text
//! <base_dir>/<data_folder_name>/
//!     Scene_<index>/
//!         data.toml
//!         terrain*, tree*        (written by the scene backend)
//!         Textures/
//!             depth_0.exr ...
//! ```
use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::Result;

/// Folder and file names of a dataset rooted at `base_dir`.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataLayout {
    pub base_dir: PathBuf,
    pub data_folder_name: String,
    pub scene_folder_prefix: String,
    pub image_folder_name: String,
    pub manifest_file_name: String,
    pub terrain_file_name: String,
    pub tree_file_name: String,
}

impl DataLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            data_folder_name: "TrainingData".into(),
            scene_folder_prefix: "Scene_".into(),
            image_folder_name: "Textures".into(),
            manifest_file_name: "data.toml".into(),
            terrain_file_name: "terrain".into(),
            tree_file_name: "tree".into(),
        }
    }

    pub fn with_data_folder_name(mut self, name: impl Into<String>) -> Self {
        self.data_folder_name = name.into();
        self
    }

    pub fn with_scene_folder_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.scene_folder_prefix = prefix.into();
        self
    }

    pub fn set_data_folder_name(&mut self, name: impl Into<String>) {
        self.data_folder_name = name.into();
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join(&self.data_folder_name)
    }

    pub fn scene_dir(&self, scene_index: i32) -> PathBuf {
        self.data_dir()
            .join(format!("{}{scene_index}", self.scene_folder_prefix))
    }

    pub fn texture_dir(&self, scene_index: i32) -> PathBuf {
        self.scene_dir(scene_index).join(&self.image_folder_name)
    }

    pub fn image_path(&self, scene_index: i32, file_name: &str) -> PathBuf {
        self.texture_dir(scene_index).join(file_name)
    }

    pub fn manifest_path(&self, scene_index: i32) -> PathBuf {
        self.scene_dir(scene_index).join(&self.manifest_file_name)
    }

    /// Base path (without extension) for the terrain point cloud of a scene.
    pub fn terrain_path(&self, scene_index: i32) -> PathBuf {
        self.scene_dir(scene_index).join(&self.terrain_file_name)
    }

    /// Base path (without extension) for the vegetation point cloud of a scene.
    pub fn tree_path(&self, scene_index: i32) -> PathBuf {
        self.scene_dir(scene_index).join(&self.tree_file_name)
    }

    /// Creates the scene and texture folders of a scene.
    pub fn ensure_scene_dirs(&self, scene_index: i32) -> Result<()> {
        fs::create_dir_all(self.texture_dir(scene_index))?;
        Ok(())
    }

    /// Removes the current data folder and everything in it, if present.
    pub fn clear_data_dir(&self) -> Result<()> {
        let dir = self.data_dir();
        if dir.exists() {
            info!("Removing previous dataset at {}.", dir.display());
            fs::remove_dir_all(&dir)?;
        }
        Ok(())
    }
}
