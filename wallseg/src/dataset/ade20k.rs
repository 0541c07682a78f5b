//! ADE20K wall-scene dataset.
//!
//! Collects image/annotation pairs from an extracted `ADEChallengeData2016` tree,
//! keeps the ones whose scene category is an indoor scene with walls, and loads them
//! as raw pixel data. Tensor creation is left to the batcher.

use std::path::{Path, PathBuf};

use burn::{data::dataset::Dataset, prelude::*};
use image::imageops::{self, FilterType};
use walkdir::WalkDir;

use super::{
    error::{DatasetError, DatasetResult},
    scene::{SceneIndex, WALL_SCENES},
};

/// Directory name of the extracted ADE20K scene parsing release.
pub const ADE20K_DIR: &str = "ADEChallengeData2016";

/// Annotation index of the "wall" class in ADE20K.
pub const ADE20K_WALL_CLASS: u8 = 1;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Which half of the release to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Training,
    Validation,
}

impl Split {
    /// Directory name used for this split under `images/` and `annotations/`.
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::Validation => "validation",
        }
    }
}

/// Dataset location and preprocessing options.
#[derive(Config, Debug)]
pub struct DatasetConfig {
    /// Directory containing `ADEChallengeData2016/`.
    #[config(default = "PathBuf::from(\"data\")")]
    pub data_root_dir: PathBuf,
    /// Side length images and masks are resized to.
    #[config(default = "160")]
    pub target_size: u32,
    /// Scene categories to keep.
    #[config(default = "WALL_SCENES.iter().map(|s| s.to_string()).collect()")]
    pub scenes: Vec<String>,
    /// Annotation index treated as "wall". When set, masks are binary (1 = wall);
    /// when `None`, the original class indices are kept.
    #[config(default = "Some(ADE20K_WALL_CLASS)")]
    pub wall_class: Option<u8>,
}

/// A single preprocessed sample as raw data.
#[derive(Debug, Clone)]
pub struct SegmentationItem {
    /// RGB image data, `[H, W, 3]` row-major, values in `[0, 1]`.
    pub image: Vec<f32>,
    /// Class index per pixel, `[H, W]` row-major.
    pub mask: Vec<i64>,
    /// Image height in pixels.
    pub height: usize,
    /// Image width in pixels.
    pub width: usize,
}

/// Image/annotation pairs from indoor scenes containing walls.
#[derive(Debug, Clone)]
pub struct WallSceneDataset {
    items: Vec<(PathBuf, PathBuf)>,
    target_size: u32,
    wall_class: Option<u8>,
}

impl WallSceneDataset {
    /// Collects the pairs of `split` that belong to one of the configured scenes.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene listing or a split directory is missing, if an
    /// image has no scene entry or no annotation, or if nothing is left after filtering.
    pub fn new(config: &DatasetConfig, split: Split) -> DatasetResult<Self> {
        let root = config.data_root_dir.join(ADE20K_DIR);
        let index = SceneIndex::from_file(root.join("sceneCategories.txt"))?;

        let image_root = root.join("images").join(split.dir_name());
        let annotation_root = root.join("annotations").join(split.dir_name());
        for dir in [&image_root, &annotation_root] {
            if !dir.is_dir() {
                return Err(DatasetError::DirectoryNotFound { path: dir.clone() });
            }
        }

        let items = Self::collect_items(&index, &config.scenes, &image_root, &annotation_root)?;
        if items.is_empty() {
            return Err(DatasetError::NoValidPairs { path: image_root });
        }

        tracing::info!(
            split = split.dir_name(),
            pairs = items.len(),
            scenes = index.len(),
            "collected wall-scene pairs"
        );

        Ok(Self {
            items,
            target_size: config.target_size,
            wall_class: config.wall_class,
        })
    }

    fn collect_items(
        index: &SceneIndex,
        scenes: &[String],
        image_root: &Path,
        annotation_root: &Path,
    ) -> DatasetResult<Vec<(PathBuf, PathBuf)>> {
        let mut items = Vec::new();

        for entry in WalkDir::new(image_root).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|source| DatasetError::DirectoryReadFailed {
                path: image_root.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_supported_image(path) {
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| DatasetError::InvalidUtf8Path {
                    path: path.to_path_buf(),
                })?;

            let scene = index.scene(stem)?;
            if !scenes.iter().any(|s| s == scene) {
                tracing::trace!(image = stem, scene, "skipping image outside wall scenes");
                continue;
            }

            let annotation = annotation_root.join(format!("{stem}.png"));
            if !annotation.is_file() {
                return Err(DatasetError::MissingAnnotation {
                    image: path.to_path_buf(),
                });
            }

            items.push((path.to_path_buf(), annotation));
        }

        Ok(items)
    }

    /// Loads and preprocesses the pair at `index`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` for a bad index and `ImageOpenFailed` if either file
    /// cannot be decoded.
    pub fn load(&self, index: usize) -> DatasetResult<SegmentationItem> {
        let (image_path, mask_path) = self.items.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })?;

        let size = self.target_size;
        let image = open_image(image_path)?
            .resize_exact(size, size, FilterType::Lanczos3)
            .to_rgb32f();
        // Nearest keeps labels intact; any other filter would blend class indices.
        let mask = imageops::resize(
            &open_image(mask_path)?.to_luma8(),
            size,
            size,
            FilterType::Nearest,
        );

        let mask = mask
            .into_raw()
            .into_iter()
            .map(|label| match self.wall_class {
                Some(wall) => i64::from(label == wall),
                None => i64::from(label),
            })
            .collect();

        Ok(SegmentationItem {
            image: image.into_raw(),
            mask,
            height: size as usize,
            width: size as usize,
        })
    }

    /// Paths of the collected `(image, annotation)` pairs.
    pub fn pairs(&self) -> &[(PathBuf, PathBuf)] {
        &self.items
    }
}

impl Dataset<SegmentationItem> for WallSceneDataset {
    fn get(&self, index: usize) -> Option<SegmentationItem> {
        self.load(index)
            .map_err(|e| tracing::warn!(index, error = %e, "failed to load sample"))
            .ok()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

fn open_image(path: &Path) -> DatasetResult<image::DynamicImage> {
    image::open(path).map_err(|source| DatasetError::ImageOpenFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}
