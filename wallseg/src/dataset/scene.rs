//! # Scene Categories
//!
//! ADE20K ships `sceneCategories.txt`, one `<image_name> <scene_name>` pair per line.
//! The index built from it decides which images belong to indoor scenes with walls.

use std::{collections::HashMap, fs, path::Path};

use super::error::{DatasetError, DatasetResult};

/// Indoor ADE20K scene categories whose images reliably contain walls.
pub const WALL_SCENES: &[&str] = &[
    "attic",
    "basement",
    "bathroom",
    "bedroom",
    "childs_room",
    "closet",
    "conference_room",
    "corridor",
    "dining_room",
    "dorm_room",
    "game_room",
    "home_office",
    "hotel_room",
    "kitchen",
    "living_room",
    "nursery",
    "office",
    "playroom",
    "staircase",
    "waiting_room",
];

/// Mapping from image name (file stem) to scene category.
#[derive(Debug, Clone, Default)]
pub struct SceneIndex {
    scenes: HashMap<String, String>,
}

impl SceneIndex {
    /// Reads and parses a scene category listing.
    ///
    /// # Errors
    ///
    /// Returns `SceneCategoriesNotFound` if `path` is not a file, `FileReadFailed` if it
    /// cannot be read, and `MalformedSceneLine` for any line that is not two fields.
    pub fn from_file(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(DatasetError::SceneCategoriesNotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = fs::read_to_string(path).map_err(|source| DatasetError::FileReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&contents)
    }

    /// Parses the contents of a scene category listing. Blank lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSceneLine` for any line that is not exactly two fields.
    pub fn parse(contents: &str) -> DatasetResult<Self> {
        let mut scenes = HashMap::new();

        for (line_number, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(image), Some(scene), None) => {
                    scenes.insert(image.to_string(), scene.to_string());
                }
                _ => {
                    return Err(DatasetError::MalformedSceneLine {
                        line_number: line_number + 1,
                        line: line.to_string(),
                    });
                }
            }
        }

        Ok(Self { scenes })
    }

    /// Scene category of `image`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownImage` if the listing has no entry for `image`.
    pub fn scene(&self, image: &str) -> DatasetResult<&str> {
        self.scenes
            .get(image)
            .map(String::as_str)
            .ok_or_else(|| DatasetError::UnknownImage {
                name: image.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_image_scene_pairs() {
        let index = SceneIndex::parse(
            "ADE_train_00000001 airport_terminal\nADE_train_00000051 bathroom\n\n",
        )
        .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.scene("ADE_train_00000051").unwrap(), "bathroom");
        assert_eq!(index.scene("ADE_train_00000001").unwrap(), "airport_terminal");
    }

    #[test]
    fn tolerates_windows_line_endings() {
        let index = SceneIndex::parse("ADE_val_00000001 kitchen\r\n").unwrap();
        assert_eq!(index.scene("ADE_val_00000001").unwrap(), "kitchen");
    }

    #[test]
    fn unknown_image_is_reported() {
        let index = SceneIndex::parse("ADE_train_00000001 bedroom\n").unwrap();

        match index.scene("ADE_train_00000002") {
            Err(DatasetError::UnknownImage { name }) => assert_eq!(name, "ADE_train_00000002"),
            other => panic!("Expected UnknownImage error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_line_is_reported() {
        match SceneIndex::parse("ADE_train_00000001 bedroom\nADE_train_00000002\n") {
            Err(DatasetError::MalformedSceneLine { line_number, line }) => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "ADE_train_00000002");
            }
            other => panic!("Expected MalformedSceneLine error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sceneCategories.txt");

        assert!(matches!(
            SceneIndex::from_file(&path),
            Err(DatasetError::SceneCategoriesNotFound { .. })
        ));
    }

    #[test]
    fn wall_scenes_are_indoor_categories() {
        assert!(WALL_SCENES.contains(&"bedroom"));
        assert!(WALL_SCENES.contains(&"kitchen"));
        assert!(!WALL_SCENES.contains(&"highway"));
    }
}
