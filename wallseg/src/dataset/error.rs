//! Error types for the dataset collaborator.
//!
//! Kept apart from the model errors: the network itself never touches the filesystem.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for dataset operations.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Error when an expected dataset directory does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound {
        /// The expected directory path.
        path: PathBuf,
    },

    /// Error when the scene category listing does not exist.
    #[error("Scene categories file not found: {path}")]
    SceneCategoriesNotFound {
        /// The expected location of `sceneCategories.txt`.
        path: PathBuf,
    },

    /// Error when reading a file fails.
    #[error("Failed to read file: {path}")]
    FileReadFailed {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Error when walking a directory fails.
    #[error("Failed to read directory: {path}")]
    DirectoryReadFailed {
        /// The directory path that failed to read.
        path: PathBuf,
        /// The underlying traversal error.
        #[source]
        source: walkdir::Error,
    },

    /// Error when a scene category line is not `<image> <scene>`.
    #[error("Malformed scene category line {line_number}: {line:?}")]
    MalformedSceneLine {
        /// One-based line number.
        line_number: usize,
        /// The offending line.
        line: String,
    },

    /// Error when an image name has no scene category.
    #[error("No scene category recorded for image: {name}")]
    UnknownImage {
        /// The image name (file stem).
        name: String,
    },

    /// Error when an image has no matching annotation mask.
    #[error("No annotation found for image: {image}")]
    MissingAnnotation {
        /// The image without an annotation.
        image: PathBuf,
    },

    /// Error when no image/mask pairs survive collection and filtering.
    #[error("No valid image/mask pairs found in: {path}")]
    NoValidPairs {
        /// The directory where no pairs were found.
        path: PathBuf,
    },

    /// Error when opening or decoding an image file fails.
    #[error("Failed to open image: {path}")]
    ImageOpenFailed {
        /// The image file path that failed to open.
        path: PathBuf,
        /// The underlying image processing error.
        #[source]
        source: image::ImageError,
    },

    /// Error when path components contain invalid UTF-8.
    #[error("Path contains invalid UTF-8: {path}")]
    InvalidUtf8Path {
        /// The path with invalid UTF-8.
        path: PathBuf,
    },

    /// Error when an item index is past the end of the dataset.
    #[error("Index {index} out of range for dataset of length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The dataset length.
        len: usize,
    },
}

/// A specialized `Result` type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;
