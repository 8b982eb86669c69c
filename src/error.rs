use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StitchError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No valid images found in input")]
    NoImages,

    #[error("Path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error(
        "Image '{name}' ({width}x{height}) does not fit its {cell_width}x{cell_height} cell \
         with {padding}px padding"
    )]
    CellOverflow {
        name: String,
        width: u32,
        height: u32,
        cell_width: u32,
        cell_height: u32,
        padding: u32,
    },

    #[error("Inconsistent grid layout: {0}")]
    InvalidLayout(String),

    #[error("Atlas for {count} images would exceed the maximum canvas size")]
    CanvasTooLarge { count: usize },

    #[error("Atlas must be written as PNG, got '{0}'")]
    UnsupportedAtlasFormat(PathBuf),

    #[error("Box {bounds:?} lies outside the {width}x{height} atlas")]
    BoxOutOfBounds {
        bounds: [u32; 4],
        width: u32,
        height: u32,
    },

    #[error("Failed to parse metadata '{path}': {source}")]
    Schema {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },
}
