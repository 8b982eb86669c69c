use image::RgbaImage;
use std::path::PathBuf;

/// A source image loaded for packing
#[derive(Debug, Clone)]
pub struct ImageRecord {
    /// Absolute path of the file, overwritten on unpack
    pub original_path: PathBuf,
    /// Base file name, kept for logging and metadata
    pub file_name: String,
    /// Pixel data, always RGBA8 after loading
    pub image: RgbaImage,
}

impl ImageRecord {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// A file that matched the extension filter but could not be loaded
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of loading a source directory
#[derive(Debug, Default)]
pub struct ImageSet {
    /// Loaded images, ordered by file name
    pub records: Vec<ImageRecord>,
    /// Files that failed to decode
    pub skipped: Vec<SkippedFile>,
}

impl ImageSet {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
