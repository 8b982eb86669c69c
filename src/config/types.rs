use serde::{Deserialize, Serialize};

use crate::atlas::DEFAULT_GUIDE_COLOR;
use crate::layout::DEFAULT_PADDING;
use crate::source::DEFAULT_EXTENSIONS;

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Stitcher configuration file structure.
///
/// Relative `atlas` and `metadata` paths are resolved against the directory
/// holding the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Padding around every image in pixels
    pub padding: u32,
    /// Draw outlines around every image
    pub guides: bool,
    /// Mark canvas corners against auto-cropping
    pub sentinels: bool,
    /// Outline colour as RGBA
    pub guide_color: [u8; 4],
    /// File extensions picked up from the source directory
    pub extensions: Vec<String>,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
    /// Default atlas output path
    pub atlas: String,
    /// Default metadata output path
    pub metadata: String,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            version: 1,
            padding: DEFAULT_PADDING,
            guides: true,
            sentinels: true,
            guide_color: DEFAULT_GUIDE_COLOR.0,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            compress: None,
            atlas: "stitched_atlas.png".to_string(),
            metadata: "stitched_meta.json".to_string(),
        }
    }
}
