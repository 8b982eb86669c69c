use std::path::Path;

use anyhow::Result;
use image::Rgba;
use log::info;

use crate::atlas::{AtlasComposer, DEFAULT_GUIDE_COLOR, UnpackReport, decompose};
use crate::cli::CompressionLevel;
use crate::error::StitchError;
use crate::layout::{DEFAULT_PADDING, GridLayout};
use crate::metadata::{AtlasMetadata, read_metadata};
use crate::output::{ensure_png_path, write_atlas};
use crate::source::{DEFAULT_EXTENSIONS, SkippedFile, decode_rgba, load_image_set};

/// Settings for a pack run
#[derive(Debug, Clone)]
pub struct PackOptions {
    pub padding: u32,
    pub guides: bool,
    pub sentinels: bool,
    pub guide_color: Rgba<u8>,
    /// Extensions picked up from the source directory, compared case-insensitively
    pub extensions: Vec<String>,
    pub compress: Option<CompressionLevel>,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            guides: true,
            sentinels: true,
            guide_color: DEFAULT_GUIDE_COLOR,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            compress: None,
        }
    }
}

/// Summary of a successful pack
#[derive(Debug, Clone)]
pub struct PackReport {
    /// Number of images placed on the atlas
    pub packed: usize,
    /// Files that matched the filter but failed to decode
    pub skipped: Vec<SkippedFile>,
    pub layout: GridLayout,
    /// The metadata that was written next to the atlas
    pub metadata: AtlasMetadata,
}

impl PackReport {
    pub fn canvas_size(&self) -> (u32, u32) {
        self.layout.canvas_size()
    }
}

/// Result of a pack run
#[derive(Debug, Clone)]
pub enum PackOutcome {
    /// An atlas and its metadata were written
    Packed(PackReport),
    /// Nothing decodable was found; no files were written
    NoImages { skipped: Vec<SkippedFile> },
}

/// Pack every image in `source_dir` into `atlas_path` and `metadata_path`.
///
/// An empty directory is not an error: nothing is written and
/// [`PackOutcome::NoImages`] is returned.
pub fn pack(
    source_dir: &Path,
    atlas_path: &Path,
    metadata_path: &Path,
    options: &PackOptions,
) -> Result<PackOutcome> {
    ensure_png_path(atlas_path)?;

    let set = load_image_set(source_dir, options.extensions.as_slice())?;
    info!(
        "Loaded {} images, skipped {}",
        set.records.len(),
        set.skipped.len()
    );

    if set.is_empty() {
        info!("No images found in {}", source_dir.display());
        return Ok(PackOutcome::NoImages {
            skipped: set.skipped,
        });
    }

    let atlas = AtlasComposer::new()
        .padding(options.padding)
        .guides(options.guides)
        .sentinels(options.sentinels)
        .guide_color(options.guide_color)
        .compose(&set.records)?;

    write_atlas(&atlas, atlas_path, metadata_path, options.compress)?;

    info!(
        "Saved {}x{} atlas to {}",
        atlas.width(),
        atlas.height(),
        atlas_path.display()
    );
    info!("Saved metadata to {}", metadata_path.display());

    Ok(PackOutcome::Packed(PackReport {
        packed: set.records.len(),
        skipped: set.skipped,
        layout: atlas.layout,
        metadata: atlas.metadata,
    }))
}

/// Split `atlas_path` back into the files listed in `metadata_path`.
///
/// Both inputs are checked before anything is written. A dimension mismatch
/// is reported in the returned [`UnpackReport`] rather than aborting.
pub fn unpack(atlas_path: &Path, metadata_path: &Path) -> Result<UnpackReport> {
    if !atlas_path.exists() {
        return Err(StitchError::NotFound(atlas_path.to_path_buf()).into());
    }
    if !metadata_path.exists() {
        return Err(StitchError::NotFound(metadata_path.to_path_buf()).into());
    }

    info!("Reading metadata from {}", metadata_path.display());
    let metadata = read_metadata(metadata_path)?;

    info!("Loading atlas {}", atlas_path.display());
    let atlas = decode_rgba(atlas_path)?;

    Ok(decompose(&atlas, &metadata))
}
