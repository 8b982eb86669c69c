use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use image::{DynamicImage, ImageFormat, RgbImage, Rgba, RgbaImage, imageops};
use log::{info, warn};

use crate::error::StitchError;
use crate::metadata::{AtlasMetadata, PlacementEntry};

/// Atlas dimensions that no longer match the size recorded at pack time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionDrift {
    pub expected: (u32, u32),
    pub actual: (u32, u32),
}

/// An item that could not be written back
#[derive(Debug, Clone)]
pub struct RestoreFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of splitting an atlas back into its source files
#[derive(Debug, Clone, Default)]
pub struct UnpackReport {
    /// Files successfully overwritten
    pub restored: usize,
    /// Items listed in the metadata
    pub total: usize,
    /// Set when the atlas was resized or cropped since packing
    pub drift: Option<DimensionDrift>,
    /// Metadata had no canvas size, so dimensions were not verified
    pub legacy: bool,
    pub failures: Vec<RestoreFailure>,
}

impl UnpackReport {
    pub fn is_complete(&self) -> bool {
        self.restored == self.total
    }
}

/// Compare the atlas size with the size recorded in `metadata`
pub fn check_dimensions(atlas: &RgbaImage, metadata: &AtlasMetadata) -> Option<DimensionDrift> {
    let expected = metadata.canvas_size()?;
    let actual = atlas.dimensions();
    (expected != actual).then_some(DimensionDrift { expected, actual })
}

/// Crop every item out of `atlas` and overwrite its original file.
///
/// Dimension drift is reported but does not stop the run, and a failure on
/// one item is recorded and the remaining items are still processed.
pub fn decompose(atlas: &RgbaImage, metadata: &AtlasMetadata) -> UnpackReport {
    let mut report = UnpackReport {
        total: metadata.items.len(),
        legacy: metadata.is_legacy(),
        ..Default::default()
    };

    if report.legacy {
        warn!("Legacy metadata has no canvas size; dimension check skipped");
    } else if let Some(drift) = check_dimensions(atlas, metadata) {
        let (ew, eh) = drift.expected;
        let (aw, ah) = drift.actual;
        warn!("Atlas size mismatch: expected {}x{}, got {}x{}", ew, eh, aw, ah);
        warn!("The atlas was likely cropped or resized after packing; every box may be shifted");
        warn!("Continuing anyway, restored files may be incorrect");
        report.drift = Some(drift);
    }

    for entry in &metadata.items {
        match restore_entry(atlas, entry) {
            Ok(()) => report.restored += 1,
            Err(e) => {
                warn!("Failed to restore {}: {:#}", entry.original_path.display(), e);
                report.failures.push(RestoreFailure {
                    path: entry.original_path.clone(),
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    info!("Restored {} of {} files", report.restored, report.total);

    report
}

/// Crop one item from `atlas` and write it to its original path
pub fn restore_entry(atlas: &RgbaImage, entry: &PlacementEntry) -> Result<()> {
    let (width, height) = atlas.dimensions();
    let bounds = entry.bounds;
    if !bounds.fits_within(width, height) {
        return Err(StitchError::BoxOutOfBounds {
            bounds: bounds.into(),
            width,
            height,
        }
        .into());
    }

    let path = &entry.original_path;
    let format = ImageFormat::from_path(path).map_err(|e| StitchError::ImageSave {
        path: path.clone(),
        source: e,
    })?;

    let crop = imageops::crop_imm(atlas, bounds.x, bounds.y, bounds.width, bounds.height).to_image();
    let output = if has_alpha(format) {
        DynamicImage::ImageRgba8(crop)
    } else {
        DynamicImage::ImageRgb8(flatten_onto_white(&crop))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StitchError::OutputWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    output
        .save_with_format(path, format)
        .map_err(|e| StitchError::ImageSave {
            path: path.clone(),
            source: e,
        })?;

    Ok(())
}

fn has_alpha(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg)
}

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Composite `image` over opaque white using its own alpha as the mask
pub fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    let mut background = RgbaImage::from_pixel(image.width(), image.height(), WHITE);
    imageops::overlay(&mut background, image, 0, 0);
    DynamicImage::ImageRgba8(background).to_rgb8()
}
