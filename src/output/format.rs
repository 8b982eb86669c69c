use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::{ImageFormat, RgbaImage};

use crate::cli::CompressionLevel;
use crate::error::StitchError;

/// Encode an atlas canvas as PNG, optionally recompressed with oxipng.
///
/// `path` is only used for error reporting.
pub fn encode_atlas_png(
    image: &RgbaImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<Vec<u8>> {
    let mut png_data = Cursor::new(Vec::new());
    image
        .write_to(&mut png_data, ImageFormat::Png)
        .map_err(|e| StitchError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let output_data = if let Some(level) = compress {
        let opts = match level {
            CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
            CompressionLevel::Max => oxipng::Options::max_compression(),
        };
        oxipng::optimize_from_memory(&png_data.into_inner(), &opts).map_err(|e| {
            StitchError::PngCompress {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?
    } else {
        png_data.into_inner()
    };

    Ok(output_data)
}

/// Atlases carry transparency and must survive unchanged, so only PNG is accepted
pub fn ensure_png_path(path: &Path) -> Result<()> {
    let is_png = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

    if !is_png {
        return Err(StitchError::UnsupportedAtlasFormat(path.to_path_buf()).into());
    }
    Ok(())
}
