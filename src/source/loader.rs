use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageReader, RgbaImage};
use log::{debug, info, warn};

use super::{ImageRecord, ImageSet, SkippedFile};
use crate::error::StitchError;

/// Extensions picked up when no explicit list is configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "webp"];

/// Load every supported image directly inside `dir`.
///
/// Files are ordered by file name so repeated runs over the same directory
/// produce the same pack order. A file that cannot be decoded is logged and
/// recorded in [`ImageSet::skipped`] instead of failing the batch.
pub fn load_image_set(dir: &Path, extensions: &[impl AsRef<str>]) -> Result<ImageSet> {
    if !dir.exists() {
        return Err(StitchError::NotFound(dir.to_path_buf()).into());
    }
    if !dir.is_dir() {
        return Err(StitchError::NotADirectory(dir.to_path_buf()).into());
    }

    let dir = dir
        .canonicalize()
        .with_context(|| format!("failed to resolve directory: {}", dir.display()))?;
    let paths = collect_image_paths(&dir, extensions)?;

    info!("Found {} candidate images in {}", paths.len(), dir.display());

    let mut set = ImageSet::default();
    for path in paths {
        match load_record(&path) {
            Ok(record) => {
                debug!(
                    "Loaded {} ({}x{})",
                    record.file_name,
                    record.width(),
                    record.height()
                );
                set.records.push(record);
            }
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                set.skipped.push(SkippedFile {
                    path,
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    Ok(set)
}

fn collect_image_paths(dir: &Path, extensions: &[impl AsRef<str>]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && is_supported_image(&path, extensions) {
            paths.push(path);
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

fn is_supported_image(path: &Path, extensions: &[impl AsRef<str>]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            extensions
                .iter()
                .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Decode any supported image into RGBA8, sniffing the format from its contents
pub fn decode_rgba(path: &Path) -> Result<RgbaImage> {
    let image = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|e| StitchError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| StitchError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    Ok(image)
}

fn load_record(path: &Path) -> Result<ImageRecord> {
    let image = decode_rgba(path)?;
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(ImageRecord {
        original_path: path.to_path_buf(),
        file_name,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) {
        RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("a.png"), DEFAULT_EXTENSIONS));
        assert!(is_supported_image(Path::new("a.JPG"), DEFAULT_EXTENSIONS));
        assert!(is_supported_image(Path::new("dir/a.WebP"), DEFAULT_EXTENSIONS));
        assert!(!is_supported_image(Path::new("a.gif"), DEFAULT_EXTENSIONS));
        assert!(!is_supported_image(Path::new("notes.txt"), DEFAULT_EXTENSIONS));
        assert!(!is_supported_image(Path::new("png"), DEFAULT_EXTENSIONS));
        assert!(is_supported_image(Path::new("a.gif"), &["gif"][..]));
    }

    #[test]
    fn test_loads_sorted_by_file_name() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "c.png", 3, 3);
        write_png(tmp.path(), "a.png", 1, 1);
        write_png(tmp.path(), "b.png", 2, 2);
        std::fs::write(tmp.path().join("readme.txt"), "not an image").unwrap();

        let set = load_image_set(tmp.path(), DEFAULT_EXTENSIONS).unwrap();
        let names: Vec<_> = set.records.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.png", "c.png"]);
        assert_eq!(set.records[2].dimensions(), (3, 3));
        assert!(set.skipped.is_empty());
        assert!(set.records.iter().all(|r| r.original_path.is_absolute()));
    }

    #[test]
    fn test_undecodable_file_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_png(tmp.path(), "good.png", 4, 4);
        std::fs::write(tmp.path().join("broken.png"), b"definitely not a png").unwrap();

        let set = load_image_set(tmp.path(), DEFAULT_EXTENSIONS).unwrap();
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.skipped.len(), 1);
        assert!(set.skipped[0].path.ends_with("broken.png"));
    }

    #[test]
    fn test_subdirectories_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("nested.png")).unwrap();
        write_png(tmp.path(), "top.png", 2, 2);

        let set = load_image_set(tmp.path(), DEFAULT_EXTENSIONS).unwrap();
        assert_eq!(set.records.len(), 1);
    }

    #[test]
    fn test_empty_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let set = load_image_set(tmp.path(), DEFAULT_EXTENSIONS).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_image_set(&tmp.path().join("nope"), DEFAULT_EXTENSIONS).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StitchError>(),
            Some(StitchError::NotFound(_))
        ));
    }

    #[test]
    fn test_decode_rgba_ignores_misleading_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("atlas.dat");
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(3, 2, Rgba([4, 5, 6, 7]))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(&path, bytes).unwrap();

        let image = decode_rgba(&path).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(*image.get_pixel(2, 1), Rgba([4, 5, 6, 7]));
    }

    #[test]
    fn test_decode_rgba_reports_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.png");
        std::fs::write(&path, b"nope").unwrap();

        let err = decode_rgba(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StitchError>(),
            Some(StitchError::ImageLoad { path: p, .. }) if p == &path
        ));
    }

    #[test]
    fn test_rgb_source_is_normalized_to_rgba() {
        let tmp = tempfile::tempdir().unwrap();
        image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]))
            .save(tmp.path().join("rgb.png"))
            .unwrap();

        let set = load_image_set(tmp.path(), DEFAULT_EXTENSIONS).unwrap();
        assert_eq!(*set.records[0].image.get_pixel(0, 0), Rgba([1, 2, 3, 255]));
    }
}
