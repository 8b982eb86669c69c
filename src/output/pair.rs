use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;

use super::{encode_atlas_png, ensure_png_path};
use crate::atlas::Atlas;
use crate::cli::CompressionLevel;
use crate::error::StitchError;
use crate::metadata::{AtlasMetadata, write_metadata};

/// Write an atlas canvas and its metadata as a pair.
///
/// The canvas is encoded in memory and both files are staged as temporary
/// siblings first.
/// Any previous metadata is removed before the canvas is moved into place and
/// the new metadata is renamed last, so a metadata file on disk always
/// describes the canvas next to it. Temporaries are removed on failure.
pub fn write_atlas(
    atlas: &Atlas,
    atlas_path: &Path,
    metadata_path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    ensure_png_path(atlas_path)?;

    let png = encode_atlas_png(&atlas.image, atlas_path, compress)?;

    let atlas_tmp = partial_path(atlas_path);
    let metadata_tmp = partial_path(metadata_path);

    let result = commit_pair(
        &atlas.metadata,
        &png,
        (atlas_tmp.as_path(), atlas_path),
        (metadata_tmp.as_path(), metadata_path),
    );

    if result.is_err() {
        for tmp in [&atlas_tmp, &metadata_tmp] {
            if fs::remove_file(tmp).is_ok() {
                debug!("Removed partial file {}", tmp.display());
            }
        }
    }

    result
}

/// `(temporary sibling, final path)`
type Staged<'a> = (&'a Path, &'a Path);

fn commit_pair(
    metadata: &AtlasMetadata,
    png: &[u8],
    canvas: Staged<'_>,
    metadata_files: Staged<'_>,
) -> Result<()> {
    let (canvas_tmp, canvas_target) = canvas;
    let (metadata_tmp, metadata_target) = metadata_files;

    create_parent(canvas_target)?;
    create_parent(metadata_target)?;

    fs::write(canvas_tmp, png).map_err(|e| StitchError::OutputWrite {
        path: canvas_tmp.to_path_buf(),
        source: e,
    })?;
    write_metadata(metadata, metadata_tmp)?;

    if metadata_target.exists() {
        fs::remove_file(metadata_target).map_err(|e| StitchError::OutputWrite {
            path: metadata_target.to_path_buf(),
            source: e,
        })?;
    }

    for (tmp, target) in [canvas, metadata_files] {
        fs::rename(tmp, target).map_err(|e| StitchError::OutputWrite {
            path: target.to_path_buf(),
            source: e,
        })?;
    }

    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StitchError::OutputWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// `dir/name.ext` becomes `dir/.name.ext.partial`
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.partial", name))
}
