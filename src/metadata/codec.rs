use std::fs;
use std::path::Path;

use anyhow::Result;

use super::AtlasMetadata;
use crate::error::StitchError;

/// Read and parse a metadata file
pub fn read_metadata(path: &Path) -> Result<AtlasMetadata> {
    if !path.exists() {
        return Err(StitchError::NotFound(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path).map_err(|e| StitchError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let metadata = AtlasMetadata::from_json(&content).map_err(|e| StitchError::Schema {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(metadata)
}

/// Serialize metadata to a file
pub fn write_metadata(metadata: &AtlasMetadata, path: &Path) -> Result<()> {
    let content = metadata.to_json()?;

    fs::write(path, content).map_err(|e| StitchError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PlacementEntry;
    use std::path::PathBuf;

    #[test]
    fn test_write_then_read() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("meta.json");
        let meta = AtlasMetadata::new(
            (104, 72),
            vec![PlacementEntry {
                original_path: PathBuf::from("/images/только.png"),
                filename: "только.png".to_string(),
                bounds: [20, 20, 64, 32].into(),
            }],
        );

        write_metadata(&meta, &path).unwrap();
        assert_eq!(read_metadata(&path).unwrap(), meta);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_metadata(&tmp.path().join("missing.json")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StitchError>(),
            Some(StitchError::NotFound(_))
        ));
    }

    #[test]
    fn test_garbage_is_schema_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("meta.json");
        fs::write(&path, "{ broken").unwrap();

        let err = read_metadata(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StitchError>(),
            Some(StitchError::Schema { .. })
        ));
    }
}
