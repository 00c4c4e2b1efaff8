//! Converter mode: rewrite named files in place
//!
//! Each file is processed independently and sequentially. The cleaned
//! document is written to a temporary file in the target's own
//! directory and atomically renamed over it, so an interrupted run
//! leaves either the old bytes or the new bytes, never a torn file.
//! The temporary file is removed on every failure path when it drops.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::core::document::Document;
use crate::core::error::{SvgError, SvgResult};
use crate::core::serializer;
use crate::core::stripper::Stripper;

/// Result of a batch conversion
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Files rewritten with cleaned content
    pub modified: usize,
    /// Files already clean, left untouched
    pub unchanged: usize,
    /// Files that could not be converted
    pub failed: usize,
}

/// Clean one file in place
///
/// Returns `true` when the file was rewritten, `false` when it was
/// already clean. A malformed file is left exactly as it was.
pub fn convert_file(stripper: &Stripper, path: &Path) -> SvgResult<bool> {
    let input = fs::read(path)?;

    let mut doc = Document::parse(&input)?;
    if !doc.is_svg() {
        log::warn!("{}: root element is not <svg>", path.display());
    }
    let removed = stripper.strip_document(&mut doc);
    let output = serializer::serialize(&doc);

    if output == input {
        log::info!("{}: already clean", path.display());
        return Ok(false);
    }

    write_replacing(path, &output)?;
    log::info!(
        "{}: cleaned, {} attribute(s) removed",
        path.display(),
        removed
    );
    Ok(true)
}

/// Clean a list of files sequentially
///
/// A failure is reported and counted, then the batch moves on; files
/// converted before the failure stay converted.
pub fn convert_files(stripper: &Stripper, paths: &[PathBuf]) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for path in paths {
        match convert_file(stripper, path) {
            Ok(true) => summary.modified += 1,
            Ok(false) => summary.unchanged += 1,
            Err(e) => {
                log::error!("{}: {}", path.display(), e);
                summary.failed += 1;
            }
        }
    }
    summary
}

/// Write `content` over `path` via a same-directory temporary file
fn write_replacing(path: &Path, content: &[u8]) -> SvgResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    // Keep the target's permission bits; a fresh temp file starts
    // restrictive.
    if let Ok(meta) = fs::metadata(path) {
        let _ = tmp.as_file().set_permissions(meta.permissions());
    }
    tmp.persist(path).map_err(|e| SvgError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_convert_rewrites_dirty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "a.svg",
            r#"<svg sodipodi:docname="a.svg" width="1"/>"#,
        );
        let stripper = Stripper::new().unwrap();
        assert!(convert_file(&stripper, &path).unwrap());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<svg width=\"1\"/>\n"
        );
    }

    #[test]
    fn test_convert_skips_clean_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "a.svg", "<svg width=\"1\"/>\n");
        let stripper = Stripper::new().unwrap();
        assert!(!convert_file(&stripper, &path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "<svg width=\"1\"/>\n");
    }

    #[test]
    fn test_convert_leaves_malformed_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "bad.svg", "<svg><oops>");
        let stripper = Stripper::new().unwrap();
        let err = convert_file(&stripper, &path).unwrap_err();
        assert!(matches!(err, SvgError::MalformedDocument(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<svg><oops>");
    }

    #[test]
    fn test_batch_continues_past_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good_before = write_fixture(&dir, "a.svg", r#"<svg inkscape:version="1"/>"#);
        let bad = write_fixture(&dir, "b.svg", "not xml at all");
        let good_after = write_fixture(&dir, "c.svg", r#"<svg inkscape:version="1"/>"#);
        let stripper = Stripper::new().unwrap();
        let summary = convert_files(
            &stripper,
            &[good_before.clone(), bad.clone(), good_after.clone()],
        );
        assert_eq!(
            summary,
            BatchSummary {
                modified: 2,
                unchanged: 0,
                failed: 1
            }
        );
        assert_eq!(fs::read_to_string(&good_before).unwrap(), "<svg/>\n");
        assert_eq!(fs::read_to_string(&good_after).unwrap(), "<svg/>\n");
        assert_eq!(fs::read_to_string(&bad).unwrap(), "not xml at all");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let stripper = Stripper::new().unwrap();
        let err = convert_file(&stripper, Path::new("does-not-exist.svg")).unwrap_err();
        assert!(matches!(err, SvgError::Io(_)));
    }
}
