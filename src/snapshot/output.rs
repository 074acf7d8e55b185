//! Output file naming and atomic writes
//!
//! Each capture produces `snapshot_<timestamp>.png` and a sibling `.json`.
//! Both files are staged as temporary files in the output directory and
//! claimed under their final names without overwriting, so a reader never
//! sees a partial file and concurrent writers never share a name.

use super::metadata::SnapshotMetadata;
use crate::error::{CaptureError, Error, Result};
use chrono::{DateTime, Local};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Filename prefix for every snapshot
pub const FILE_PREFIX: &str = "snapshot";

/// Timestamp layout used in filenames
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Render a capture time as a filename timestamp
pub fn timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Paths of one snapshot's image and metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    /// PNG path
    pub screenshot: PathBuf,
    /// JSON path
    pub metadata: PathBuf,
}

impl SnapshotPaths {
    /// Candidate paths for `timestamp` in `dir`; attempts after the first get `_1`, `_2`, ...
    pub fn candidate(dir: &Path, timestamp: &str, attempt: u32) -> Self {
        let stem = if attempt == 0 {
            format!("{}_{}", FILE_PREFIX, timestamp)
        } else {
            format!("{}_{}_{}", FILE_PREFIX, timestamp, attempt)
        };
        Self {
            screenshot: dir.join(format!("{}.png", stem)),
            metadata: dir.join(format!("{}.json", stem)),
        }
    }
}

/// Writes a screenshot and its metadata into the output directory
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    /// Writer targeting `dir`; the directory is created on first write
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Write both files under the first free name for the metadata timestamp
    pub async fn write(&self, png: &[u8], metadata: &SnapshotMetadata) -> Result<SnapshotPaths> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| write_failed(&self.dir, e))?;

        let json = metadata.to_json()?;
        let dir = self.dir.clone();
        let timestamp = metadata.timestamp.clone();
        let png = png.to_vec();
        let paths = tokio::task::spawn_blocking(move || persist_pair(&dir, &timestamp, &png, &json))
            .await
            .map_err(|e| Error::generic(format!("output writer task failed: {}", e)))??;

        debug!(
            "Wrote {} and {}",
            paths.screenshot.display(),
            paths.metadata.display()
        );
        Ok(paths)
    }
}

/// Stage both payloads in `dir`, then claim the first free `_N` name for the pair.
///
/// If the metadata cannot be placed the claimed image is removed again.
pub fn persist_pair(dir: &Path, timestamp: &str, png: &[u8], json: &[u8]) -> Result<SnapshotPaths> {
    let mut staged_png = stage(dir, png).map_err(|e| write_failed(dir, e))?;
    let mut staged_json = stage(dir, json).map_err(|e| write_failed(dir, e))?;

    let mut attempt = 0u32;
    loop {
        let paths = SnapshotPaths::candidate(dir, timestamp, attempt);
        attempt += 1;

        match claim(staged_png, &paths.screenshot).map_err(|e| write_failed(&paths.screenshot, e))? {
            Claim::Placed => {}
            Claim::Taken(file) => {
                staged_png = file;
                continue;
            }
        }

        match claim(staged_json, &paths.metadata) {
            Ok(Claim::Placed) => return Ok(paths),
            Ok(Claim::Taken(file)) => {
                staged_json = file;
                remove_orphan(&paths.screenshot);
                staged_png = stage(dir, png).map_err(|e| write_failed(dir, e))?;
            }
            Err(e) => {
                remove_orphan(&paths.screenshot);
                return Err(write_failed(&paths.metadata, e));
            }
        }
    }
}

enum Claim {
    Placed,
    Taken(NamedTempFile),
}

fn stage(dir: &Path, bytes: &[u8]) -> io::Result<NamedTempFile> {
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    Ok(temp)
}

/// Move `temp` to `path` unless something already lives there
fn claim(temp: NamedTempFile, path: &Path) -> io::Result<Claim> {
    match temp.persist_noclobber(path) {
        Ok(_) => Ok(Claim::Placed),
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(Claim::Taken(e.file)),
        Err(e) => Err(e.error),
    }
}

fn remove_orphan(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        warn!("Failed to remove orphaned screenshot {}: {}", path.display(), e);
    }
}

fn write_failed(path: &Path, e: io::Error) -> Error {
    CaptureError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const TS: &str = "20261019_080503";

    fn names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_timestamp_format() {
        let at = Local.with_ymd_and_hms(2026, 10, 19, 8, 5, 3).unwrap();
        assert_eq!(timestamp(&at), TS);
    }

    #[test]
    fn test_candidate_names() {
        let dir = Path::new("/out");
        let first = SnapshotPaths::candidate(dir, TS, 0);
        assert_eq!(first.screenshot, dir.join("snapshot_20261019_080503.png"));
        assert_eq!(first.metadata, dir.join("snapshot_20261019_080503.json"));
        let third = SnapshotPaths::candidate(dir, TS, 2);
        assert_eq!(third.screenshot, dir.join("snapshot_20261019_080503_2.png"));
    }

    #[test]
    fn test_persist_pair_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = persist_pair(dir.path(), TS, b"png", b"{}").unwrap();

        assert_eq!(std::fs::read(&paths.screenshot).unwrap(), b"png");
        assert_eq!(std::fs::read(&paths.metadata).unwrap(), b"{}");
        assert_eq!(
            names(dir.path()),
            vec!["snapshot_20261019_080503.json", "snapshot_20261019_080503.png"]
        );
    }

    #[test]
    fn test_persist_pair_skips_taken_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("snapshot_20261019_080503.png"), b"x").unwrap();
        std::fs::write(dir.path().join("snapshot_20261019_080503_1.json"), b"x").unwrap();

        let paths = persist_pair(dir.path(), TS, b"png", b"{}").unwrap();

        assert_eq!(paths.screenshot, dir.path().join("snapshot_20261019_080503_2.png"));
        assert_eq!(paths.metadata, dir.path().join("snapshot_20261019_080503_2.json"));
        // The image briefly claimed under `_1` is gone again.
        assert!(!dir.path().join("snapshot_20261019_080503_1.png").exists());
        assert_eq!(
            std::fs::read(dir.path().join("snapshot_20261019_080503.png")).unwrap(),
            b"x"
        );
        assert_eq!(names(dir.path()).len(), 4);
    }

    #[test]
    fn test_persist_pair_reports_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = persist_pair(&missing, TS, b"png", b"{}").unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_parallel_writers_never_share_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let writers: Vec<_> = (0..8u8)
            .map(|i| {
                let dir = dir.path().to_path_buf();
                std::thread::spawn(move || {
                    let paths = persist_pair(&dir, TS, &[i], &[b'0' + i]).unwrap();
                    (i, paths)
                })
            })
            .collect();

        let mut screenshots = Vec::new();
        for writer in writers {
            let (i, paths) = writer.join().unwrap();
            assert_eq!(std::fs::read(&paths.screenshot).unwrap(), vec![i]);
            assert_eq!(std::fs::read(&paths.metadata).unwrap(), vec![b'0' + i]);
            assert_eq!(paths.screenshot.file_stem(), paths.metadata.file_stem());
            screenshots.push(paths.screenshot);
        }

        screenshots.sort();
        screenshots.dedup();
        assert_eq!(screenshots.len(), 8);
        assert_eq!(names(dir.path()).len(), 16);
    }
}
