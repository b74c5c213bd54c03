use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::config::{CacheKeyMode, CACHE_DIR_NAME};

use super::error::LibraryError;

/// On-disk store of raw metadata responses, one dot-file per video file.
///
/// Entries are written verbatim and rewritten verbatim on every successful
/// read; the only invalidation path is deleting a file by hand. Keys derive
/// from the video file name (legacy) or the root-relative path, never the
/// absolute path.
pub struct MetadataCache {
    root: PathBuf,
    dir: PathBuf,
    key_mode: CacheKeyMode,
}

impl MetadataCache {
    pub fn new(scan_root: &Path, key_mode: CacheKeyMode) -> Self {
        Self {
            root: scan_root.to_path_buf(),
            dir: scan_root.join(CACHE_DIR_NAME),
            key_mode,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// One-time startup creation; `write` never creates the directory.
    pub fn ensure_dir(&self) -> Result<(), LibraryError> {
        fs::create_dir_all(&self.dir).map_err(|source| LibraryError::CacheIo {
            path: self.dir.clone(),
            source,
        })
    }

    fn entry_name(&self, video: &Path) -> String {
        let key = match self.key_mode {
            CacheKeyMode::FileName => video
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            CacheKeyMode::RelativePath => {
                // Flattened so the key stays a single file name.
                let rel = video.strip_prefix(&self.root).unwrap_or(video);
                rel.to_string_lossy().replace(['/', '\\'], "__")
            }
        };
        format!(".{key}.json")
    }

    pub fn entry_path(&self, video: &Path) -> PathBuf {
        self.dir.join(self.entry_name(video))
    }

    /// True iff the entry is present and a regular file.
    pub fn exists(&self, video: &Path) -> bool {
        self.entry_path(video).is_file()
    }

    /// Read and parse an entry, then refresh it by rewriting the same bytes.
    pub fn read(&self, video: &Path) -> Result<Value, LibraryError> {
        let path = self.entry_path(video);
        let raw = fs::read_to_string(&path).map_err(|source| LibraryError::CacheIo {
            path: path.clone(),
            source,
        })?;
        let value: Value =
            serde_json::from_str(&raw).map_err(|source| LibraryError::CacheCorrupt {
                path: path.clone(),
                source,
            })?;
        if let Err(err) = fs::write(&path, &raw) {
            warn!("cache refresh failed for {}: {err}", path.display());
        }
        Ok(value)
    }

    /// Unconditional overwrite; last writer wins. Fails when the cache
    /// directory is missing.
    pub fn write(&self, video: &Path, raw: &str) -> Result<(), LibraryError> {
        let path = self.entry_path(video);
        fs::write(&path, raw).map_err(|source| LibraryError::CacheIo { path, source })
    }
}
