use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::LibraryError;

/// Recursively collect every regular file under `root` whose extension
/// matches the configured list (exact, case-sensitive). The walk is
/// filename-sorted so catalog order is stable between runs. Any walk error
/// aborts the scan.
pub fn collect_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, LibraryError> {
    let mut out = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|err| LibraryError::ScanIo {
            root: root.to_path_buf(),
            source: err.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let wanted = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| extensions.iter().any(|want| want == ext))
            .unwrap_or(false);
        if wanted {
            out.push(path);
        }
    }
    Ok(out)
}

/// Lowercased, trimmed, extension-stripped file stem; the subtitle index key.
pub(crate) fn stem_key(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Map each subtitle's stem key to its path. Later duplicates win, plain map
/// insertion over the scan order.
pub fn subtitle_index(
    root: &Path,
    extensions: &[String],
) -> Result<HashMap<String, PathBuf>, LibraryError> {
    let mut index = HashMap::new();
    for path in collect_files(root, extensions)? {
        index.insert(stem_key(&path), path);
    }
    Ok(index)
}
