// src/app/mod.rs: scan -> parse -> resolve pipeline plus the public model.
// The widget layer lives elsewhere; `Catalog` is the boundary a front-end
// consumes.

pub mod cache;
pub mod catalog;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod player;
pub mod record;
pub mod resolve;
pub mod scan;
pub mod types;

use std::fs;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::AppConfig;

pub use catalog::{Catalog, ViewState, ALL};
pub use error::LibraryError;
pub use player::PlayerLauncher;
pub use types::{MovieMetadata, MovieRecord, SortKey};

use cache::MetadataCache;
use fetch::MetadataClient;
use resolve::ResolveJob;

/// Run the full pipeline under `cfg.scan_root` and return the browsable
/// catalog. Files that fail to parse or resolve are logged and skipped; an
/// unreadable scan root or cache directory aborts.
pub fn build_catalog(cfg: &AppConfig) -> Result<Catalog, LibraryError> {
    // Canonical root so every catalog path is absolute.
    let root = fs::canonicalize(&cfg.scan_root).map_err(|source| LibraryError::ScanIo {
        root: cfg.scan_root.clone(),
        source,
    })?;

    let cache = MetadataCache::new(&root, cfg.cache_key_mode);
    cache.ensure_dir()?;

    let subtitles = scan::subtitle_index(&root, &cfg.subtitle_exts)?;
    let videos = scan::collect_files(&root, &cfg.video_exts)?;
    info!(
        "scan found {} video files under {}",
        videos.len(),
        root.display()
    );

    let mut jobs = Vec::new();
    for video in videos {
        let name = video
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        match parse::parse_file_name(name) {
            Some(parsed) => jobs.push(ResolveJob {
                idx: jobs.len(),
                video,
                parsed,
            }),
            None => warn!("no match for file: {}", video.display()),
        }
    }

    let client = MetadataClient::new(&cfg.api_host, &cfg.api_key)?;
    let parsed_count = jobs.len();
    let records = resolve::resolve_all(
        Arc::new(cache),
        Arc::new(client),
        Arc::new(subtitles),
        jobs,
        cfg.fetch_workers,
    );
    info!("resolved {} of {} parsed files", records.len(), parsed_count);

    Ok(Catalog::new(records))
}
