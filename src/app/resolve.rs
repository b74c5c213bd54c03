// Per-file metadata resolution: Discovered -> {CacheHit, CacheMiss} ->
// Resolved | Dropped, fanned out over a bounded worker pool sharing one
// HTTP client. A file is fully resolved before its record is part of the
// output, and output order equals scan order.
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use tracing::warn;

use super::cache::MetadataCache;
use super::fetch::{build_metadata, MetadataClient};
use super::parse::ParsedName;
use super::record::build_record;
use super::types::{MovieMetadata, MovieRecord};

/// One queued video file awaiting resolution.
pub(crate) struct ResolveJob {
    pub idx: usize,
    pub video: PathBuf,
    pub parsed: ParsedName,
}

/// Cache-or-fetch for a single file. `None` is the Dropped state: the file
/// stays out of the catalog for this run and nothing new is cached. Corrupt
/// cache entries and malformed runtime fields drop the one file they belong
/// to; one policy for both paths.
fn resolve_one(
    cache: &MetadataCache,
    client: &MetadataClient,
    job: &ResolveJob,
) -> Option<MovieMetadata> {
    let value = if cache.exists(&job.video) {
        match cache.read(&job.video) {
            Ok(value) => value,
            Err(err) => {
                warn!("dropping {}: {err}", job.video.display());
                return None;
            }
        }
    } else {
        let Some((raw, value)) = client.lookup(&job.parsed.year, &job.parsed.query_title) else {
            warn!("dropping {}: metadata fetch failed", job.video.display());
            return None;
        };
        // Write-through before the record is produced; a failed write costs
        // a re-fetch next run, not this run's result.
        if let Err(err) = cache.write(&job.video, &raw) {
            warn!("cache write failed for {}: {err}", job.video.display());
        }
        value
    };

    match build_metadata(&value, &job.parsed.title, &job.parsed.year) {
        Ok(meta) => Some(meta),
        Err(err) => {
            warn!("dropping {}: {err}", job.video.display());
            None
        }
    }
}

/// Resolve all jobs on `workers` threads and reassemble results in scan
/// order. Dropped files leave no slot behind.
pub(crate) fn resolve_all(
    cache: Arc<MetadataCache>,
    client: Arc<MetadataClient>,
    subtitles: Arc<HashMap<String, PathBuf>>,
    jobs: Vec<ResolveJob>,
    workers: usize,
) -> Vec<MovieRecord> {
    let total = jobs.len();
    if total == 0 {
        return Vec::new();
    }

    let (work_tx, work_rx) = mpsc::channel::<ResolveJob>();
    let (done_tx, done_rx) = mpsc::channel::<(usize, Option<MovieRecord>)>();
    let work_rx = Arc::new(Mutex::new(work_rx));

    for _ in 0..workers.clamp(1, total) {
        let work_rx = Arc::clone(&work_rx);
        let done_tx = done_tx.clone();
        let cache = Arc::clone(&cache);
        let client = Arc::clone(&client);
        let subtitles = Arc::clone(&subtitles);

        thread::spawn(move || loop {
            let job = {
                let rx = work_rx.lock().unwrap();
                rx.recv()
            };
            let Ok(job) = job else { break };
            let record = resolve_one(&cache, &client, &job)
                .map(|meta| build_record(&job.video, &job.parsed, meta, &subtitles));
            let _ = done_tx.send((job.idx, record));
        });
    }

    for job in jobs {
        let _ = work_tx.send(job);
    }
    drop(work_tx);
    drop(done_tx);

    let mut slots: Vec<Option<MovieRecord>> = (0..total).map(|_| None).collect();
    let mut received = 0usize;
    while received < total {
        let Ok((idx, record)) = done_rx.recv() else {
            break;
        };
        received += 1;
        if let Some(slot) = slots.get_mut(idx) {
            *slot = record;
        }
    }

    slots.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::parse::parse_file_name;
    use crate::config::CacheKeyMode;
    use std::fs;
    use std::path::Path;

    fn offline_client() -> Arc<MetadataClient> {
        Arc::new(MetadataClient::new("metadata.invalid", "k").unwrap())
    }

    fn job(idx: usize, root: &Path, name: &str) -> ResolveJob {
        ResolveJob {
            idx,
            video: root.join(name),
            parsed: parse_file_name(name).unwrap(),
        }
    }

    fn seeded_cache(root: &Path) -> Arc<MetadataCache> {
        let cache = MetadataCache::new(root, CacheKeyMode::FileName);
        cache.ensure_dir().unwrap();
        Arc::new(cache)
    }

    #[test]
    fn cached_entries_resolve_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = seeded_cache(dir.path());
        let inception = job(0, dir.path(), "2010 - Inception.mkv");
        cache
            .write(
                &inception.video,
                r#"{"Title":"Inception","Year":"2010","Genre":"Sci-Fi","Plot":"p","Poster":"u","imdbRating":"8.8","Director":"Christopher Nolan","Runtime":"148 min"}"#,
            )
            .unwrap();

        let records = resolve_all(
            cache,
            offline_client(),
            Arc::new(HashMap::new()),
            vec![inception],
            4,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Inception");
        assert_eq!(records[0].runtime_minutes, 148);
    }

    #[test]
    fn cached_negative_result_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let cache = seeded_cache(dir.path());
        let obscure = job(0, dir.path(), "1973 - Obscure Film.avi");
        cache
            .write(
                &obscure.video,
                r#"{"Response":"False","Error":"Movie not found!"}"#,
            )
            .unwrap();

        let records = resolve_all(
            Arc::clone(&cache),
            offline_client(),
            Arc::new(HashMap::new()),
            vec![job(0, dir.path(), "1973 - Obscure Film.avi")],
            1,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Obscure Film");
        assert!(records[0].genres.is_empty());
        // The placeholder entry is still on disk, byte for byte.
        assert_eq!(
            fs::read_to_string(cache.entry_path(&obscure.video)).unwrap(),
            r#"{"Response":"False","Error":"Movie not found!"}"#
        );
    }

    #[test]
    fn corrupt_entry_drops_only_that_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = seeded_cache(dir.path());
        let good = job(0, dir.path(), "1995 - Heat.mkv");
        let bad = job(1, dir.path(), "2001 - Glitch.mkv");
        cache
            .write(
                &good.video,
                r#"{"Title":"Heat","Year":"1995","Genre":"Crime","Plot":"p","Poster":"u","imdbRating":"8.3","Director":"Michael Mann","Runtime":"170 min"}"#,
            )
            .unwrap();
        cache.write(&bad.video, "{{{ not json").unwrap();

        let records = resolve_all(
            cache,
            offline_client(),
            Arc::new(HashMap::new()),
            vec![good, bad],
            2,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Heat");
    }

    #[test]
    fn fetch_failure_drops_file_and_caches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = seeded_cache(dir.path());
        let ghost = job(0, dir.path(), "2005 - Ghost Town.mkv");
        let entry = cache.entry_path(&ghost.video);

        let records = resolve_all(
            cache,
            offline_client(),
            Arc::new(HashMap::new()),
            vec![ghost],
            1,
        );
        assert!(records.is_empty());
        assert!(!entry.exists());
    }

    #[test]
    fn results_keep_scan_order() {
        let dir = tempfile::tempdir().unwrap();
        let cache = seeded_cache(dir.path());
        let names = [
            "1995 - Heat.mkv",
            "1999 - The Matrix.mkv",
            "2010 - Inception.mkv",
        ];
        for name in names {
            let parsed = parse_file_name(name).unwrap();
            cache
                .write(
                    &dir.path().join(name),
                    &format!(
                        r#"{{"Title":"{}","Year":"{}","Genre":"","Plot":"","Poster":"","imdbRating":"","Director":"","Runtime":"100 min"}}"#,
                        parsed.title, parsed.year
                    ),
                )
                .unwrap();
        }

        let jobs = names
            .iter()
            .enumerate()
            .map(|(i, name)| job(i, dir.path(), name))
            .collect();
        let records = resolve_all(cache, offline_client(), Arc::new(HashMap::new()), jobs, 3);
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Heat", "The Matrix", "Inception"]);
    }
}
