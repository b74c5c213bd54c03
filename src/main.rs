// src/main.rs
use std::env;
use std::process::ExitCode;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use movex::app::{build_catalog, PlayerLauncher, SortKey, ALL};
use movex::config::{load_config, CACHE_DIR_NAME};

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let mut cfg = load_config();
    if let Some(root) = env::args().nth(1) {
        cfg.scan_root = root.into();
    }

    let mut catalog = match build_catalog(&cfg) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!("catalog build failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Ok(raw) = env::var("MOVEX_SORT") {
        match SortKey::from_str(&raw) {
            Some(key) => catalog.sort_by(key),
            None => warn!("unknown MOVEX_SORT value `{raw}`; keeping default order"),
        }
    }

    // Plain-text rendering; a widget front-end consumes `Catalog` instead.
    println!("Folders: {ALL}, {}", catalog.folders().join(", "));
    println!("Genres: {ALL}, {}", catalog.all_genres().join(", "));
    println!();
    for record in catalog.list() {
        let folder = record
            .video_path
            .parent()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let subs = if record.subtitle_path.is_some() {
            "subs"
        } else {
            "-"
        };
        println!(
            "{} ({})  imdb {}  {} min  [{}]  {}",
            record.title,
            record.year,
            if record.imdb_rating.is_empty() {
                "?"
            } else {
                record.imdb_rating.as_str()
            },
            record.runtime_minutes,
            folder,
            subs
        );
    }

    if env::var_os("MOVEX_PLAY_RANDOM").is_some() {
        let cache_dir = cfg.scan_root.join(CACHE_DIR_NAME);
        match PlayerLauncher::from_cache(&cache_dir, cfg.player_cmd.as_deref()) {
            Some(launcher) => {
                if let Some(record) = catalog.play_selected_or_random(&launcher) {
                    info!("playing {}", record.video_path.display());
                }
            }
            None => warn!(
                "no media player configured; set player_cmd or {}",
                PlayerLauncher::path_cache_file(&cache_dir).display()
            ),
        }
    }

    ExitCode::SUCCESS
}
