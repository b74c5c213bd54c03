use std::{fs, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

pub const CACHE_DIR_NAME: &str = ".movieBrowserCache";
pub const PLAYER_PATH_CACHE_FILE: &str = ".player_path.cache";
pub const NOT_FOUND_POSTER: &str = ".style/filenotfound.png";

pub const DEFAULT_API_HOST: &str = "www.omdbapi.com";
const DEFAULT_API_KEY: &str = "8b79c8d6";

/// How metadata cache entries are named. The legacy mode keys by bare file
/// name, so identically named files in different folders share one entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheKeyMode {
    FileName,
    RelativePath,
}

impl CacheKeyMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "filename" | "file_name" => Some(Self::FileName),
            "relative_path" | "relative" | "path" => Some(Self::RelativePath),
            _ => None,
        }
    }
}

impl Default for CacheKeyMode {
    fn default() -> Self {
        Self::FileName
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub scan_root: PathBuf,
    pub api_host: String,
    pub api_key: String,
    pub video_exts: Vec<String>,
    pub subtitle_exts: Vec<String>,
    pub cache_key_mode: CacheKeyMode,
    pub fetch_workers: usize,
    pub player_cmd: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scan_root: PathBuf::from("."),
            api_host: DEFAULT_API_HOST.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            video_exts: vec![
                "mkv".to_string(),
                "mp4".to_string(),
                "avi".to_string(),
                "VOB".to_string(),
            ],
            subtitle_exts: vec!["srt".to_string(), "sub".to_string()],
            cache_key_mode: CacheKeyMode::default(),
            fetch_workers: 8,
            player_cmd: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    scan_root: Option<String>,
    api_host: Option<String>,
    api_key: Option<String>,
    video_exts: Option<Vec<String>>,
    subtitle_exts: Option<Vec<String>>,
    cache_key_mode: Option<String>,
    fetch_workers: Option<usize>,
    player_cmd: Option<String>,
}

pub fn load_config() -> AppConfig {
    let cfg_path = PathBuf::from("config.json");
    let mut cfg = AppConfig::default();

    match fs::read_to_string(&cfg_path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                if let Some(root) = parsed.scan_root {
                    cfg.scan_root = PathBuf::from(root);
                }
                if let Some(host) = parsed.api_host {
                    cfg.api_host = host;
                }
                if let Some(key) = parsed.api_key {
                    cfg.api_key = key;
                }
                if let Some(list) = parsed.video_exts {
                    cfg.video_exts = list;
                }
                if let Some(list) = parsed.subtitle_exts {
                    cfg.subtitle_exts = list;
                }
                if let Some(mode) = parsed.cache_key_mode {
                    match CacheKeyMode::from_str(&mode) {
                        Some(kind) => cfg.cache_key_mode = kind,
                        None => warn!(
                            "Unknown cache_key_mode `{mode}` in config.json; keeping filename keys."
                        ),
                    }
                }
                if let Some(n) = parsed.fetch_workers {
                    cfg.fetch_workers = n.clamp(1, 32);
                }
                if parsed.player_cmd.is_some() {
                    cfg.player_cmd = parsed.player_cmd;
                }
                info!("Loaded config from {}", cfg_path.display());
            }
            Err(err) => {
                warn!("Failed to parse config.json ({}). Using defaults.", err);
            }
        },
        Err(_) => {
            info!("No config.json found; using defaults");
        }
    }

    cfg
}
