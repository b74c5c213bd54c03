use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::warn;

use crate::config::PLAYER_PATH_CACHE_FILE;

/// External media player invocation: fire-and-forget, no exit-code handling,
/// no output capture. The executable path persists as a single line in the
/// cache directory so later runs skip the setup step.
pub struct PlayerLauncher {
    exe: PathBuf,
}

impl PlayerLauncher {
    pub fn new(exe: PathBuf) -> Self {
        Self { exe }
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }

    pub fn path_cache_file(cache_dir: &Path) -> PathBuf {
        cache_dir.join(PLAYER_PATH_CACHE_FILE)
    }

    /// Config override first, then the first line of the cached path file.
    pub fn from_cache(cache_dir: &Path, override_cmd: Option<&str>) -> Option<Self> {
        if let Some(cmd) = override_cmd {
            let cmd = cmd.trim();
            if !cmd.is_empty() {
                return Some(Self::new(PathBuf::from(cmd)));
            }
        }
        let txt = fs::read_to_string(Self::path_cache_file(cache_dir)).ok()?;
        let line = txt.lines().next()?.trim();
        if line.is_empty() {
            None
        } else {
            Some(Self::new(PathBuf::from(line)))
        }
    }

    /// Persist a newly chosen player path for later runs.
    pub fn store_path(cache_dir: &Path, exe: &Path) -> io::Result<()> {
        fs::write(
            Self::path_cache_file(cache_dir),
            exe.to_string_lossy().as_bytes(),
        )
    }

    /// `<player> <video> [--sub-file=<subtitle>]`, detached.
    pub fn play(&self, video: &Path, subtitle: Option<&Path>) {
        let mut cmd = Command::new(&self.exe);
        cmd.arg(video);
        if let Some(sub) = subtitle {
            cmd.arg(format!("--sub-file={}", sub.display()));
        }
        if let Err(err) = cmd.spawn() {
            warn!("failed to launch {}: {err}", self.exe.display());
        }
    }
}
