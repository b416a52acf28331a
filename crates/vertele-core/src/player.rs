//! External player discovery and launch.
//!
//! ```text
//!   PlayerLauncher::new()          state = None (not yet detected)
//!         │
//!         └── detect()  ── first candidate that answers the probe ──► Detected(path)
//!                       └─ nothing answered ──────────────────────────► Unavailable(reason)
//! ```
//!
//! Detection runs once per process; the outcome is never retried. Launches
//! are fire-and-forget: the child is detached, its output discarded, and it
//! is never waited on or monitored afterwards.
//!
//! `play` and `play_with` spawn through `tokio::process` and must be called
//! from inside a tokio runtime.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::config::PlayerConfig;
use crate::error::LaunchError;

/// Outcome of player detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Detected(PathBuf),
    /// No candidate answered; carries a human-readable explanation.
    Unavailable(String),
}

impl Detection {
    pub fn is_available(&self) -> bool {
        matches!(self, Detection::Detected(_))
    }
}

/// Returned once the player process has been started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReport {
    pub player: PathBuf,
    /// `None` only if the child was already reaped when queried.
    pub pid: Option<u32>,
}

pub struct PlayerLauncher {
    config: PlayerConfig,
    state: Option<Detection>,
}

impl PlayerLauncher {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Run detection if it has not run yet and return the cached outcome.
    pub async fn detect(&mut self) -> &Detection {
        let detection = match self.state.take() {
            Some(done) => done,
            None => detect_player(&self.config).await,
        };
        self.state.insert(detection)
    }

    /// Cached detection outcome; `None` before `detect()` has run.
    pub fn detection(&self) -> Option<&Detection> {
        self.state.as_ref()
    }

    pub fn is_available(&self) -> bool {
        self.state.as_ref().is_some_and(Detection::is_available)
    }

    pub fn player_path(&self) -> Option<&Path> {
        match &self.state {
            Some(Detection::Detected(path)) => Some(path),
            _ => None,
        }
    }

    /// Why playback is disabled, if it is.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            Some(Detection::Unavailable(reason)) => Some(reason),
            Some(Detection::Detected(_)) => None,
            None => Some("player detection has not run"),
        }
    }

    /// Start the detected player on `stream_url` with `title` as its window title.
    pub fn play(&self, title: &str, stream_url: &str) -> Result<LaunchReport, LaunchError> {
        let player = match &self.state {
            Some(Detection::Detected(path)) => path,
            Some(Detection::Unavailable(reason)) => {
                return Err(LaunchError::PlayerUnavailable(reason.clone()))
            }
            None => {
                return Err(LaunchError::PlayerUnavailable(
                    "player detection has not run".to_string(),
                ))
            }
        };
        if stream_url.is_empty() {
            warn!("play '{}': refusing empty stream URL", title);
            return Err(LaunchError::EmptyStreamUrl);
        }
        spawn_detached(player, &self.config, title, stream_url)
    }

    /// Start an arbitrary player command, bypassing detection. Failures are
    /// logged and reported as `false`.
    pub fn play_with(&self, player: &str, title: &str, stream_url: &str) -> bool {
        if player.is_empty() || stream_url.is_empty() {
            warn!("play_with: empty player or stream URL");
            return false;
        }
        spawn_detached(Path::new(player), &self.config, title, stream_url).is_ok()
    }
}

/// Walk the candidate list and return the first player that answers the probe.
pub async fn detect_player(config: &PlayerConfig) -> Detection {
    for candidate in &config.candidates {
        if let Some(path) = check_candidate(candidate, config).await {
            info!("player: using {}", path.display());
            return Detection::Detected(path);
        }
    }

    let reason = if config.candidates.is_empty() {
        "no player candidates are configured".to_string()
    } else {
        format!(
            "no working media player found (tried: {}). Install VLC to play channels.",
            config.candidates.join(", ")
        )
    };
    warn!("player: {}", reason);
    Detection::Unavailable(reason)
}

async fn check_candidate(candidate: &str, config: &PlayerConfig) -> Option<PathBuf> {
    let path = Path::new(candidate);
    let resolved = if path.is_absolute() {
        if !path.is_file() {
            debug!("player: {} does not exist", candidate);
            return None;
        }
        path.to_path_buf()
    } else {
        match which::which(candidate) {
            Ok(found) => found,
            Err(e) => {
                debug!("player: {} not on PATH: {}", candidate, e);
                return None;
            }
        }
    };

    if probe(&resolved, &config.probe_args, config.probe_timeout()).await {
        Some(resolved)
    } else {
        None
    }
}

/// Run `path <args>` and report whether it exits successfully within `timeout`.
/// A probe that overruns is killed and counts as a failure.
async fn probe(path: &Path, args: &[String], timeout: Duration) -> bool {
    let mut child = match Command::new(path)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            debug!("player: probe {} failed to start: {}", path.display(), e);
            return false;
        }
    };

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) => {
            debug!("player: probe {} exited with {}", path.display(), status);
            status.success()
        }
        Ok(Err(e)) => {
            debug!("player: probe {} wait error: {}", path.display(), e);
            false
        }
        Err(_) => {
            debug!(
                "player: probe {} timed out after {:?}",
                path.display(),
                timeout
            );
            let _ = child.kill().await;
            false
        }
    }
}

/// `<title_flag>=<title> <stream_url>`; the URL is always the final argument.
pub fn player_args(title_flag: &str, title: &str, stream_url: &str) -> Vec<String> {
    vec![format!("{}={}", title_flag, title), stream_url.to_string()]
}

/// Environment override pointing the player's audio at the host bridge, when
/// the bridge socket is present.
pub fn audio_bridge_env(config: &PlayerConfig) -> Option<(String, String)> {
    if config.audio_bridge_socket.exists() {
        Some((
            config.audio_bridge_env.clone(),
            format!("unix:{}", config.audio_bridge_socket.display()),
        ))
    } else {
        None
    }
}

fn spawn_detached(
    player: &Path,
    config: &PlayerConfig,
    title: &str,
    stream_url: &str,
) -> Result<LaunchReport, LaunchError> {
    let args = player_args(&config.title_flag, title, stream_url);

    let mut cmd = Command::new(player);
    cmd.args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Some((key, value)) = audio_bridge_env(config) {
        info!("player: audio bridge {}={}", key, value);
        cmd.env(key, value);
    }
    // Own process group so the player outlives us and ignores our Ctrl+C.
    #[cfg(unix)]
    cmd.process_group(0);

    info!("player: {} {}", player.display(), args.join(" "));
    match cmd.spawn() {
        Ok(child) => {
            let pid = child.id();
            info!("player: started '{}' pid={:?}", title, pid);
            Ok(LaunchReport {
                player: player.to_path_buf(),
                pid,
            })
        }
        Err(source) => {
            error!(
                "player: failed to start {} for '{}': {}",
                player.display(),
                title,
                source
            );
            Err(LaunchError::Spawn {
                player: player.to_path_buf(),
                source,
            })
        }
    }
}
