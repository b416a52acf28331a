use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database holding the channel table.
    #[serde(default = "default_database")]
    pub database: PathBuf,
}

/// How the external player is found and invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Ordered lookup list. Bare names go through PATH, absolute paths are
    /// checked in place.
    #[serde(default = "platform::default_player_candidates")]
    pub candidates: Vec<String>,
    /// Arguments of the no-op invocation used to confirm a candidate works.
    #[serde(default = "default_probe_args")]
    pub probe_args: Vec<String>,
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Flag carrying the display title, passed as `<flag>=<title>`.
    #[serde(default = "default_title_flag")]
    pub title_flag: String,
    /// Audio bridge socket; when it exists the player is pointed at it.
    #[serde(default = "default_audio_bridge_socket")]
    pub audio_bridge_socket: PathBuf,
    #[serde(default = "default_audio_bridge_env")]
    pub audio_bridge_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Category table. The bundled table is used when this file is missing.
    #[serde(default = "default_categories_file")]
    pub categories_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            candidates: platform::default_player_candidates(),
            probe_args: default_probe_args(),
            probe_timeout_ms: default_probe_timeout_ms(),
            title_flag: default_title_flag(),
            audio_bridge_socket: default_audio_bridge_socket(),
            audio_bridge_env: default_audio_bridge_env(),
        }
    }
}

impl PlayerConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            categories_file: default_categories_file(),
        }
    }
}

fn default_database() -> PathBuf {
    platform::data_dir().join("channels.db")
}

fn default_probe_args() -> Vec<String> {
    vec!["--version".to_string()]
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

fn default_title_flag() -> String {
    "--meta-title".to_string()
}

fn default_audio_bridge_socket() -> PathBuf {
    PathBuf::from(platform::WSLG_PULSE_SOCKET)
}

fn default_audio_bridge_env() -> String {
    platform::PULSE_SERVER_ENV.to_string()
}

fn default_categories_file() -> PathBuf {
    platform::config_dir().join("categories.toml")
}

impl Config {
    /// Load the default config file, writing one with defaults on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.player.probe_timeout(), Duration::from_secs(2));
        assert_eq!(config.player.probe_args, vec!["--version"]);
        assert_eq!(config.player.title_flag, "--meta-title");
        assert_eq!(config.player.audio_bridge_env, "PULSE_SERVER");
        assert!(config.store.database.ends_with("vertele/channels.db"));
        assert!(config.ui.categories_file.ends_with("vertele/categories.toml"));
    }

    #[cfg(unix)]
    #[test]
    fn test_default_candidates_start_with_bare_name() {
        let candidates = PlayerConfig::default().candidates;
        assert_eq!(candidates.first().map(String::as_str), Some("vlc"));
        assert!(candidates[1..].iter().all(|c| c.starts_with('/')));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [player]
            candidates = ["mpv"]
            probe_timeout_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.player.candidates, vec!["mpv"]);
        assert_eq!(config.player.probe_timeout(), Duration::from_millis(500));
        assert_eq!(config.player.title_flag, "--meta-title");
        assert!(config.store.database.ends_with("channels.db"));
    }

    #[test]
    fn test_load_writes_defaults_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.player.candidates, config.player.candidates);
    }
}
