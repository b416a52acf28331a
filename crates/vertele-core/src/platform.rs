use std::path::PathBuf;

/// Socket exposed by WSLg for PulseAudio clients running inside the distro.
pub const WSLG_PULSE_SOCKET: &str = "/mnt/wslg/PulseServer";

/// Environment variable PulseAudio clients read to find their server.
pub const PULSE_SERVER_ENV: &str = "PULSE_SERVER";

pub fn data_dir() -> PathBuf {
    // On macOS and Linux, use ~/.local/share/vertele/ (XDG standard)
    // instead of macOS Application Support for consistency
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".local")
            .join("share")
            .join("vertele")
    }
    #[cfg(windows)]
    {
        // Portable installs keep their data beside the executable
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let portable_data = exe_dir.join("data");
                if portable_data.exists() {
                    return portable_data;
                }
            }
        }

        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vertele")
    }
}

pub fn config_dir() -> PathBuf {
    #[cfg(windows)]
    {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let portable_config = exe_dir.join("config.toml");
                if portable_config.exists() {
                    return exe_dir.to_path_buf();
                }
            }
        }
    }

    // On macOS and Linux, always use ~/.config/vertele/
    #[cfg(unix)]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("vertele")
    }

    #[cfg(windows)]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vertele")
    }
}

/// Player lookup order: a bare name resolved through PATH first, then the
/// usual absolute install locations.
#[cfg(unix)]
pub fn default_player_candidates() -> Vec<String> {
    ["vlc", "/usr/bin/vlc", "/usr/local/bin/vlc", "/snap/bin/vlc"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(windows)]
pub fn default_player_candidates() -> Vec<String> {
    [
        "vlc.exe",
        r"C:\Program Files\VideoLAN\VLC\vlc.exe",
        r"C:\Program Files (x86)\VideoLAN\VLC\vlc.exe",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
