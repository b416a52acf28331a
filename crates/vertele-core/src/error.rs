//! Error types shared by the store, the launcher and the playback service.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing database could not be opened or created. Fatal at startup.
    #[error("cannot open channel store at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("could not create store directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("channel store query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("built-in channel list is invalid: {0}")]
    Seed(#[from] toml::de::Error),

    #[error("built-in channel list is invalid: {0}")]
    InvalidSeed(String),

    #[error("channel store is closed")]
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("no media player available: {0}")]
    PlayerUnavailable(String),

    #[error("channel has no stream URL")]
    EmptyStreamUrl,

    #[error("could not start {player}: {source}")]
    Spawn {
        player: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything that can go wrong between "play pressed" and "player started".
#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    #[error("no media player available: {0}")]
    PlayerUnavailable(String),

    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    #[error("could not start playback: {0}")]
    LaunchFailure(#[source] LaunchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<LaunchError> for PlayError {
    fn from(err: LaunchError) -> Self {
        match err {
            LaunchError::PlayerUnavailable(reason) => PlayError::PlayerUnavailable(reason),
            other => PlayError::LaunchFailure(other),
        }
    }
}
