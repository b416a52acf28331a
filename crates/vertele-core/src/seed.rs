//! Built-in channel list bundled with the binary.

use std::collections::HashSet;

use serde::Deserialize;

use crate::channel::Channel;
use crate::error::StoreError;

const BUILTIN_CHANNELS: &str = include_str!("../data/channels.toml");

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(rename = "channel", default)]
    channels: Vec<Channel>,
}

/// Parse the bundled channel list.
pub fn builtin_channels() -> Result<Vec<Channel>, StoreError> {
    parse_channels(BUILTIN_CHANNELS)
}

/// Parse a seed list, rejecting duplicate titles or instances and empty
/// stream URLs before anything reaches the database.
pub fn parse_channels(source: &str) -> Result<Vec<Channel>, StoreError> {
    let file: SeedFile = toml::from_str(source)?;
    validate(&file.channels)?;
    Ok(file.channels)
}

fn validate(channels: &[Channel]) -> Result<(), StoreError> {
    let mut titles = HashSet::new();
    let mut instances = HashSet::new();
    for ch in channels {
        if ch.title.trim().is_empty() || ch.instance.trim().is_empty() {
            return Err(StoreError::InvalidSeed(
                "every channel needs a title and an instance".to_string(),
            ));
        }
        if ch.stream_url.trim().is_empty() {
            return Err(StoreError::InvalidSeed(format!(
                "'{}' has an empty stream_url",
                ch.instance
            )));
        }
        if !titles.insert(ch.title.as_str()) {
            return Err(StoreError::InvalidSeed(format!(
                "duplicate title '{}'",
                ch.title
            )));
        }
        if !instances.insert(ch.instance.as_str()) {
            return Err(StoreError::InvalidSeed(format!(
                "duplicate instance '{}'",
                ch.instance
            )));
        }
    }
    Ok(())
}
