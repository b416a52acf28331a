//! Playback service: resolves a selection against the store and hands it to
//! the launcher.

use tracing::{info, warn};

use crate::channel::{Channel, SelectedChannel};
use crate::error::PlayError;
use crate::player::{LaunchReport, PlayerLauncher};
use crate::store::ChannelStore;

pub struct PlaybackService {
    store: ChannelStore,
    launcher: PlayerLauncher,
}

impl PlaybackService {
    pub fn new(store: ChannelStore, launcher: PlayerLauncher) -> Self {
        Self { store, launcher }
    }

    pub fn store(&self) -> &ChannelStore {
        &self.store
    }

    pub fn launcher(&self) -> &PlayerLauncher {
        &self.launcher
    }

    pub fn launcher_mut(&mut self) -> &mut PlayerLauncher {
        &mut self.launcher
    }

    /// Launch the selected channel with the detected player.
    ///
    /// The row is looked up again by instance so a stale selection cannot
    /// launch a URL the store no longer holds.
    pub fn play(&self, selected: &SelectedChannel) -> Result<LaunchReport, PlayError> {
        if let Some(reason) = self.launcher.unavailable_reason() {
            warn!("play '{}' refused: {}", selected.title, reason);
            return Err(PlayError::PlayerUnavailable(reason.to_string()));
        }
        let channel = self.resolve(&selected.instance)?;
        let report = self.launcher.play(&channel.title, &channel.stream_url)?;
        info!(
            "playing '{}' ({}) with {}",
            channel.title,
            channel.instance,
            report.player.display()
        );
        Ok(report)
    }

    /// Launch `instance` with an explicit player command, skipping detection.
    pub fn play_with(&self, player: &str, instance: &str) -> Result<bool, PlayError> {
        let channel = self.resolve(instance)?;
        Ok(self
            .launcher
            .play_with(player, &channel.title, &channel.stream_url))
    }

    fn resolve(&self, instance: &str) -> Result<Channel, PlayError> {
        self.store
            .find_by_instance(instance)?
            .ok_or_else(|| PlayError::ChannelNotFound(instance.to_string()))
    }

    /// Close the store. Further plays fail with a store error.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.store.close() {
            warn!("closing channel store: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::store::StoreLocation;
    use std::path::PathBuf;

    fn service(candidates: &[&str]) -> PlaybackService {
        let store = ChannelStore::open(StoreLocation::InMemory).unwrap();
        let config = PlayerConfig {
            candidates: candidates.iter().map(|s| s.to_string()).collect(),
            audio_bridge_socket: PathBuf::from("/nonexistent/vertele/PulseServer"),
            ..PlayerConfig::default()
        };
        PlaybackService::new(store, PlayerLauncher::new(config))
    }

    fn selected(instance: &str) -> SelectedChannel {
        SelectedChannel {
            title: "Whatever".to_string(),
            instance: instance.to_string(),
            page_url: None,
            stream_url: "http://example.invalid/stale.m3u8".to_string(),
        }
    }

    #[tokio::test]
    async fn test_degraded_mode_refuses_play() {
        let mut svc = service(&["vertele-no-such-player"]);
        svc.launcher_mut().detect().await;
        let err = svc.play(&selected("sintel")).unwrap_err();
        assert!(matches!(err, PlayError::PlayerUnavailable(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unknown_instance_is_not_found() {
        let mut svc = service(&["true"]);
        assert!(svc.launcher_mut().detect().await.is_available());
        match svc.play(&selected("does-not-exist")) {
            Err(PlayError::ChannelNotFound(instance)) => assert_eq!(instance, "does-not-exist"),
            other => panic!("expected ChannelNotFound, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_play_launches_detected_player() {
        let mut svc = service(&["true"]);
        svc.launcher_mut().detect().await;
        let report = svc.play(&selected("nasatv")).unwrap();
        assert!(report.player.ends_with("true"));
        assert!(report.pid.is_some());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_play_with_override() {
        let svc = service(&[]);
        assert!(svc.play_with("true", "sintel").unwrap());
        assert!(!svc
            .play_with("/nonexistent/bin/player", "sintel")
            .unwrap());
        assert!(matches!(
            svc.play_with("true", "does-not-exist"),
            Err(PlayError::ChannelNotFound(_))
        ));
    }

    #[test]
    fn test_play_after_shutdown_is_store_error() {
        let mut svc = service(&[]);
        svc.shutdown();
        assert!(matches!(
            svc.play_with("true", "sintel"),
            Err(PlayError::Store(_))
        ));
    }
}
