//! Detection and launch against real executables. Unix only: relies on the
//! coreutils `true`, `false` and `sleep` binaries.
#![cfg(unix)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use vertele_core::config::PlayerConfig;
use vertele_core::error::LaunchError;
use vertele_core::player::{Detection, PlayerLauncher};

fn config(candidates: &[&str]) -> PlayerConfig {
    PlayerConfig {
        candidates: candidates.iter().map(|s| s.to_string()).collect(),
        audio_bridge_socket: PathBuf::from("/nonexistent/vertele/PulseServer"),
        ..PlayerConfig::default()
    }
}

fn absolute(name: &str) -> String {
    which::which(name).unwrap().display().to_string()
}

#[tokio::test]
async fn bare_name_is_resolved_and_probed() {
    let mut launcher = PlayerLauncher::new(config(&["true"]));
    match launcher.detect().await {
        Detection::Detected(path) => {
            assert!(path.is_absolute());
            assert!(path.ends_with("true"));
        }
        other => panic!("expected a player, got {:?}", other),
    }
}

#[tokio::test]
async fn first_working_candidate_wins() {
    let working = absolute("true");
    let failing = absolute("false");
    let mut launcher = PlayerLauncher::new(config(&[
        "vertele-no-such-player",
        &failing,
        &working,
        "true",
    ]));
    assert_eq!(
        launcher.detect().await,
        &Detection::Detected(PathBuf::from(&working))
    );
}

#[tokio::test]
async fn detection_is_cached() {
    let mut launcher = PlayerLauncher::new(config(&["true"]));
    let first = launcher.detect().await.clone();
    let second = launcher.detect().await.clone();
    assert_eq!(first, second);
}

#[tokio::test]
async fn slow_probe_times_out() {
    let mut cfg = config(&["sleep"]);
    cfg.probe_args = vec!["5".to_string()];
    cfg.probe_timeout_ms = 100;
    let mut launcher = PlayerLauncher::new(cfg);

    let started = Instant::now();
    let available = launcher.detect().await.is_available();
    assert!(!available);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn empty_stream_url_is_rejected() {
    let mut launcher = PlayerLauncher::new(config(&["true"]));
    launcher.detect().await;
    assert!(matches!(
        launcher.play("Demo", ""),
        Err(LaunchError::EmptyStreamUrl)
    ));
}

#[tokio::test]
async fn launch_reports_pid_and_leaves_detection_alone() {
    let mut launcher = PlayerLauncher::new(config(&["true"]));
    let detected = launcher.detect().await.clone();

    let report = launcher
        .play("Demo", "http://example.invalid/live.m3u8")
        .unwrap();
    assert!(report.pid.is_some());
    assert_eq!(launcher.detection(), Some(&detected));
}

#[tokio::test]
async fn failed_spawn_keeps_detection() {
    let mut launcher = PlayerLauncher::new(config(&["true"]));
    let detected = launcher.detect().await.clone();

    assert!(!launcher.play_with(
        "/nonexistent/bin/player",
        "Demo",
        "http://example.invalid/live.m3u8"
    ));
    assert_eq!(launcher.detection(), Some(&detected));
}

#[tokio::test]
async fn audio_bridge_reaches_the_player() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("PulseServer");
    std::fs::write(&socket, b"").unwrap();
    let out = dir.path().join("seen.txt");

    // Answers the --version check, then records what the real launch saw.
    let script = dir.path().join("player.sh");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\n\
             [ \"$1\" = \"--version\" ] && exit 0\n\
             printf '%s|%s|%s' \"$PULSE_SERVER\" \"$1\" \"$2\" > '{}.tmp'\n\
             mv '{}.tmp' '{}'\n",
            out.display(),
            out.display(),
            out.display()
        ),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut cfg = config(&[&script.display().to_string()]);
    cfg.audio_bridge_socket = socket.clone();
    let mut launcher = PlayerLauncher::new(cfg);
    assert!(launcher.detect().await.is_available());

    launcher
        .play("Demo", "http://example.invalid/live.m3u8")
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while !out.exists() && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let seen = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        seen,
        format!(
            "unix:{}|--meta-title=Demo|http://example.invalid/live.m3u8",
            socket.display()
        )
    );
}
