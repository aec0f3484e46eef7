//! End-to-end dispatch tests against real backends
//!
//! The native runtime is a shell script in a temp directory and the cloud
//! API is a local axum server, both wired up through `ServerConfig`.

#![cfg(unix)]

use axum::extract::Query;
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use mzansi_tts::audio::{inspect, AudioMime, WAV_HEADER_LEN};
use mzansi_tts::language::Language;
use mzansi_tts::server::{ServerConfig, ServerState};
use mzansi_tts::synthesis::BackendSelection;

/// Runtime emitting 400 zero samples, failing for the Tshivenda model
fn write_fake_runtime(dir: &Path) -> std::path::PathBuf {
    let script = r#"#!/bin/sh
cat >/dev/null
case "$2" in
  *ven.onnx) echo "corrupt model" >&2; exit 1 ;;
esac
head -c 800 /dev/zero
"#;
    let path = dir.join("piper");
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn write_voices(dir: &Path) {
    for language in Language::all() {
        let profile = language.profile();
        if profile.native_eligible() {
            std::fs::write(dir.join(format!("{}.onnx", profile.voice_id)), b"model").unwrap();
        }
    }
    std::fs::write(
        dir.join("xho.onnx.json"),
        r#"{"audio": {"sample_rate": 22050}, "espeak": {"voice": "xh"}}"#,
    )
    .unwrap();
}

async fn spawn_cloud() -> String {
    let app = Router::new().route(
        "/translate_tts",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            format!("MP3[{}]", params.get("tl").cloned().unwrap_or_default()).into_bytes()
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn state(dir: &Path) -> ServerState {
    let mut config = ServerConfig::default();
    config.native.binary = write_fake_runtime(dir);
    config.native.voices_dir = dir.to_path_buf();
    config.cloud.base_url = spawn_cloud().await;
    write_voices(dir);
    ServerState::from_config(config).unwrap()
}

#[tokio::test]
async fn test_every_language_gets_audio() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path()).await;

    for language in Language::all() {
        let audio = state
            .dispatcher
            .synthesize("Sanibonani nonke", language.code())
            .await
            .unwrap();
        assert!(!audio.is_empty(), "{} produced no audio", language);
        assert!(matches!(audio.mime, AudioMime::Wav | AudioMime::Mpeg));
        assert_eq!(audio.language, *language);
    }
}

#[tokio::test]
async fn test_native_voice_through_subprocess() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path()).await;

    let audio = state.dispatcher.synthesize("Molo", "xh").await.unwrap();
    assert_eq!(audio.backend, BackendSelection::NativeModel);
    assert_eq!(audio.len(), WAV_HEADER_LEN + 800);

    let info = inspect(&audio.bytes).unwrap();
    assert_eq!(info.sample_rate, 22_050);
    assert_eq!(info.num_samples, 400);

    let audio = state.dispatcher.synthesize("Sawubona", "zu").await.unwrap();
    assert_eq!(inspect(&audio.bytes).unwrap().sample_rate, 16_000);
}

#[tokio::test]
async fn test_voices_loaded_once() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path()).await;

    for _ in 0..3 {
        state.dispatcher.synthesize("Dumela", "tn").await.unwrap();
    }

    let stats = state.dispatcher.cache_stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.loads, 1);
    assert_eq!(stats.hits, 2);
    assert_eq!(state.dispatcher.cache().cached_languages(), vec![Language::Setswana]);
}

#[tokio::test]
async fn test_cloud_languages_use_api() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path()).await;

    let audio = state.dispatcher.synthesize("Hello there", "en-ZA").await.unwrap();
    assert_eq!(audio.backend, BackendSelection::CloudApi);
    assert_eq!(audio.bytes, b"MP3[en]".to_vec());
    assert!(state.dispatcher.cache().is_empty());
}

#[tokio::test]
async fn test_runtime_failure_falls_back_to_silence() {
    let dir = tempfile::tempdir().unwrap();
    let state = state(dir.path()).await;

    let audio = state.dispatcher.synthesize("Ndaa", "ve").await.unwrap();
    assert_eq!(audio.backend, BackendSelection::Silence);
    assert_eq!(audio.len(), WAV_HEADER_LEN + 32_000);
}

#[tokio::test]
async fn test_missing_runtime_falls_back_to_silence() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ServerConfig::default();
    config.native.binary = dir.path().join("not-installed");
    config.cloud.enabled = false;

    let state = ServerState::from_config(config).unwrap();
    assert!(!state.dispatcher.native_available());

    for code in ["zu", "en"] {
        let audio = state.dispatcher.synthesize("hello", code).await.unwrap();
        assert_eq!(audio.backend, BackendSelection::Silence);
        assert_eq!(inspect(&audio.bytes).unwrap().num_samples, 16_000);
    }
}
