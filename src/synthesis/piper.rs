//! Native voice backend
//!
//! Runs a Piper-compatible VITS runtime as a subprocess. Each language maps
//! to `<voices_dir>/<voice_id>.onnx` (e.g. an MMS export such as `zul.onnx`)
//! with an optional `<voice_id>.onnx.json` next to it describing the output
//! sample rate. Text goes in on stdin; raw 16-bit mono PCM comes back on
//! stdout (`--output_raw`).

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::audio::PcmAudio;
use crate::core::error::{BackendKind, Result, TtsError};
use crate::language::LanguageProfile;
use crate::server::config::NativeConfig;
use crate::synthesis::traits::{NativeVoice, NativeVoiceBackend};

/// Sample rate assumed when a voice has no JSON config (MMS voices are 16 kHz)
pub const DEFAULT_VOICE_SAMPLE_RATE: u32 = 16_000;

/// Subset of the Piper voice config we need
#[derive(Debug, Deserialize)]
struct VoiceConfigFile {
    #[serde(default)]
    audio: VoiceAudioConfig,
}

#[derive(Debug, Deserialize)]
struct VoiceAudioConfig {
    #[serde(default = "default_sample_rate")]
    sample_rate: u32,
}

impl Default for VoiceAudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
        }
    }
}

fn default_sample_rate() -> u32 {
    DEFAULT_VOICE_SAMPLE_RATE
}

/// Subprocess-based native backend
pub struct PiperBackend {
    config: NativeConfig,
    /// Resolved runtime binary, `None` when not installed
    binary: Option<PathBuf>,
}

impl PiperBackend {
    /// Create the backend, resolving the runtime binary once
    pub fn new(config: NativeConfig) -> Self {
        let binary = if config.enabled {
            resolve_binary(&config.binary)
        } else {
            None
        };

        match &binary {
            Some(path) => info!("Native voice runtime found at {}", path.display()),
            None if config.enabled => warn!(
                "Native voice runtime '{}' not found; native synthesis disabled",
                config.binary.display()
            ),
            None => info!("Native voice backend disabled by configuration"),
        }

        Self { config, binary }
    }

    /// Path of the model file for a profile
    pub fn model_path(&self, profile: &LanguageProfile) -> PathBuf {
        self.config.voices_dir.join(format!("{}.onnx", profile.voice_id))
    }
}

#[async_trait]
impl NativeVoiceBackend for PiperBackend {
    fn name(&self) -> &str {
        "piper"
    }

    fn is_available(&self) -> bool {
        self.binary.is_some()
    }

    async fn load_voice(&self, profile: &'static LanguageProfile) -> Result<Arc<dyn NativeVoice>> {
        let binary = self
            .binary
            .clone()
            .ok_or_else(|| TtsError::backend(BackendKind::Native, "voice runtime not installed"))?;

        let model_path = self.model_path(profile);
        if !tokio::fs::try_exists(&model_path).await.unwrap_or(false) {
            return Err(TtsError::backend(
                BackendKind::Native,
                format!("voice model not found: {}", model_path.display()),
            ));
        }

        let sample_rate = read_sample_rate(&model_path).await?;

        Ok(Arc::new(PiperVoice {
            voice_id: profile.voice_id.to_string(),
            binary,
            model_path,
            sample_rate,
            timeout: Duration::from_secs(self.config.timeout_secs),
            extra_args: self.config.extra_args.clone(),
        }))
    }
}

/// A voice model bound to the runtime binary
pub struct PiperVoice {
    voice_id: String,
    binary: PathBuf,
    model_path: PathBuf,
    sample_rate: u32,
    timeout: Duration,
    extra_args: Vec<String>,
}

impl PiperVoice {
    async fn run(&self, text: &str) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.binary)
            .arg("--model")
            .arg(&self.model_path)
            .arg("--output_raw")
            .args(&self.extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| native_error(format!("failed to start {}: {}", self.binary.display(), e)))?;

        // Feed stdin while stdout drains, or a streaming runtime fills its pipe
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(text.as_bytes()).await?;
                stdin.write_all(b"\n").await?;
            }
            Ok::<(), std::io::Error>(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output = output.map_err(|e| native_error(format!("voice runtime failed: {}", e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(native_error(format!(
                "voice runtime exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        fed.map_err(|e| native_error(format!("failed to write text: {}", e)))?;

        Ok(output.stdout)
    }
}

#[async_trait]
impl NativeVoice for PiperVoice {
    fn voice_id(&self) -> &str {
        &self.voice_id
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    async fn synthesize(&self, text: &str) -> Result<PcmAudio> {
        let start = Instant::now();

        let raw = tokio::time::timeout(self.timeout, self.run(text))
            .await
            .map_err(|_| TtsError::Timeout {
                message: format!("voice '{}' did not finish", self.voice_id),
                duration_ms: self.timeout.as_millis() as u64,
            })??;

        let audio = PcmAudio::from_le_bytes(&raw, self.sample_rate);
        if audio.is_empty() {
            return Err(native_error(format!("voice '{}' produced no audio", self.voice_id)));
        }

        debug!(
            voice = %self.voice_id,
            samples = audio.samples.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Native synthesis finished"
        );
        Ok(audio)
    }
}

fn native_error(message: String) -> TtsError {
    TtsError::backend(BackendKind::Native, message)
}

/// Read `audio.sample_rate` from `<model>.json`, if present
async fn read_sample_rate(model_path: &Path) -> Result<u32> {
    let config_path = PathBuf::from(format!("{}.json", model_path.display()));
    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(DEFAULT_VOICE_SAMPLE_RATE),
        Err(e) => {
            return Err(TtsError::Io {
                message: e.to_string(),
                path: Some(config_path),
            })
        }
    };

    let parsed: VoiceConfigFile = serde_json::from_str(&content).map_err(|e| {
        native_error(format!("invalid voice config {}: {}", config_path.display(), e))
    })?;

    if parsed.audio.sample_rate == 0 {
        return Err(native_error(format!(
            "voice config {} declares a zero sample rate",
            config_path.display()
        )));
    }
    Ok(parsed.audio.sample_rate)
}

/// Resolve a binary name against `PATH`, or check an explicit path
pub fn resolve_binary(binary: &Path) -> Option<PathBuf> {
    if binary.as_os_str().is_empty() {
        return None;
    }
    if binary.is_absolute() || binary.components().count() > 1 {
        return binary.is_file().then(|| binary.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.is_file())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::language::Language;
    use std::os::unix::fs::PermissionsExt;

    /// Write an executable shell script standing in for the runtime
    fn fake_runtime(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-piper");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    fn config_for(dir: &Path, binary: PathBuf) -> NativeConfig {
        NativeConfig {
            enabled: true,
            binary,
            voices_dir: dir.to_path_buf(),
            timeout_secs: 5,
            extra_args: Vec::new(),
        }
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let backend = PiperBackend::new(config_for(dir.path(), dir.path().join("nope")));
        assert!(!backend.is_available());
    }

    #[test]
    fn test_disabled_backend_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let binary = fake_runtime(dir.path(), "cat >/dev/null");
        let mut config = config_for(dir.path(), binary);
        config.enabled = false;
        assert!(!PiperBackend::new(config).is_available());
    }

    #[tokio::test]
    async fn test_missing_model_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let binary = fake_runtime(dir.path(), "cat >/dev/null");
        let backend = PiperBackend::new(config_for(dir.path(), binary));

        assert!(backend.is_available());
        let err = backend.load_voice(Language::Zulu.profile()).await.err().unwrap();
        assert!(err.to_string().contains("zul.onnx"));
    }

    #[tokio::test]
    async fn test_synthesize_reads_raw_pcm() {
        let dir = tempfile::tempdir().unwrap();
        // 100 samples of silence
        let binary = fake_runtime(dir.path(), "cat >/dev/null\nhead -c 200 /dev/zero");
        std::fs::write(dir.path().join("xho.onnx"), b"model").unwrap();
        std::fs::write(
            dir.path().join("xho.onnx.json"),
            r#"{"audio": {"sample_rate": 22050}}"#,
        )
        .unwrap();

        let backend = PiperBackend::new(config_for(dir.path(), binary));
        let voice = backend.load_voice(Language::Xhosa.profile()).await.unwrap();
        assert_eq!(voice.sample_rate(), 22_050);

        let audio = voice.synthesize("Molo").await.unwrap();
        assert_eq!(audio.samples.len(), 100);
        assert_eq!(audio.sample_rate, 22_050);
    }

    #[tokio::test]
    async fn test_default_sample_rate_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let binary = fake_runtime(dir.path(), "cat >/dev/null\nhead -c 32 /dev/zero");
        std::fs::write(dir.path().join("zul.onnx"), b"model").unwrap();

        let backend = PiperBackend::new(config_for(dir.path(), binary));
        let voice = backend.load_voice(Language::Zulu.profile()).await.unwrap();
        assert_eq!(voice.sample_rate(), DEFAULT_VOICE_SAMPLE_RATE);
    }

    #[tokio::test]
    async fn test_runtime_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let binary = fake_runtime(dir.path(), "cat >/dev/null\necho 'bad model' >&2\nexit 3");
        std::fs::write(dir.path().join("ven.onnx"), b"model").unwrap();

        let backend = PiperBackend::new(config_for(dir.path(), binary));
        let voice = backend.load_voice(Language::Tshivenda.profile()).await.unwrap();
        let err = voice.synthesize("Ndaa").await.unwrap_err();
        assert!(err.to_string().contains("bad model"));
    }

    #[tokio::test]
    async fn test_empty_output_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let binary = fake_runtime(dir.path(), "cat >/dev/null");
        std::fs::write(dir.path().join("tsn.onnx"), b"model").unwrap();

        let backend = PiperBackend::new(config_for(dir.path(), binary));
        let voice = backend.load_voice(Language::Setswana.profile()).await.unwrap();
        assert!(voice.synthesize("Dumelang").await.is_err());
    }

    #[tokio::test]
    async fn test_long_text_streams_through_runtime() {
        let dir = tempfile::tempdir().unwrap();
        // Echoes its input, so output grows with the text
        let binary = fake_runtime(dir.path(), "cat");
        std::fs::write(dir.path().join("zul.onnx"), b"model").unwrap();

        let mut config = config_for(dir.path(), binary);
        config.timeout_secs = 10;
        let backend = PiperBackend::new(config);
        let voice = backend.load_voice(Language::Zulu.profile()).await.unwrap();

        let text = "Sawubona baba. ".repeat(20_000);
        let audio = voice.synthesize(&text).await.unwrap();
        assert_eq!(audio.samples.len(), (text.len() + 1) / 2);
    }
}
