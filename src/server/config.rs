//! Server Configuration
//!
//! YAML file with one section per collaborator: the native voice runtime,
//! the cloud TTS API and the language classifier. Every field has a default,
//! so an empty file (or no file) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::{Result, TtsError};

/// Environment variable overriding `host`
pub const ENV_HOST: &str = "MZANSI_TTS_HOST";
/// Environment variable overriding `port`
pub const ENV_PORT: &str = "MZANSI_TTS_PORT";
/// Environment variable overriding `classifier.api_token`
pub const ENV_CLASSIFIER_TOKEN: &str = "MZANSI_TTS_CLASSIFIER_TOKEN";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Native voice runtime
    #[serde(default)]
    pub native: NativeConfig,

    /// Cloud TTS API
    #[serde(default)]
    pub cloud: CloudConfig,

    /// Language classifier
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Native voice runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Runtime binary, a path or a name looked up on `PATH`
    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    /// Directory holding `<voice_id>.onnx` models
    #[serde(default = "default_voices_dir")]
    pub voices_dir: PathBuf,

    /// Per-request timeout (seconds)
    #[serde(default = "default_native_timeout")]
    pub timeout_secs: u64,

    /// Extra arguments passed to the runtime
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            binary: default_binary(),
            voices_dir: default_voices_dir(),
            timeout_secs: default_native_timeout(),
            extra_args: Vec::new(),
        }
    }
}

/// Cloud TTS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the translate TTS endpoint
    #[serde(default = "default_cloud_base_url")]
    pub base_url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Longest text sent in one request
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_cloud_base_url(),
            timeout_secs: default_timeout(),
            max_chunk_chars: default_max_chunk_chars(),
        }
    }
}

/// Language classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Disabled by default; detection then always falls back to English
    #[serde(default)]
    pub enabled: bool,

    /// Inference endpoint accepting `{"inputs": text}`
    #[serde(default = "default_classifier_endpoint")]
    pub endpoint: String,

    /// Bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Model name reported in detection results
    #[serde(default = "default_classifier_model")]
    pub model: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Send a probe request while loading
    #[serde(default)]
    pub warm_up: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_classifier_endpoint(),
            api_token: None,
            model: default_classifier_model(),
            timeout_secs: default_timeout(),
            warm_up: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level, or any `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_binary() -> PathBuf {
    PathBuf::from("piper")
}

fn default_voices_dir() -> PathBuf {
    PathBuf::from("voices")
}

fn default_native_timeout() -> u64 {
    60
}

fn default_timeout() -> u64 {
    30
}

fn default_cloud_base_url() -> String {
    "https://translate.google.com".to_string()
}

fn default_max_chunk_chars() -> usize {
    100
}

fn default_classifier_endpoint() -> String {
    "https://api-inference.huggingface.co/models/papluca/xlm-roberta-base-language-detection"
        .to_string()
}

fn default_classifier_model() -> String {
    "papluca/xlm-roberta-base-language-detection".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServerConfig {
    /// Load from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TtsError::Io {
            message: e.to_string(),
            path: Some(path.to_path_buf()),
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| TtsError::Config {
            message: e.to_string(),
            path: Some(path.to_path_buf()),
        })?;
        Ok(config)
    }

    /// Save to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Apply `MZANSI_TTS_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| TtsError::config(format!("{} is not a valid port: {}", ENV_PORT, port)))?;
        }
        if let Some(token) = lookup(ENV_CLASSIFIER_TOKEN) {
            self.classifier.api_token = Some(token).filter(|t| !t.is_empty());
        }
        Ok(())
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(TtsError::config("port must be non-zero"));
        }
        if self.native.enabled {
            if self.native.binary.as_os_str().is_empty() {
                return Err(TtsError::config("native.binary must not be empty"));
            }
            if self.native.timeout_secs == 0 {
                return Err(TtsError::config("native.timeout_secs must be non-zero"));
            }
        }
        if self.cloud.enabled {
            if self.cloud.timeout_secs == 0 {
                return Err(TtsError::config("cloud.timeout_secs must be non-zero"));
            }
            if self.cloud.max_chunk_chars == 0 {
                return Err(TtsError::config("cloud.max_chunk_chars must be non-zero"));
            }
        }
        if self.classifier.enabled && self.classifier.timeout_secs == 0 {
            return Err(TtsError::config("classifier.timeout_secs must be non-zero"));
        }
        Ok(())
    }

    /// Socket address string
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            native: NativeConfig::default(),
            cloud: CloudConfig::default(),
            classifier: ClassifierConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
