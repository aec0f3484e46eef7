//! Synthesis backend traits
//!
//! Defines the interface for the native voice backend and the cloud TTS
//! API. The dispatcher only talks to these traits, so tests and alternative
//! deployments can plug in their own implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::audio::{AudioMime, PcmAudio};
use crate::core::error::Result;
use crate::language::{Language, LanguageProfile};

/// Backend that produced a synthesis payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendSelection {
    /// Local neural voice
    #[serde(rename = "native")]
    NativeModel,
    /// Cloud TTS API
    #[serde(rename = "cloud")]
    CloudApi,
    /// One second of silence
    Silence,
}

impl BackendSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NativeModel => "native",
            Self::CloudApi => "cloud",
            Self::Silence => "silence",
        }
    }
}

impl std::fmt::Display for BackendSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio produced by the dispatcher
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// Encoded payload (WAV or MP3)
    pub bytes: Vec<u8>,
    pub mime: AudioMime,
    pub backend: BackendSelection,
    /// Language actually used after code resolution
    pub language: Language,
}

impl SynthesizedAudio {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A loaded native voice, ready to synthesize.
///
/// Voices are stateless with respect to the text they speak, so one handle
/// can be shared by concurrent requests.
#[async_trait]
pub trait NativeVoice: Send + Sync {
    /// Voice model identifier
    fn voice_id(&self) -> &str;

    /// Output sample rate
    fn sample_rate(&self) -> u32;

    /// Synthesize `text` to 16-bit mono PCM
    async fn synthesize(&self, text: &str) -> Result<PcmAudio>;
}

/// Native neural voice backend keyed by language
#[async_trait]
pub trait NativeVoiceBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Whether the backend can run at all on this host
    fn is_available(&self) -> bool;

    /// Load the voice for a language
    async fn load_voice(&self, profile: &'static LanguageProfile) -> Result<Arc<dyn NativeVoice>>;
}

/// Cloud text-to-speech API keyed by a two-letter code
#[async_trait]
pub trait CloudTtsBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Whether the API serves this language
    fn supports(&self, profile: &LanguageProfile) -> bool {
        profile.cloud_supported()
    }

    /// Synthesize speech; returns the API's native encoding (MP3)
    async fn synthesize(&self, text: &str, cloud_code: &str) -> Result<Vec<u8>>;
}
