//! Mock collaborators shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mzansi_tts::audio::PcmAudio;
use mzansi_tts::core::error::{Result, TtsError};
use mzansi_tts::detection::{ClassifierLoader, LanguageClassifier};
use mzansi_tts::language::LanguageProfile;
use mzansi_tts::synthesis::{CloudTtsBackend, NativeVoice, NativeVoiceBackend};

/// Fake MP3 payload returned by [`MockCloud`]
pub const FAKE_MP3: &[u8] = b"ID3\x04\x00fake-mp3";

/// A voice that renders 10 ms of a constant tone per character
pub struct ToneVoice {
    pub voice_id: String,
}

#[async_trait]
impl NativeVoice for ToneVoice {
    fn voice_id(&self) -> &str {
        &self.voice_id
    }

    fn sample_rate(&self) -> u32 {
        16_000
    }

    async fn synthesize(&self, text: &str) -> Result<PcmAudio> {
        Ok(PcmAudio::new(vec![2000; text.chars().count() * 160], 16_000))
    }
}

/// Native backend counting voice loads
#[derive(Default)]
pub struct MockNative {
    pub loads: AtomicUsize,
}

impl MockNative {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NativeVoiceBackend for MockNative {
    fn name(&self) -> &str {
        "mock-native"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn load_voice(&self, profile: &'static LanguageProfile) -> Result<Arc<dyn NativeVoice>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(ToneVoice {
            voice_id: profile.voice_id.to_string(),
        }))
    }
}

/// Cloud backend returning [`FAKE_MP3`]
pub struct MockCloud;

#[async_trait]
impl CloudTtsBackend for MockCloud {
    fn name(&self) -> &str {
        "mock-cloud"
    }

    async fn synthesize(&self, _text: &str, _cloud_code: &str) -> Result<Vec<u8>> {
        Ok(FAKE_MP3.to_vec())
    }
}

/// Classifier returning canned output
pub struct CannedClassifier {
    pub output: Value,
}

#[async_trait]
impl LanguageClassifier for CannedClassifier {
    fn model_name(&self) -> &str {
        "canned"
    }

    async fn classify(&self, _text: &str) -> Result<Value> {
        Ok(self.output.clone())
    }
}

/// Loader for [`CannedClassifier`], or a failing loader when `output` is `None`
pub struct CannedLoader {
    pub output: Option<Value>,
    pub loads: AtomicUsize,
}

impl CannedLoader {
    pub fn new(output: Option<Value>) -> Arc<Self> {
        Arc::new(Self {
            output,
            loads: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ClassifierLoader for CannedLoader {
    fn model_name(&self) -> &str {
        "canned"
    }

    async fn load(&self) -> Result<Arc<dyn LanguageClassifier>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        match &self.output {
            Some(output) => Ok(Arc::new(CannedClassifier {
                output: output.clone(),
            })),
            None => Err(TtsError::ClassifierUnavailable {
                message: "no model".to_string(),
            }),
        }
    }
}
