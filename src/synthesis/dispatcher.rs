//! Backend selection and fallback
//!
//! A request walks an ordered chain of stages, stopping at the first one that
//! produces audio:
//!
//! ```text
//! TryNative ──fail/skip──▶ TryCloud ──fail/skip──▶ Silence
//! ```
//!
//! `Silence` cannot fail, so every valid request gets a payload. Backend
//! failures are logged and never reach the caller; the only error surfaced
//! is a validation error for empty text.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::audio::{one_second_of_silence, AudioMime};
use crate::core::error::{BackendKind, Result, TtsError};
use crate::language::{Language, LanguageProfile};
use crate::synthesis::model_cache::{ModelCache, ModelCacheStats};
use crate::synthesis::traits::{
    BackendSelection, CloudTtsBackend, NativeVoiceBackend, SynthesizedAudio,
};

/// Stages of the fallback chain, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    TryNative,
    TryCloud,
    Silence,
}

impl DispatchStage {
    /// Stage to try after this one fails; `None` once terminal
    pub fn next(self) -> Option<DispatchStage> {
        match self {
            DispatchStage::TryNative => Some(DispatchStage::TryCloud),
            DispatchStage::TryCloud => Some(DispatchStage::Silence),
            DispatchStage::Silence => None,
        }
    }
}

/// Outcome of running one stage
enum StageOutcome {
    Success(SynthesizedAudio),
    /// Stage does not apply to this request
    Skipped(&'static str),
    Failed(TtsError),
}

/// Chooses a backend per request and degrades through the fallback chain
pub struct SynthesisDispatcher {
    native: Option<Arc<dyn NativeVoiceBackend>>,
    cloud: Option<Arc<dyn CloudTtsBackend>>,
    cache: ModelCache,
}

impl SynthesisDispatcher {
    pub fn new(
        native: Option<Arc<dyn NativeVoiceBackend>>,
        cloud: Option<Arc<dyn CloudTtsBackend>>,
    ) -> Self {
        Self {
            native,
            cloud,
            cache: ModelCache::new(),
        }
    }

    /// Dispatcher with no backends; always answers with silence
    pub fn silent() -> Self {
        Self::new(None, None)
    }

    pub fn native_available(&self) -> bool {
        self.native.as_ref().is_some_and(|b| b.is_available())
    }

    pub fn cloud_enabled(&self) -> bool {
        self.cloud.is_some()
    }

    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> ModelCacheStats {
        self.cache.stats()
    }

    /// Whether a native voice would be attempted for the language
    pub fn serves_natively(&self, profile: &LanguageProfile) -> bool {
        self.native_available() && profile.native_eligible()
    }

    /// Whether the cloud API would be attempted for the language
    pub fn serves_via_cloud(&self, profile: &LanguageProfile) -> bool {
        self.cloud.as_ref().is_some_and(|c| c.supports(profile))
    }

    /// Synthesize `text` in the language named by `language_code`.
    ///
    /// Unknown codes resolve to English.
    pub async fn synthesize(&self, text: &str, language_code: &str) -> Result<SynthesizedAudio> {
        if text.is_empty() {
            return Err(TtsError::invalid_field("text", "Text is required"));
        }

        let language = Language::from_code_or_default(language_code);
        let profile = language.profile();
        let start = Instant::now();

        let mut stage = DispatchStage::TryNative;
        loop {
            match self.run_stage(stage, text, profile).await {
                StageOutcome::Success(audio) => {
                    info!(
                        language = %language,
                        backend = %audio.backend,
                        bytes = audio.len(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Synthesis complete"
                    );
                    return Ok(audio);
                }
                StageOutcome::Skipped(reason) => {
                    debug!(language = %language, stage = ?stage, reason, "Stage skipped");
                }
                StageOutcome::Failed(err) if err.is_recoverable() => {
                    warn!(language = %language, stage = ?stage, error = %err, "Backend failed, falling back");
                }
                StageOutcome::Failed(err) => {
                    error!(language = %language, stage = ?stage, error = %err, "Unexpected backend error, falling back");
                }
            }

            match stage.next() {
                Some(next) => stage = next,
                None => return Err(TtsError::internal("fallback chain exhausted")),
            }
        }
    }

    async fn run_stage(
        &self,
        stage: DispatchStage,
        text: &str,
        profile: &'static LanguageProfile,
    ) -> StageOutcome {
        match stage {
            DispatchStage::TryNative => self.try_native(text, profile).await,
            DispatchStage::TryCloud => self.try_cloud(text, profile).await,
            DispatchStage::Silence => StageOutcome::Success(SynthesizedAudio {
                bytes: one_second_of_silence(),
                mime: AudioMime::Wav,
                backend: BackendSelection::Silence,
                language: profile.language,
            }),
        }
    }

    async fn try_native(&self, text: &str, profile: &'static LanguageProfile) -> StageOutcome {
        let backend = match &self.native {
            Some(backend) if backend.is_available() => backend,
            _ => return StageOutcome::Skipped("native backend unavailable"),
        };
        if !profile.native_eligible() {
            return StageOutcome::Skipped("language is cloud-only");
        }

        let voice = match self.cache.get_or_load(profile, backend.as_ref()).await {
            Ok(voice) => voice,
            Err(err) => return StageOutcome::Failed(err),
        };

        match voice.synthesize(text).await {
            Ok(pcm) if pcm.is_empty() => StageOutcome::Failed(TtsError::backend(
                BackendKind::Native,
                "voice produced no samples",
            )),
            Ok(pcm) => StageOutcome::Success(SynthesizedAudio {
                bytes: pcm.to_wav(),
                mime: AudioMime::Wav,
                backend: BackendSelection::NativeModel,
                language: profile.language,
            }),
            Err(err) => StageOutcome::Failed(err),
        }
    }

    async fn try_cloud(&self, text: &str, profile: &'static LanguageProfile) -> StageOutcome {
        let cloud = match &self.cloud {
            Some(cloud) => cloud,
            None => return StageOutcome::Skipped("cloud backend disabled"),
        };
        let code = match profile.cloud_code {
            Some(code) if cloud.supports(profile) => code,
            _ => return StageOutcome::Skipped("language not served by cloud backend"),
        };

        match cloud.synthesize(text, code).await {
            Ok(bytes) if bytes.is_empty() => StageOutcome::Failed(TtsError::backend(
                BackendKind::Cloud,
                "empty audio response",
            )),
            Ok(bytes) => StageOutcome::Success(SynthesizedAudio {
                bytes,
                mime: AudioMime::Mpeg,
                backend: BackendSelection::CloudApi,
                language: profile.language,
            }),
            Err(err) => StageOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{inspect, PcmAudio, WAV_HEADER_LEN};
    use crate::synthesis::traits::NativeVoice;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ToneVoice;

    #[async_trait]
    impl NativeVoice for ToneVoice {
        fn voice_id(&self) -> &str {
            "tone"
        }

        fn sample_rate(&self) -> u32 {
            22_050
        }

        async fn synthesize(&self, text: &str) -> Result<PcmAudio> {
            Ok(PcmAudio::new(vec![1000; text.len() * 10], 22_050))
        }
    }

    #[derive(Default)]
    struct MockNative {
        loads: AtomicUsize,
        fail_load: bool,
    }

    #[async_trait]
    impl NativeVoiceBackend for MockNative {
        fn name(&self) -> &str {
            "mock"
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn load_voice(&self, _profile: &'static LanguageProfile) -> Result<Arc<dyn NativeVoice>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail_load {
                return Err(TtsError::backend(BackendKind::Native, "model missing"));
            }
            Ok(Arc::new(ToneVoice))
        }
    }

    struct MockCloud {
        fail: bool,
    }

    #[async_trait]
    impl CloudTtsBackend for MockCloud {
        fn name(&self) -> &str {
            "mock-cloud"
        }

        async fn synthesize(&self, _text: &str, cloud_code: &str) -> Result<Vec<u8>> {
            if self.fail {
                return Err(TtsError::backend(BackendKind::Cloud, "HTTP 503"));
            }
            Ok(format!("ID3:{}", cloud_code).into_bytes())
        }
    }

    fn dispatcher(native: MockNative, cloud_fail: bool) -> (SynthesisDispatcher, Arc<MockNative>) {
        let native = Arc::new(native);
        let dispatcher = SynthesisDispatcher::new(
            Some(native.clone() as Arc<dyn NativeVoiceBackend>),
            Some(Arc::new(MockCloud { fail: cloud_fail })),
        );
        (dispatcher, native)
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(DispatchStage::TryNative.next(), Some(DispatchStage::TryCloud));
        assert_eq!(DispatchStage::TryCloud.next(), Some(DispatchStage::Silence));
        assert_eq!(DispatchStage::Silence.next(), None);
    }

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let dispatcher = SynthesisDispatcher::silent();
        let err = dispatcher.synthesize("", "zu").await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_whitespace_text_still_answers() {
        let dispatcher = SynthesisDispatcher::silent();
        for text in ["   ", "\n\t"] {
            let audio = dispatcher.synthesize(text, "zu").await.unwrap();
            assert_eq!(audio.backend, BackendSelection::Silence);
        }
    }

    #[tokio::test]
    async fn test_no_backends_gives_one_second_of_silence() {
        let dispatcher = SynthesisDispatcher::silent();
        let audio = dispatcher.synthesize("hello", "zu").await.unwrap();

        assert_eq!(audio.backend, BackendSelection::Silence);
        assert_eq!(audio.mime, AudioMime::Wav);
        assert_eq!(audio.len() - WAV_HEADER_LEN, 32_000);
        let info = inspect(&audio.bytes).unwrap();
        assert_eq!(info.sample_rate, 16_000);
        assert_eq!(info.num_samples, 16_000);
    }

    #[tokio::test]
    async fn test_native_voice_for_african_languages() {
        let (dispatcher, native) = dispatcher(MockNative::default(), false);

        let audio = dispatcher.synthesize("Sawubona", "zu").await.unwrap();
        assert_eq!(audio.backend, BackendSelection::NativeModel);
        assert_eq!(audio.mime, AudioMime::Wav);
        assert_eq!(inspect(&audio.bytes).unwrap().sample_rate, 22_050);

        dispatcher.synthesize("Yebo", "zu").await.unwrap();
        assert_eq!(native.loads.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn test_cloud_only_languages_skip_native() {
        let (dispatcher, native) = dispatcher(MockNative::default(), false);

        let audio = dispatcher.synthesize("Goeie more", "af").await.unwrap();
        assert_eq!(audio.backend, BackendSelection::CloudApi);
        assert_eq!(audio.mime, AudioMime::Mpeg);
        assert_eq!(audio.bytes, b"ID3:af".to_vec());
        assert_eq!(native.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_code_uses_english() {
        let (dispatcher, _) = dispatcher(MockNative::default(), false);

        let audio = dispatcher.synthesize("Bonjour", "fr").await.unwrap();
        assert_eq!(audio.language, Language::English);
        assert_eq!(audio.bytes, b"ID3:en".to_vec());
    }

    #[tokio::test]
    async fn test_native_failure_without_cloud_support_is_silence() {
        let (dispatcher, _) = dispatcher(
            MockNative {
                fail_load: true,
                ..Default::default()
            },
            false,
        );

        let audio = dispatcher.synthesize("Molo", "xh").await.unwrap();
        assert_eq!(audio.backend, BackendSelection::Silence);
        assert!(dispatcher.cache().is_empty());
    }

    #[tokio::test]
    async fn test_cloud_failure_is_silence() {
        let (dispatcher, _) = dispatcher(MockNative::default(), true);

        let audio = dispatcher.synthesize("Hello", "en").await.unwrap();
        assert_eq!(audio.backend, BackendSelection::Silence);
        assert_eq!(audio.len(), WAV_HEADER_LEN + 32_000);
    }

    #[tokio::test]
    async fn test_backend_sets_reported() {
        let (dispatcher, _) = dispatcher(MockNative::default(), false);
        assert!(dispatcher.serves_natively(Language::Sesotho.profile()));
        assert!(!dispatcher.serves_natively(Language::English.profile()));
        assert!(dispatcher.serves_via_cloud(Language::English.profile()));
        assert!(!dispatcher.serves_via_cloud(Language::Sesotho.profile()));
    }
}
