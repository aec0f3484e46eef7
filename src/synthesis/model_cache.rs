//! Native voice cache
//!
//! Loaded voices are kept for the lifetime of the process, keyed by
//! language. Entries are never evicted or invalidated.
//!
//! Two requests for the same language may both miss and both load; the
//! later insert wins. Either handle is equivalent, so the race only costs a
//! duplicate load.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::error::Result;
use crate::language::{Language, LanguageProfile};
use crate::synthesis::traits::{NativeVoice, NativeVoiceBackend};

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelCacheStats {
    /// Number of cached voices
    pub entries: usize,
    /// Loads performed through the cache
    pub loads: u64,
    /// Lookups served from the cache
    pub hits: u64,
}

/// Language-keyed cache of loaded native voices
#[derive(Default)]
pub struct ModelCache {
    voices: DashMap<Language, Arc<dyn NativeVoice>>,
    loads: AtomicU64,
    hits: AtomicU64,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached voice for a language, if loaded
    pub fn get(&self, language: Language) -> Option<Arc<dyn NativeVoice>> {
        self.voices.get(&language).map(|entry| Arc::clone(entry.value()))
    }

    /// Return the cached voice or load it through `backend`.
    ///
    /// No lock is held while loading.
    pub async fn get_or_load(
        &self,
        profile: &'static LanguageProfile,
        backend: &dyn NativeVoiceBackend,
    ) -> Result<Arc<dyn NativeVoice>> {
        if let Some(voice) = self.get(profile.language) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(language = profile.code(), voice = voice.voice_id(), "Using cached voice");
            return Ok(voice);
        }

        info!(
            language = profile.code(),
            voice = profile.voice_id,
            backend = backend.name(),
            "Loading native voice (first use)"
        );
        let voice = backend.load_voice(profile).await?;
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.voices.insert(profile.language, Arc::clone(&voice));
        info!(language = profile.code(), sample_rate = voice.sample_rate(), "Voice cached");

        Ok(voice)
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Languages with a loaded voice, sorted
    pub fn cached_languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.voices.iter().map(|entry| *entry.key()).collect();
        languages.sort();
        languages
    }

    pub fn stats(&self) -> ModelCacheStats {
        ModelCacheStats {
            entries: self.voices.len(),
            loads: self.loads.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
        }
    }
}
