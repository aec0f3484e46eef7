//! Speech synthesis
//!
//! - Backend traits for native voices and the cloud API
//! - Subprocess-based native voices with a per-language cache
//! - Google Translate TTS client
//! - The dispatcher that picks a backend and falls back to silence

pub mod dispatcher;
pub mod google;
pub mod model_cache;
pub mod piper;
pub mod traits;

pub use dispatcher::{DispatchStage, SynthesisDispatcher};
pub use google::GoogleTranslateTts;
pub use model_cache::{ModelCache, ModelCacheStats};
pub use piper::PiperBackend;
pub use traits::{BackendSelection, CloudTtsBackend, NativeVoice, NativeVoiceBackend, SynthesizedAudio};
