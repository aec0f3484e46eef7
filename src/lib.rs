//! # Mzansi-TTS - Speech for South Africa's Official Languages
//!
//! A small speech service for English, Afrikaans and the nine official
//! Bantu languages of South Africa. It offers two operations over HTTP:
//!
//! - **Text-to-speech** with per-language backend selection: a local neural
//!   voice (Piper/MMS VITS models run as a subprocess) for the Bantu
//!   languages, a cloud TTS API for English and Afrikaans, and one second of
//!   silence when neither is usable. A valid request always gets audio.
//! - **Language identification** through an external text classifier, with
//!   a deterministic English fallback and a greeting in the detected
//!   language.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mzansi_tts::{ServerConfig, TtsServer};
//!
//! let config = ServerConfig::load("config.yaml")?;
//! TtsServer::new(config).run().await?;
//! ```
//!
//! ## Using the Dispatcher Directly
//!
//! ```rust,ignore
//! use mzansi_tts::synthesis::SynthesisDispatcher;
//!
//! let dispatcher = SynthesisDispatcher::silent();
//! let audio = dispatcher.synthesize("Sawubona", "zu").await?;
//! assert_eq!(audio.mime.as_str(), "audio/wav");
//! ```
//!
//! ## Supported Languages
//!
//! | Code | Language | Backend |
//! |------|----------|---------|
//! | `en`, `af` | English, Afrikaans | cloud |
//! | `zu`, `xh`, `nso`, `tn`, `st`, `ts`, `ss`, `ve`, `nr` | Bantu languages | native |

pub mod audio;
pub mod core;
pub mod detection;
pub mod language;
pub mod server;
pub mod synthesis;

pub use crate::core::error::{Result, TtsError};
pub use crate::detection::{DetectionResult, LanguageIdentifier};
pub use crate::language::{Language, LanguageProfile};
pub use crate::server::{ServerConfig, TtsServer};
pub use crate::synthesis::{BackendSelection, SynthesisDispatcher, SynthesizedAudio};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "mzansi-tts";
