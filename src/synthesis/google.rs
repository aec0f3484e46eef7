//! Cloud TTS backend
//!
//! Speaks through the public Google Translate TTS endpoint, the same one the
//! gTTS library uses. The endpoint only accepts short inputs, so text is cut
//! into chunks on sentence boundaries (then word boundaries) and the MP3
//! bodies of the chunks are concatenated.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::core::error::{BackendKind, Result, TtsError};
use crate::server::config::CloudConfig;
use crate::synthesis::traits::CloudTtsBackend;

/// Longest input the endpoint accepts per request
pub const MAX_CHUNK_CHARS: usize = 100;

const USER_AGENT: &str = concat!("mzansi-tts/", env!("CARGO_PKG_VERSION"));

/// Characters that end a sentence-like chunk
const SENTENCE_END: &[char] = &['.', '!', '?', ';', ':', '\n', '…'];

/// Google Translate TTS client
pub struct GoogleTranslateTts {
    config: CloudConfig,
    client: Client,
}

impl GoogleTranslateTts {
    /// Create a client from configuration
    pub fn new(config: CloudConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| cloud_error(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/translate_tts", self.config.base_url.trim_end_matches('/'))
    }

    async fn fetch_chunk(&self, chunk: &str, cloud_code: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", cloud_code),
                ("client", "tw-ob"),
                ("ttsspeed", "1"),
            ])
            .send()
            .await
            .map_err(|e| cloud_error(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(cloud_error(format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| cloud_error(format!("failed to read response: {}", e)))?;
        if body.is_empty() {
            return Err(cloud_error("empty audio response"));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl CloudTtsBackend for GoogleTranslateTts {
    fn name(&self) -> &str {
        "google-translate"
    }

    async fn synthesize(&self, text: &str, cloud_code: &str) -> Result<Vec<u8>> {
        let start = Instant::now();
        let chunks = split_text(text, self.config.max_chunk_chars);
        if chunks.is_empty() {
            return Err(cloud_error("nothing speakable in text"));
        }

        let mut audio = Vec::new();
        for chunk in &chunks {
            audio.extend(self.fetch_chunk(chunk, cloud_code).await?);
        }

        debug!(
            language = cloud_code,
            chunks = chunks.len(),
            bytes = audio.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Cloud synthesis finished"
        );
        Ok(audio)
    }
}

fn cloud_error(message: impl Into<String>) -> TtsError {
    TtsError::backend(BackendKind::Cloud, message)
}

/// Split text into request-sized chunks.
///
/// Each sentence becomes its own chunk; sentences longer than `max_chars`
/// are packed word by word, and single words longer than the limit are cut.
/// Pieces without any letter or digit are dropped.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.clamp(1, MAX_CHUNK_CHARS);
    let mut chunks = Vec::new();

    for sentence in sentences(text) {
        if !sentence.chars().any(char::is_alphanumeric) {
            continue;
        }
        if sentence.chars().count() <= max_chars {
            chunks.push(sentence.to_string());
        } else {
            pack_words(sentence, max_chars, &mut chunks);
        }
    }

    chunks
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(SENTENCE_END)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn pack_words(sentence: &str, max_chars: usize, chunks: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0;

    for word in sentence.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
}
