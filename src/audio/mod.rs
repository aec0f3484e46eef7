//! Audio payload helpers
//!
//! - In-memory WAV encoding for native voice output and the silence fallback
//! - WAV inspection for diagnostics and tests
//! - MIME types of the payloads the service returns

pub mod wav;

use serde::{Deserialize, Serialize};

pub use wav::{inspect, one_second_of_silence, WavInfo, SILENCE_SAMPLE_RATE, WAV_HEADER_LEN};

/// Audio MIME types returned by the synthesis endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioMime {
    /// `audio/wav`
    #[serde(rename = "audio/wav")]
    Wav,
    /// `audio/mpeg`
    #[serde(rename = "audio/mpeg")]
    Mpeg,
}

impl AudioMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioMime::Wav => "audio/wav",
            AudioMime::Mpeg => "audio/mpeg",
        }
    }

    /// File extension for saving a payload of this type
    pub fn extension(&self) -> &'static str {
        match self {
            AudioMime::Wav => "wav",
            AudioMime::Mpeg => "mp3",
        }
    }
}

impl std::fmt::Display for AudioMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 16-bit mono PCM produced by a native voice
#[derive(Debug, Clone, Default)]
pub struct PcmAudio {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl PcmAudio {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    /// Decode raw little-endian 16-bit samples
    pub fn from_le_bytes(raw: &[u8], sample_rate: u32) -> Self {
        let samples = raw
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Self { samples, sample_rate }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Encode as a WAV payload
    pub fn to_wav(&self) -> Vec<u8> {
        wav::pcm16_to_wav(&self.samples, self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_strings() {
        assert_eq!(AudioMime::Wav.as_str(), "audio/wav");
        assert_eq!(AudioMime::Mpeg.to_string(), "audio/mpeg");
        assert_eq!(AudioMime::Mpeg.extension(), "mp3");
    }

    #[test]
    fn test_pcm_from_le_bytes() {
        let pcm = PcmAudio::from_le_bytes(&[0x10, 0x00, 0xff, 0xff, 0x01], 8_000);
        assert_eq!(pcm.samples, vec![16, -1]);
        assert!((pcm.duration_secs() - 0.00025).abs() < 1e-6);

        let info = inspect(&pcm.to_wav()).unwrap();
        assert_eq!(info.sample_rate, 8_000);
        assert_eq!(info.num_samples, 2);
    }
}
