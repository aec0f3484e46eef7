//! In-memory WAV encoding
//!
//! All audio returned by the service as `audio/wav` is 16-bit mono PCM.
//! Encoding writes the canonical 44-byte header by hand so it cannot fail;
//! decoding for inspection goes through `hound`.

use std::io::Cursor;

use crate::core::error::Result;

/// Size of the canonical PCM WAV header
pub const WAV_HEADER_LEN: usize = 44;

/// Sample rate of the silence fallback
pub const SILENCE_SAMPLE_RATE: u32 = 16_000;

/// Basic facts about a WAV payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavInfo {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Samples per channel
    pub num_samples: u32,
    pub duration_secs: f32,
}

/// Wrap 16-bit mono samples in a WAV container
pub fn pcm16_to_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let data_size = (samples.len() * 2) as u32;
    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + data_size as usize);
    write_header(&mut wav, sample_rate, data_size);
    for &sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }
    wav
}

/// Wrap raw little-endian 16-bit mono PCM bytes in a WAV container.
///
/// A trailing odd byte is dropped.
pub fn pcm16_bytes_to_wav(raw: &[u8], sample_rate: u32) -> Vec<u8> {
    let usable = raw.len() & !1;
    let data_size = usable as u32;
    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + usable);
    write_header(&mut wav, sample_rate, data_size);
    wav.extend_from_slice(&raw[..usable]);
    wav
}

/// `seconds` of digital silence at `sample_rate`
pub fn silence_wav(seconds: u32, sample_rate: u32) -> Vec<u8> {
    let num_samples = (sample_rate * seconds) as usize;
    pcm16_bytes_to_wav(&vec![0u8; num_samples * 2], sample_rate)
}

/// One second of 16 kHz mono silence, the synthesis fallback payload
pub fn one_second_of_silence() -> Vec<u8> {
    silence_wav(1, SILENCE_SAMPLE_RATE)
}

/// Parse a WAV payload and report its format and length
pub fn inspect(bytes: &[u8]) -> Result<WavInfo> {
    let reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    let num_samples = reader.duration();
    Ok(WavInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        num_samples,
        duration_secs: num_samples as f32 / spec.sample_rate.max(1) as f32,
    })
}

fn write_header(wav: &mut Vec<u8>, sample_rate: u32, data_size: u32) {
    let num_channels = 1u16;
    let bits_per_sample = 16u16;
    let byte_rate = sample_rate * num_channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = num_channels * (bits_per_sample / 8);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt subchunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data subchunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
}
