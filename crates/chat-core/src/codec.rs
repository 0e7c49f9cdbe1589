//! PCM conversion, WAV container encoding and base64 payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chat_types::message::InlineImage;

pub const WAV_HEADER_LEN: usize = 44;
const PCM_FORMAT: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BYTES_PER_SAMPLE: u32 = 2;

/// Map a float sample to signed 16-bit PCM.
///
/// The sample is clamped to [-1, 1]; negatives scale by 32768, positives by 32767.
pub fn float_to_pcm16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

pub fn samples_to_pcm16(samples: &[f32]) -> Vec<i16> {
    samples.iter().copied().map(float_to_pcm16).collect()
}

/// Little-endian 16-bit PCM bytes
pub fn pcm16_le_bytes(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for s in samples {
        bytes.extend_from_slice(&float_to_pcm16(*s).to_le_bytes());
    }
    bytes
}

/// One audio frame ready for realtime transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmFrame {
    pub mime_type: String,
    /// Base64 of little-endian 16-bit PCM
    pub data: String,
}

impl PcmFrame {
    pub fn from_samples(samples: &[f32], mime_type: &str) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(pcm16_le_bytes(samples)),
        }
    }
}

/// Encode mono float samples as a 16-bit PCM WAV file.
///
/// Layout: 44-byte RIFF/WAVE header (`fmt ` chunk of 16 bytes, `data` chunk)
/// followed by little-endian samples.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    let data_len = samples.len() as u32 * BYTES_PER_SAMPLE;
    let mut out = Vec::with_capacity(WAV_HEADER_LEN + data_len as usize);

    // RIFF header
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // "fmt " sub-chunk
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&PCM_FORMAT.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * BYTES_PER_SAMPLE).to_le_bytes());
    out.extend_from_slice(&(BYTES_PER_SAMPLE as u16).to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    // "data" sub-chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(&pcm16_le_bytes(samples));

    out
}

/// Base64-encode raw image bytes for inline transfer
pub fn inline_image(mime_type: &str, bytes: &[u8]) -> InlineImage {
    InlineImage::new(mime_type, STANDARD.encode(bytes))
}
