//! 16-bit mono PCM WAV encoding.
//!
//! The container is written by hand so the header is byte-exact: a 44-byte
//! RIFF/WAVE header followed directly by the little-endian sample data.

use crate::error::{AudiogramError, Result};

/// Size of the RIFF/WAVE header in bytes.
pub const HEADER_LEN: usize = 44;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const BLOCK_ALIGN: u16 = CHANNELS * BITS_PER_SAMPLE / 8;
const FORMAT_PCM: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;

/// Encodes `samples` as a mono 16-bit PCM WAV file in memory.
///
/// Samples are clamped to [-1, 1]; NaN and infinities become silence.
///
/// # Errors
/// - If `sample_rate` is zero or its byte rate does not fit in 32 bits
/// - If the payload is too large for the 32-bit size fields
pub fn encode_pcm16(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let byte_rate = sample_rate
        .checked_mul(BLOCK_ALIGN as u32)
        .filter(|_| sample_rate > 0)
        .ok_or(AudiogramError::InvalidSampleRate { rate: sample_rate })?;

    let data_len = u32::try_from(samples.len())
        .ok()
        .and_then(|n| n.checked_mul(BLOCK_ALIGN as u32))
        .filter(|&n| n.checked_add(36).is_some())
        .ok_or(AudiogramError::PayloadTooLarge {
            samples: samples.len(),
        })?;

    let mut out = Vec::with_capacity(HEADER_LEN + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    out.extend_from_slice(&FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&BLOCK_ALIGN.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());

    for &sample in samples {
        out.extend_from_slice(&quantize(sample).to_le_bytes());
    }

    tracing::trace!(samples = samples.len(), sample_rate, bytes = out.len(), "PCM encoded");
    Ok(out)
}

/// Converts one float sample to 16-bit PCM.
///
/// Negative values scale by 32768 and positive ones by 32767 so both ends of
/// the range map onto the full i16 span.
pub fn quantize(sample: f32) -> i16 {
    let s = if sample.is_finite() {
        sample.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let scaled = if s < 0.0 {
        (s * 32768.0).round()
    } else {
        (s * 32767.0).round()
    };
    scaled as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn test_header_layout() {
        let wav = encode_pcm16(&[0.0, 0.5, -1.0, 1.0], 44100).unwrap();
        assert_eq!(wav.len(), 52);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32_at(&wav, 4), 44);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u32_at(&wav, 16), 16);
        assert_eq!(u16_at(&wav, 20), 1);
        assert_eq!(u16_at(&wav, 22), 1);
        assert_eq!(u32_at(&wav, 24), 44100);
        assert_eq!(u32_at(&wav, 28), 88200);
        assert_eq!(u16_at(&wav, 32), 2);
        assert_eq!(u16_at(&wav, 34), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40), 8);
    }

    #[test]
    fn test_sample_quantization() {
        let wav = encode_pcm16(&[0.0, 0.5, -1.0, 1.0], 44100).unwrap();
        let samples: Vec<i16> = wav[HEADER_LEN..]
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect();
        assert_eq!(samples, vec![0, 16384, -32768, 32767]);
    }

    #[test]
    fn test_out_of_range_and_non_finite_samples() {
        assert_eq!(quantize(3.0), 32767);
        assert_eq!(quantize(-7.5), -32768);
        assert_eq!(quantize(f32::NAN), 0);
        assert_eq!(quantize(f32::INFINITY), 0);
        assert_eq!(quantize(f32::NEG_INFINITY), 0);
        assert_eq!(quantize(-0.5), -16384);
    }

    #[test]
    fn test_empty_payload() {
        let wav = encode_pcm16(&[], 8000).unwrap();
        assert_eq!(wav.len(), HEADER_LEN);
        assert_eq!(u32_at(&wav, 4), 36);
        assert_eq!(u32_at(&wav, 40), 0);
    }

    #[test]
    fn test_invalid_sample_rate_fails_fast() {
        assert_eq!(
            encode_pcm16(&[0.1], 0),
            Err(AudiogramError::InvalidSampleRate { rate: 0 })
        );
        assert!(encode_pcm16(&[0.1], u32::MAX).is_err());
    }
}
