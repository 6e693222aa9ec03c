//! Raw audio frames as delivered by the engine's push callback

use bytes::Bytes;

/// One fixed-cadence slice of interleaved audio.
///
/// The engine delivers these at 10 ms intervals on its own thread. The payload
/// is opaque bytes; `bits_per_sample` selects the decoding (16-bit signed PCM
/// from the engine, 32-bit float accepted for synthetic sources).
#[derive(Clone)]
pub struct AudioFrame {
    /// Raw interleaved sample data
    pub payload: Bytes,
    /// Bit depth of each sample (16 or 32)
    pub bits_per_sample: u32,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u32,
    /// Number of samples per channel
    pub frame_count: u32,
}

impl AudioFrame {
    pub fn new(
        payload: Bytes,
        bits_per_sample: u32,
        sample_rate: u32,
        channels: u32,
        frame_count: u32,
    ) -> Self {
        Self {
            payload,
            bits_per_sample,
            sample_rate,
            channels,
            frame_count,
        }
    }

    /// Build a frame from 16-bit PCM samples (interleaved).
    pub fn from_pcm16(samples: &[i16], sample_rate: u32, channels: u32) -> Self {
        let mut payload = Vec::with_capacity(samples.len() * 2);
        for s in samples {
            payload.extend_from_slice(&s.to_le_bytes());
        }
        let frame_count = (samples.len() / channels.max(1) as usize) as u32;
        Self::new(payload.into(), 16, sample_rate, channels, frame_count)
    }

    /// Build a frame from 32-bit float samples (interleaved).
    pub fn from_f32(samples: &[f32], sample_rate: u32, channels: u32) -> Self {
        let mut payload = Vec::with_capacity(samples.len() * 4);
        for s in samples {
            payload.extend_from_slice(&s.to_le_bytes());
        }
        let frame_count = (samples.len() / channels.max(1) as usize) as u32;
        Self::new(payload.into(), 32, sample_rate, channels, frame_count)
    }

    /// Frame duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count as f64 * 1000.0 / self.sample_rate as f64
    }

    /// Number of samples per channel actually backed by the payload
    pub fn samples_per_channel(&self) -> usize {
        let bytes_per_sample = (self.bits_per_sample / 8).max(1) as usize;
        let available = self.payload.len() / (bytes_per_sample * self.channels.max(1) as usize);
        available.min(self.frame_count as usize)
    }

    /// Decode the payload to interleaved f32 samples in [-1, 1].
    ///
    /// Unknown bit depths decode as silence of the declared length; a read
    /// must never observe garbage data, so the mis-declared payload is
    /// substituted rather than surfaced.
    pub fn decode(&self) -> Vec<f32> {
        let channels = self.channels.max(1) as usize;
        let frames = self.samples_per_channel();
        let count = frames * channels;

        match self.bits_per_sample {
            16 => self
                .payload
                .chunks_exact(2)
                .take(count)
                .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / i16::MAX as f32)
                .collect(),
            32 => self
                .payload
                .chunks_exact(4)
                .take(count)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect(),
            other => {
                tracing::warn!(bits_per_sample = other, "unsupported bit depth, substituting silence");
                vec![0.0; self.frame_count as usize * channels]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm16_roundtrip() {
        let frame = AudioFrame::from_pcm16(&[0, i16::MAX, i16::MIN / 2, 0], 48000, 2);
        assert_eq!(frame.frame_count, 2);
        assert_eq!(frame.samples_per_channel(), 2);

        let decoded = frame.decode();
        assert_eq!(decoded.len(), 4);
        assert_eq!(decoded[0], 0.0);
        assert!((decoded[1] - 1.0).abs() < 1e-4);
        assert!((decoded[2] + 0.5).abs() < 1e-2);
    }

    #[test]
    fn test_duration() {
        let frame = AudioFrame::from_pcm16(&[0i16; 480], 48000, 1);
        assert!((frame.duration_ms() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_truncated_payload_is_clamped() {
        // Declares 480 frames but only carries 10 samples of payload
        let payload: Vec<u8> = vec![0; 20];
        let frame = AudioFrame::new(payload.into(), 16, 48000, 1, 480);
        assert_eq!(frame.samples_per_channel(), 10);
        assert_eq!(frame.decode().len(), 10);
    }

    #[test]
    fn test_unknown_depth_decodes_as_silence() {
        let frame = AudioFrame::new(vec![0xFFu8; 24].into(), 24, 48000, 1, 8);
        let decoded = frame.decode();
        assert_eq!(decoded.len(), 8);
        assert!(decoded.iter().all(|&s| s == 0.0));
    }
}
