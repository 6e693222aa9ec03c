//! Pull-style read adapter over a push audio source
//!
//! Bridges the engine's fixed-cadence frame callback into a [`FrameBuffer`]
//! and owns the per-instance buffer horizon. One consumer thread calls
//! [`read`](AudioReadStream::read) at its own pace and format.

use std::sync::Arc;

use crate::audio::buffer::{FrameBuffer, FrameQueue};
use crate::config::AudioStreamConfig;
use crate::engine::source::{CallbackId, PushAudioSource};

/// High-level interface for consuming an engine audio stream.
///
/// The frame callback is registered once for the lifetime of the stream and
/// unregistered on drop. Stopping the push source before the stream is
/// dropped is the source's callback-cancellation contract; the adapter relies
/// on it rather than enforcing it.
pub struct AudioReadStream {
    source: Arc<dyn PushAudioSource>,
    callback_id: CallbackId,
    buffer: FrameBuffer,
}

impl AudioReadStream {
    /// Create a stream buffering `config.buffer_ms` milliseconds of audio.
    pub fn new(source: Arc<dyn PushAudioSource>, config: &AudioStreamConfig) -> Self {
        let buffer = FrameBuffer::new(config.effective_buffer_ms(), config.filler.clone());
        let queue = buffer.queue();
        let callback_id =
            source.register_frame_callback(Arc::new(move |frame| queue.push(frame)));
        Self {
            source,
            callback_id,
            buffer,
        }
    }

    /// Fill `out` with samples at the given rate and channel count.
    ///
    /// If the internal buffer overruns, the oldest audio is dropped; if it is
    /// exhausted, the remainder is padded with the configured filler. The
    /// entire slice is always filled.
    pub fn read(&mut self, sample_rate: u32, channels: u32, out: &mut [f32]) {
        self.buffer.read(sample_rate, channels, out);
    }

    /// Producer-side queue, exposed for inspection
    pub fn queue(&self) -> Arc<FrameQueue> {
        self.buffer.queue()
    }
}

impl Drop for AudioReadStream {
    fn drop(&mut self) {
        self.source.unregister_frame_callback(self.callback_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::frame::AudioFrame;
    use crate::engine::source::FrameCallback;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[derive(Default)]
    struct MockSource {
        callbacks: Mutex<HashMap<u64, FrameCallback>>,
        next_id: AtomicU64,
    }

    impl MockSource {
        fn deliver(&self, frame: AudioFrame) {
            for callback in self.callbacks.lock().values() {
                callback(frame.clone());
            }
        }

        fn callback_count(&self) -> usize {
            self.callbacks.lock().len()
        }
    }

    impl PushAudioSource for MockSource {
        fn register_frame_callback(&self, callback: FrameCallback) -> CallbackId {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.callbacks.lock().insert(id, callback);
            CallbackId(id)
        }

        fn unregister_frame_callback(&self, id: CallbackId) {
            self.callbacks.lock().remove(&id.0);
        }
    }

    #[test]
    fn test_pushed_frames_reach_the_reader() {
        let source = Arc::new(MockSource::default());
        let mut stream = AudioReadStream::new(source.clone(), &AudioStreamConfig::default());
        assert_eq!(source.callback_count(), 1);

        source.deliver(AudioFrame::from_f32(&[0.5f32; 480], 48000, 1));
        let mut out = vec![f32::NAN; 480];
        stream.read(48000, 1, &mut out);
        assert!(out.iter().all(|&s| (s - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_drop_unregisters_the_callback() {
        let source = Arc::new(MockSource::default());
        let stream = AudioReadStream::new(source.clone(), &AudioStreamConfig::default());
        assert_eq!(source.callback_count(), 1);
        drop(stream);
        assert_eq!(source.callback_count(), 0);
    }

    #[test]
    fn test_two_streams_buffer_independently() {
        let source = Arc::new(MockSource::default());
        let config = AudioStreamConfig::default();
        let mut a = AudioReadStream::new(source.clone(), &config);
        let mut b = AudioReadStream::new(source.clone(), &config);

        source.deliver(AudioFrame::from_f32(&[0.25f32; 480], 48000, 1));

        let mut out = vec![0.0f32; 480];
        a.read(48000, 1, &mut out);
        assert!((out[0] - 0.25).abs() < 1e-6);

        // The same frame was fanned out to b's own queue
        b.read(48000, 1, &mut out);
        assert!((out[0] - 0.25).abs() < 1e-6);
    }
}
