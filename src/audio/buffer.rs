//! Frame buffering and resampling between the engine's push cadence and an
//! arbitrary-rate pull consumer
//!
//! The engine delivers fixed 10 ms slices on its own thread; the consumer
//! reads arbitrary block sizes at its own pace and format. [`FrameQueue`] is
//! the shared producer-side FIFO, [`FrameBuffer`] the single-consumer side
//! that resamples on demand and always fills the caller's slice.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::audio::frame::AudioFrame;
use crate::config::FillerConfig;

/// Shared FIFO of raw engine frames.
///
/// `push` is called from the engine's callback thread and never blocks beyond
/// the narrow lock. When the queued audio exceeds the configured horizon the
/// oldest frames are dropped, trading fidelity for bounded memory and bounded
/// staleness.
pub struct FrameQueue {
    inner: Mutex<QueueInner>,
    horizon_ms: u32,
}

#[derive(Default)]
struct QueueInner {
    frames: VecDeque<AudioFrame>,
    queued_ms: f64,
    dropped: u64,
}

impl FrameQueue {
    pub fn new(horizon_ms: u32) -> Self {
        Self {
            inner: Mutex::new(QueueInner::default()),
            horizon_ms,
        }
    }

    /// Append a frame, trimming the oldest entries past the horizon.
    pub fn push(&self, frame: AudioFrame) {
        let duration = frame.duration_ms();
        let mut inner = self.inner.lock();
        inner.frames.push_back(frame);
        inner.queued_ms += duration;
        while inner.queued_ms > self.horizon_ms as f64 + 1e-6 && inner.frames.len() > 1 {
            if let Some(old) = inner.frames.pop_front() {
                inner.queued_ms -= old.duration_ms();
                inner.dropped += 1;
            }
        }
        if inner.dropped > 0 && inner.dropped % 100 == 0 {
            tracing::trace!(
                dropped = inner.dropped,
                "frame queue overrun, oldest frames dropped"
            );
        }
    }

    /// Take the oldest frame, if any.
    pub fn pop(&self) -> Option<AudioFrame> {
        let mut inner = self.inner.lock();
        let frame = inner.frames.pop_front()?;
        inner.queued_ms = if inner.frames.is_empty() {
            0.0
        } else {
            inner.queued_ms - frame.duration_ms()
        };
        Some(frame)
    }

    /// Milliseconds of audio currently queued
    pub fn queued_ms(&self) -> f64 {
        self.inner.lock().queued_ms
    }

    /// Number of frames currently queued
    pub fn len(&self) -> usize {
        self.inner.lock().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total frames dropped by the overrun policy
    pub fn dropped_frames(&self) -> u64 {
        self.inner.lock().dropped
    }
}

/// Working buffer of already-resampled samples at the consumer's format.
///
/// Owned by the single reading thread, so no synchronization.
struct ResampleCursor {
    samples: Vec<f32>,
    used: usize,
    rate: u32,
    channels: u32,
}

impl ResampleCursor {
    fn new() -> Self {
        Self {
            samples: Vec::new(),
            used: 0,
            rate: 0,
            channels: 0,
        }
    }

    /// Reset the working buffer if the consumer changed format.
    fn prepare(&mut self, rate: u32, channels: u32) {
        if self.rate != rate || self.channels != channels {
            self.samples.clear();
            self.used = 0;
            self.rate = rate;
            self.channels = channels;
        }
    }

    fn available(&self) -> usize {
        self.samples.len() - self.used
    }

    /// Copy up to `dst.len()` unread samples, returning how many were taken.
    fn read_some(&mut self, dst: &mut [f32]) -> usize {
        let take = self.available().min(dst.len());
        dst[..take].copy_from_slice(&self.samples[self.used..self.used + take]);
        self.used += take;
        take
    }

    /// Convert one raw frame to the cursor's format and append it.
    fn append_frame(&mut self, frame: &AudioFrame) {
        // Reclaim the consumed prefix before growing
        if self.used > 0 {
            self.samples.drain(..self.used);
            self.used = 0;
        }

        let decoded = frame.decode();
        let converted = convert_channels(&decoded, frame.channels, self.channels);

        if frame.sample_rate == self.rate {
            self.samples.extend_from_slice(&converted);
        } else {
            resample_linear(
                &converted,
                self.channels,
                frame.sample_rate,
                self.rate,
                &mut self.samples,
            );
        }
    }
}

/// Convert interleaved samples between channel layouts.
///
/// Mono fans out to every output channel; multi-channel input collapses to a
/// mono mix first when the layouts differ.
fn convert_channels(samples: &[f32], src_channels: u32, dst_channels: u32) -> Vec<f32> {
    let src = src_channels.max(1) as usize;
    let dst = dst_channels.max(1) as usize;
    if src == dst {
        return samples.to_vec();
    }

    let frames = samples.len() / src;
    let mut out = Vec::with_capacity(frames * dst);
    for i in 0..frames {
        let value = if src == 1 {
            samples[i]
        } else {
            samples[i * src..(i + 1) * src].iter().sum::<f32>() / src as f32
        };
        for _ in 0..dst {
            out.push(value);
        }
    }
    out
}

/// Linear-interpolation rate conversion, appended to `out`.
fn resample_linear(
    samples: &[f32],
    channels: u32,
    src_rate: u32,
    dst_rate: u32,
    out: &mut Vec<f32>,
) {
    let ch = channels.max(1) as usize;
    let src_frames = samples.len() / ch;
    if src_frames == 0 || src_rate == 0 || dst_rate == 0 {
        return;
    }

    let dst_frames = (src_frames as u64 * dst_rate as u64 / src_rate as u64) as usize;
    let step = src_rate as f64 / dst_rate as f64;
    out.reserve(dst_frames * ch);
    for i in 0..dst_frames {
        let pos = i as f64 * step;
        let i0 = pos as usize;
        let i1 = (i0 + 1).min(src_frames - 1);
        let frac = (pos - i0 as f64) as f32;
        for c in 0..ch {
            let a = samples[i0 * ch + c];
            let b = samples[i1 * ch + c];
            out.push(a + (b - a) * frac);
        }
    }
}

/// Deterministic underrun filler with persistent phase
struct Filler {
    config: FillerConfig,
    phase: u64,
}

impl Filler {
    fn new(config: FillerConfig) -> Self {
        Self { config, phase: 0 }
    }

    fn fill(&mut self, rate: u32, channels: u32, out: &mut [f32]) {
        match self.config {
            FillerConfig::Silence => out.fill(0.0),
            FillerConfig::Comfort {
                frequency_hz,
                amplitude,
            } => {
                let ch = channels.max(1) as usize;
                let rate = rate.max(1) as f64;
                for (i, sample) in out.iter_mut().enumerate() {
                    let t = (self.phase + (i / ch) as u64) as f64 / rate;
                    *sample = (amplitude as f64
                        * (2.0 * std::f64::consts::PI * frequency_hz as f64 * t).sin())
                        as f32;
                }
                self.phase += out.len().div_ceil(ch) as u64;
            }
        }
    }
}

/// Consumer side of the stream adapter: drains a [`FrameQueue`] on demand,
/// resampling to whatever rate and channel count the caller asks for.
pub struct FrameBuffer {
    queue: Arc<FrameQueue>,
    cursor: ResampleCursor,
    filler: Filler,
}

impl FrameBuffer {
    pub fn new(horizon_ms: u32, filler: FillerConfig) -> Self {
        Self {
            queue: Arc::new(FrameQueue::new(horizon_ms)),
            cursor: ResampleCursor::new(),
            filler: Filler::new(filler),
        }
    }

    /// Producer-side handle for the push callback.
    pub fn queue(&self) -> Arc<FrameQueue> {
        self.queue.clone()
    }

    /// Fill `out` completely with samples at the requested format.
    ///
    /// Drains the working buffer first, pulling and resampling queued raw
    /// frames oldest-first as needed. If the queue runs dry the remainder is
    /// padded with the configured filler; the caller never observes a short
    /// or uninitialized read.
    pub fn read(&mut self, target_rate: u32, target_channels: u32, out: &mut [f32]) {
        self.cursor.prepare(target_rate.max(1), target_channels.max(1));

        let mut filled = self.cursor.read_some(out);
        while filled < out.len() {
            match self.queue.pop() {
                Some(frame) => {
                    self.cursor.append_frame(&frame);
                    filled += self.cursor.read_some(&mut out[filled..]);
                }
                None => {
                    self.filler
                        .fill(target_rate, target_channels, &mut out[filled..]);
                    filled = out.len();
                }
            }
        }
    }
}
