//! Push-style audio source boundary
//!
//! The engine delivers decoded audio through a callback at a fixed 10 ms
//! cadence on a thread the shim does not control. The shim registers exactly
//! one callback per read stream for the stream's lifetime.

use std::sync::Arc;

use crate::audio::frame::AudioFrame;

/// Callback invoked with each delivered frame
pub type FrameCallback = Arc<dyn Fn(AudioFrame) + Send + Sync>;

/// Identifies one registered callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(pub u64);

/// A source of fixed-cadence audio frames.
///
/// Unregistration must be safe while a callback is in flight; that guarantee
/// is part of this contract and relied on by the read stream's teardown.
pub trait PushAudioSource: Send + Sync {
    fn register_frame_callback(&self, callback: FrameCallback) -> CallbackId;

    fn unregister_frame_callback(&self, id: CallbackId);
}
