//! # RTC Interop Shim
//!
//! Object-lifetime-safe, thread-safe handles over a third-party real-time
//! communication engine.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Managed caller                           │
//! │   PeerConnection handles          AudioReadStream consumers     │
//! └────────────┬────────────────────────────────┬───────────────────┘
//!              │ create / drop                  │ read(rate, ch, out)
//!              ▼                                ▼
//! ┌──────────────────────────┐      ┌──────────────────────────────┐
//! │ GlobalFactory            │      │ FrameBuffer                  │
//! │  ┌────────────────────┐  │      │  ┌────────────┐ ┌─────────┐  │
//! │  │ ObjectRegistry     │  │      │  │ FrameQueue │ │ Resample│  │
//! │  │ (alive set, kinds) │  │      │  │ (FIFO +    │ │ cursor +│  │
//! │  └────────────────────┘  │      │  │  overrun   │ │ filler  │  │
//! │  ┌────────────────────┐  │      │  │  trimming) │ │         │  │
//! │  │ EngineThreads      │  │      │  └─────▲──────┘ └─────────┘  │
//! │  │ network / worker / │  │      │        │ push (10 ms cadence)│
//! │  │ signaling          │  │      └────────┼─────────────────────┘
//! │  └────────────────────┘  │               │
//! │  ConnectionFactory handle│      ┌────────┴─────────────────────┐
//! └────────────┬─────────────┘      │ PushAudioSource (engine)     │
//!              │ build (once)       └──────────────────────────────┘
//!              ▼
//! ┌──────────────────────────┐
//! │ Engine backend           │
//! │ (FactoryBuilder trait)   │
//! └──────────────────────────┘
//! ```
//!
//! The engine threads and connection factory come up lazily on the first
//! acquisition and go down exactly once, when the last tracked object is
//! dropped. The audio path converts the engine's push-style 10 ms frame
//! callback into a pull API at any rate and channel count, absorbing
//! underrun with filler and overrun by dropping the oldest audio.

pub mod audio;
pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod logging;
pub mod runtime;

pub use error::{Error, Result};

/// Crate-wide constants
pub mod constants {
    /// Cadence at which the engine delivers audio frames, in milliseconds
    pub const ENGINE_FRAME_MS: u32 = 10;

    /// Default sample rate for audio processing
    pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

    /// Default channel count (stereo)
    pub const DEFAULT_CHANNELS: u32 = 2;

    /// Automatic buffer horizon, in engine slices, when `buffer_ms` is `-1`
    pub const AUTO_BUFFER_SLICES: u32 = 3;
}
