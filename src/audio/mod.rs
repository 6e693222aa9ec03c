//! Audio subsystem module

pub mod buffer;
pub mod frame;
pub mod read_stream;

pub use buffer::{FrameBuffer, FrameQueue};
pub use frame::AudioFrame;
pub use read_stream::AudioReadStream;
