//! Trait boundaries for the wrapped engine
//!
//! Everything protocol-level (ICE/DTLS/SRTP, codec negotiation, device
//! probing) lives behind these traits; the shim feeds the engine threads and
//! lifetime, nothing more.

pub mod connection;
pub mod factory;
pub mod source;

pub use connection::{Connection, ConnectedCallback, IceCandidate, IceCandidateCallback, SdpCallback, SdpKind};
pub use factory::{ConnectionConfig, ConnectionFactory, FactoryBuilder};
pub use source::{CallbackId, FrameCallback, PushAudioSource};
