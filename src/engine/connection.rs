//! Connection capability interface
//!
//! One capability trait covers what the shim needs from an engine
//! connection: naming, signaling callbacks, offer/answer, and close. The
//! engine backend provides the single concrete implementation in this scope;
//! platform-specific backends are additional implementations of the same
//! trait.

use std::sync::Arc;

use crate::error::ConnectionError;

/// Kind of an SDP message exchanged during negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
}

/// One ICE candidate ready to be sent to, or received from, the remote peer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IceCandidate {
    pub sdp_mid: String,
    pub sdp_mline_index: i32,
    pub candidate: String,
}

/// Fired when a local SDP message is ready for the signaling solution
pub type SdpCallback = Arc<dyn Fn(SdpKind, &str) + Send + Sync>;

/// Fired when a local ICE candidate is ready for the signaling solution
pub type IceCandidateCallback = Arc<dyn Fn(&IceCandidate) + Send + Sync>;

/// Fired once the connection handshake has completed
pub type ConnectedCallback = Arc<dyn Fn() + Send + Sync>;

/// Capabilities of an engine connection.
///
/// All methods are callable from any thread; the backend dispatches onto its
/// signaling thread internally.
pub trait Connection: Send + Sync {
    fn set_name(&self, name: &str);

    fn name(&self) -> String;

    fn register_local_sdp_callback(&self, callback: SdpCallback);

    fn register_ice_candidate_callback(&self, callback: IceCandidateCallback);

    fn register_connected_callback(&self, callback: ConnectedCallback);

    /// Start an SDP offer; the result arrives through the SDP callback.
    /// Returns `false` if the offer could not be initiated.
    fn create_offer(&self) -> bool;

    /// Answer a previously received offer; the result arrives through the
    /// SDP callback.
    fn create_answer(&self) -> bool;

    fn add_ice_candidate(&self, candidate: &IceCandidate) -> bool;

    fn set_remote_description(&self, kind: SdpKind, sdp: &str) -> Result<(), ConnectionError>;

    /// Close the connection. Idempotent; a closed connection cannot be
    /// reopened.
    fn close(&self);

    fn is_closed(&self) -> bool;
}
