//! Peer connection façade
//!
//! Thin wrapper over the engine connection that ties it into the lifecycle
//! manager: the handle registers itself on creation and unregisters on drop,
//! so the engine threads stay up for as long as any connection exists.

use std::sync::Arc;

use crate::engine::connection::{
    ConnectedCallback, Connection, IceCandidate, IceCandidateCallback, SdpCallback, SdpKind,
};
use crate::engine::factory::ConnectionConfig;
use crate::error::{ConnectionError, Result};
use crate::runtime::global_factory::GlobalFactory;
use crate::runtime::registry::{ObjectKind, TrackedObject};

/// Shared handle to one peer connection.
///
/// Acquiring the connection factory, and thereby bringing up the engine
/// threads, happens lazily on the first creation.
pub struct PeerConnection {
    global: Arc<GlobalFactory>,
    inner: Arc<dyn Connection>,
}

impl PeerConnection {
    /// Create a connection against the given lifecycle manager.
    pub fn create(global: &Arc<GlobalFactory>, config: &ConnectionConfig) -> Result<Arc<Self>> {
        let factory = global.acquire()?;
        let inner = factory.create_connection(config)?;
        if !config.name.is_empty() {
            inner.set_name(&config.name);
        }

        let connection = Arc::new(Self {
            global: global.clone(),
            inner,
        });
        let tracked: Arc<dyn TrackedObject> = connection.clone();
        global.register_object(ObjectKind::ConnectionHandle, &tracked);
        Ok(connection)
    }

    pub fn set_name(&self, name: &str) {
        self.inner.set_name(name);
    }

    pub fn register_local_sdp_callback(&self, callback: SdpCallback) {
        self.inner.register_local_sdp_callback(callback);
    }

    pub fn register_ice_candidate_callback(&self, callback: IceCandidateCallback) {
        self.inner.register_ice_candidate_callback(callback);
    }

    pub fn register_connected_callback(&self, callback: ConnectedCallback) {
        self.inner.register_connected_callback(callback);
    }

    pub fn create_offer(&self) -> bool {
        self.inner.create_offer()
    }

    pub fn create_answer(&self) -> bool {
        self.inner.create_answer()
    }

    pub fn add_ice_candidate(&self, candidate: &IceCandidate) -> bool {
        self.inner.add_ice_candidate(candidate)
    }

    pub fn set_remote_description(
        &self,
        kind: SdpKind,
        sdp: &str,
    ) -> std::result::Result<(), ConnectionError> {
        self.inner.set_remote_description(kind, sdp)
    }

    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

impl TrackedObject for PeerConnection {
    fn debug_name(&self) -> String {
        self.inner.name()
    }
}

impl Drop for PeerConnection {
    fn drop(&mut self) {
        self.inner.close();
        let address = self as *const Self as *const () as usize;
        self.global
            .unregister_address(ObjectKind::ConnectionHandle, address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::factory::{ConnectionFactory, FactoryBuilder};
    use crate::runtime::threads::EngineThreads;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockConnection {
        name: Mutex<String>,
        closed: AtomicBool,
        offers: AtomicUsize,
    }

    impl Connection for MockConnection {
        fn set_name(&self, name: &str) {
            *self.name.lock() = name.to_string();
        }

        fn name(&self) -> String {
            self.name.lock().clone()
        }

        fn register_local_sdp_callback(&self, _callback: SdpCallback) {}

        fn register_ice_candidate_callback(&self, _callback: IceCandidateCallback) {}

        fn register_connected_callback(&self, _callback: ConnectedCallback) {}

        fn create_offer(&self) -> bool {
            self.offers.fetch_add(1, Ordering::SeqCst);
            true
        }

        fn create_answer(&self) -> bool {
            true
        }

        fn add_ice_candidate(&self, _candidate: &IceCandidate) -> bool {
            true
        }

        fn set_remote_description(
            &self,
            _kind: SdpKind,
            _sdp: &str,
        ) -> std::result::Result<(), ConnectionError> {
            Ok(())
        }

        fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }

        fn is_closed(&self) -> bool {
            self.closed.load(Ordering::SeqCst)
        }
    }

    struct MockFactory;

    impl ConnectionFactory for MockFactory {
        fn create_connection(
            &self,
            _config: &ConnectionConfig,
        ) -> std::result::Result<Arc<dyn Connection>, ConnectionError> {
            Ok(Arc::new(MockConnection::default()))
        }
    }

    struct MockBuilder;

    impl FactoryBuilder for MockBuilder {
        fn build(&self, _threads: &EngineThreads) -> Option<Arc<dyn ConnectionFactory>> {
            Some(Arc::new(MockFactory))
        }
    }

    fn global() -> Arc<GlobalFactory> {
        Arc::new(GlobalFactory::new(Box::new(MockBuilder)))
    }

    #[test]
    fn test_create_brings_up_engine_and_registers() {
        let global = global();
        assert!(!global.is_ready());

        let config = ConnectionConfig {
            name: "test-peer".into(),
            ..Default::default()
        };
        let connection = PeerConnection::create(&global, &config).unwrap();
        assert!(global.is_ready());
        assert_eq!(global.alive_object_count(), 1);
        assert_eq!(connection.debug_name(), "test-peer");
    }

    #[test]
    fn test_drop_unregisters_and_tears_down() {
        let global = global();
        let connection = PeerConnection::create(&global, &ConnectionConfig::default()).unwrap();
        assert!(global.is_ready());

        drop(connection);
        assert_eq!(global.alive_object_count(), 0);
        assert!(!global.is_ready(), "last handle must tear the engine down");
    }

    #[test]
    fn test_engine_survives_while_any_handle_lives() {
        let global = global();
        let first = PeerConnection::create(&global, &ConnectionConfig::default()).unwrap();
        let second = PeerConnection::create(&global, &ConnectionConfig::default()).unwrap();

        drop(first);
        assert!(global.is_ready());
        drop(second);
        assert!(!global.is_ready());
    }

    #[test]
    fn test_capability_delegation() {
        let global = global();
        let connection = PeerConnection::create(&global, &ConnectionConfig::default()).unwrap();

        assert!(connection.create_offer());
        assert!(connection.create_answer());
        assert!(!connection.is_closed());
        connection.close();
        assert!(connection.is_closed());

        connection.set_name("renamed");
        assert_eq!(connection.debug_name(), "renamed");
    }
}
