//! Engine factory boundary
//!
//! The connection factory is the shared object the engine requires to build
//! connections and tracks: expensive to create, cheap to share. How it is
//! constructed is entirely the engine backend's business; the shim only
//! provides the execution threads and treats a `None` result as an
//! initialization failure.

use std::sync::Arc;

use crate::engine::connection::Connection;
use crate::error::ConnectionError;
use crate::runtime::threads::EngineThreads;

/// Builds the engine's connection factory on top of the execution threads.
///
/// Implemented once per engine backend and handed to the global factory,
/// which invokes `build` exactly once per lifecycle.
pub trait FactoryBuilder: Send + Sync {
    /// Platform precondition check: some backends deadlock if their blocking
    /// setup runs on a UI/dispatcher thread. Returning `true` makes the
    /// acquisition fail with `WrongThread` before any thread is started.
    fn current_thread_forbidden(&self) -> bool {
        false
    }

    /// Construct the factory. `None` means construction failed; the global
    /// factory stays uninitialized and a later retry is allowed.
    fn build(&self, threads: &EngineThreads) -> Option<Arc<dyn ConnectionFactory>>;
}

/// Shared handle to the engine's connection factory
pub trait ConnectionFactory: Send + Sync {
    fn create_connection(
        &self,
        config: &ConnectionConfig,
    ) -> Result<Arc<dyn Connection>, ConnectionError>;
}

/// Parameters for a new connection
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfig {
    /// Name reported in diagnostics
    pub name: String,
    /// ICE server URIs handed through to the engine
    pub ice_servers: Vec<String>,
}
