//! Global engine lifecycle manager
//!
//! Single point of truth for "is the engine ready". Lazily brings up the
//! execution threads and the connection factory on first acquisition, tracks
//! every long-lived object built against them, and tears both down exactly
//! once, when the last tracked object goes away. All transitions are
//! serialized by one mutex; the only blocking work under it is the one-time
//! thread bring-up or tear-down, paid once per lifecycle, not per call.

use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};

use crate::engine::factory::{ConnectionFactory, FactoryBuilder};
use crate::error::FactoryError;
use crate::runtime::registry::{object_address, ObjectKind, ObjectRegistry, TrackedObject};
use crate::runtime::threads::EngineThreads;

/// Factory handle and threads are created and destroyed as a unit:
/// both `Some` (Ready) or both `None` (Uninitialized).
#[derive(Default)]
struct State {
    factory: Option<Arc<dyn ConnectionFactory>>,
    threads: Option<EngineThreads>,
    registry: ObjectRegistry,
}

/// Lifecycle manager with ownership-counted shutdown.
///
/// Reinitialization after a full drain is supported: once the alive set
/// empties and teardown runs, the next [`acquire`](Self::acquire) builds a
/// fresh thread pool and factory.
pub struct GlobalFactory {
    builder: Box<dyn FactoryBuilder>,
    state: Mutex<State>,
}

impl GlobalFactory {
    pub fn new(builder: Box<dyn FactoryBuilder>) -> Self {
        Self {
            builder,
            state: Mutex::new(State::default()),
        }
    }

    /// Get the shared connection factory, creating the thread pool and the
    /// factory if not already created.
    ///
    /// Safe to call concurrently: exactly one caller initializes, the rest
    /// observe the result under the same mutex.
    pub fn acquire(&self) -> Result<Arc<dyn ConnectionFactory>, FactoryError> {
        let mut state = self.state.lock();
        if let Some(factory) = &state.factory {
            return Ok(factory.clone());
        }
        self.initialize(&mut state)
    }

    fn initialize(&self, state: &mut State) -> Result<Arc<dyn ConnectionFactory>, FactoryError> {
        if self.builder.current_thread_forbidden() {
            return Err(FactoryError::WrongThread);
        }

        let threads = EngineThreads::start()?;
        let factory = match self.builder.build(&threads) {
            Some(factory) => factory,
            None => {
                // Threads are joined again right here; state stays Uninitialized
                tracing::error!("engine factory builder returned no factory");
                return Err(FactoryError::InitializationFailed(
                    "engine factory builder returned no factory".into(),
                ));
            }
        };

        state.threads = Some(threads);
        state.factory = Some(factory.clone());
        tracing::info!("engine factory initialized");
        Ok(factory)
    }

    /// Get the connection factory only if it already exists. Never
    /// initializes, never blocks on initialization.
    pub fn existing(&self) -> Option<Arc<dyn ConnectionFactory>> {
        self.state.lock().factory.clone()
    }

    /// Whether the factory and threads are currently up
    pub fn is_ready(&self) -> bool {
        self.state.lock().factory.is_some()
    }

    /// Record a long-lived object whose presence keeps the engine alive.
    /// Best-effort: never fails the constructing caller.
    pub fn register_object(&self, kind: ObjectKind, object: &Arc<dyn TrackedObject>) {
        self.state.lock().registry.insert(kind, object);
    }

    /// Remove a tracked object. If this empties the alive set the factory
    /// and threads are torn down synchronously, still under the lock, so no
    /// concurrent acquisition can slip in between.
    pub fn unregister_object(&self, kind: ObjectKind, object: &Arc<dyn TrackedObject>) {
        self.unregister_address(kind, object_address(object));
    }

    /// Identity-based variant of [`unregister_object`](Self::unregister_object)
    /// for use from `Drop` implementations, where the owning `Arc` is no
    /// longer reachable.
    pub fn unregister_address(&self, kind: ObjectKind, address: usize) {
        let mut state = self.state.lock();
        if state.registry.remove(kind, address) {
            tracing::debug!("last tracked object removed, shutting down engine");
            Self::shutdown_locked(&mut state);
        }
    }

    /// Number of currently tracked objects
    pub fn alive_object_count(&self) -> usize {
        self.state.lock().registry.len()
    }

    /// Run a task on the engine worker thread. Returns `false` when the
    /// engine is not initialized.
    pub fn dispatch_to_worker(&self, task: impl FnOnce() + Send + 'static) -> bool {
        let state = self.state.lock();
        match &state.threads {
            Some(threads) => {
                threads.worker().dispatch(task);
                true
            }
            None => false,
        }
    }

    fn shutdown_locked(state: &mut State) {
        state.factory = None;
        // Joins the three threads
        state.threads = None;
    }

    /// Install the process-wide instance. The first call wins; later calls
    /// return the already-installed instance.
    pub fn install(builder: Box<dyn FactoryBuilder>) -> Arc<GlobalFactory> {
        process_instance()
            .get_or_init(|| Arc::new(GlobalFactory::new(builder)))
            .clone()
    }

    /// The process-wide instance, if one has been installed
    pub fn instance() -> Option<Arc<GlobalFactory>> {
        process_instance().get().cloned()
    }
}

fn process_instance() -> &'static OnceLock<Arc<GlobalFactory>> {
    static INSTANCE: OnceLock<Arc<GlobalFactory>> = OnceLock::new();
    &INSTANCE
}

impl Drop for GlobalFactory {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if !state.registry.is_empty() {
            // Tracked objects dispatch their own teardown onto the engine
            // threads, and those are about to stop; finishing their teardown
            // later will deadlock. Diagnose loudly but proceed anyway, since
            // waiting here would deadlock just the same.
            tracing::error!(
                "shutting down the global factory while {} objects are still alive; \
                 this will likely deadlock",
                state.registry.len()
            );
            state.registry.report_leaks();
        }
        Self::shutdown_locked(&mut state);
    }
}
