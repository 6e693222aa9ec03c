//! Background execution threads for the engine
//!
//! The engine requires three cooperating threads with fixed roles: network
//! I/O, worker (media processing), and signaling. They are created once as a
//! unit by the global factory and shared by every object built on top.

use crossbeam_channel::{unbounded, Sender};
use std::thread::{self, JoinHandle};

use crate::error::FactoryError;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// One named engine thread running a serial task loop.
///
/// Dropping the handle closes the task queue, drains the remaining tasks and
/// joins the thread.
pub struct EngineThread {
    name: &'static str,
    tx: Option<Sender<Task>>,
    handle: Option<JoinHandle<()>>,
}

impl EngineThread {
    fn spawn(name: &'static str) -> Result<Self, FactoryError> {
        let (tx, rx) = unbounded::<Task>();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                for task in rx {
                    task();
                }
                tracing::debug!(thread = name, "engine thread stopped");
            })
            .map_err(|e| {
                FactoryError::InitializationFailed(format!("failed to spawn {name}: {e}"))
            })?;

        Ok(Self {
            name,
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Queue a task for execution on this thread. Tasks run in dispatch
    /// order. Silently discarded if the thread is already shutting down.
    pub fn dispatch(&self, task: impl FnOnce() + Send + 'static) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(Box::new(task));
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for EngineThread {
    fn drop(&mut self) {
        // Closing the channel ends the task loop after the queue drains
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// The fixed trio of engine threads, created and destroyed as a unit.
pub struct EngineThreads {
    network: EngineThread,
    worker: EngineThread,
    signaling: EngineThread,
}

impl EngineThreads {
    /// Start all three threads. On any spawn failure the already-started
    /// threads are joined again before returning.
    pub fn start() -> Result<Self, FactoryError> {
        let network = EngineThread::spawn("rtc-network")?;
        let worker = EngineThread::spawn("rtc-worker")?;
        let signaling = EngineThread::spawn("rtc-signaling")?;
        tracing::debug!("engine threads started");
        Ok(Self {
            network,
            worker,
            signaling,
        })
    }

    pub fn network(&self) -> &EngineThread {
        &self.network
    }

    pub fn worker(&self) -> &EngineThread {
        &self.worker
    }

    pub fn signaling(&self) -> &EngineThread {
        &self.signaling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc};

    #[test]
    fn test_dispatch_runs_on_named_thread() {
        let threads = EngineThreads::start().unwrap();
        let (tx, rx) = mpsc::channel();
        threads.worker().dispatch(move || {
            let name = thread::current().name().map(String::from);
            tx.send(name).unwrap();
        });
        let name = rx.recv().unwrap();
        assert_eq!(name.as_deref(), Some("rtc-worker"));
    }

    #[test]
    fn test_tasks_run_in_dispatch_order() {
        let threads = EngineThreads::start().unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();
        for i in 0..64 {
            let counter = counter.clone();
            let tx = tx.clone();
            threads.signaling().dispatch(move || {
                let seen = counter.fetch_add(1, Ordering::SeqCst);
                tx.send((i, seen)).unwrap();
            });
        }
        for _ in 0..64 {
            let (i, seen) = rx.recv().unwrap();
            assert_eq!(i, seen);
        }
    }

    #[test]
    fn test_drop_drains_pending_tasks() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let threads = EngineThreads::start().unwrap();
            for _ in 0..100 {
                let counter = counter.clone();
                threads.network().dispatch(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
            // Drop joins after the queue drains
        }
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }
}
