//! Non-owning registry of long-lived objects built against the engine
//!
//! The registry only observes lifetimes: objects register at construction and
//! unregister at destruction, and the global factory uses the emptiness of
//! the set to decide when engine teardown is safe. Bookkeeping here is
//! best-effort diagnostics plus lifetime gating, never correctness-critical
//! data, so registration problems are logged and discarded rather than
//! surfaced to the object being constructed.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// Kind tag recorded for each tracked object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ObjectKind {
    ConnectionHandle,
    LocalMediaTrack,
    ExternalMediaSource,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::ConnectionHandle => "ConnectionHandle",
            ObjectKind::LocalMediaTrack => "LocalMediaTrack",
            ObjectKind::ExternalMediaSource => "ExternalMediaSource",
        };
        f.write_str(name)
    }
}

/// Implemented by every object whose lifetime gates engine teardown
pub trait TrackedObject: Send + Sync {
    /// Short name used in leak diagnostics
    fn debug_name(&self) -> String;
}

/// Compute the registry identity of a tracked object: the address of the
/// shared allocation, stable for the lifetime of the `Arc`.
pub fn object_address(object: &Arc<dyn TrackedObject>) -> usize {
    Arc::as_ptr(object) as *const () as usize
}

struct ObjectEntry {
    kind: ObjectKind,
    name: String,
    object: Weak<dyn TrackedObject>,
}

/// Map from object address to kind tag. Not internally synchronized; always
/// manipulated under the global factory mutex.
#[derive(Default)]
pub(crate) struct ObjectRegistry {
    alive: BTreeMap<usize, ObjectEntry>,
}

impl ObjectRegistry {
    /// Record an object. Best-effort: a duplicate registration is logged and
    /// ignored, never an error for the constructing caller.
    pub fn insert(&mut self, kind: ObjectKind, object: &Arc<dyn TrackedObject>) {
        match self.alive.entry(object_address(object)) {
            Entry::Vacant(entry) => {
                entry.insert(ObjectEntry {
                    kind,
                    name: object.debug_name(),
                    object: Arc::downgrade(object),
                });
            }
            Entry::Occupied(_) => {
                tracing::debug!(%kind, "object already registered, ignoring");
            }
        }
    }

    /// Remove an object by address. Returns `true` when this removal emptied
    /// the set.
    ///
    /// Panics if the recorded kind differs from `kind`: that indicates a
    /// stale or aliased handle and the process state can no longer be
    /// trusted.
    pub fn remove(&mut self, kind: ObjectKind, address: usize) -> bool {
        if let Some(entry) = self.alive.get(&address) {
            assert_eq!(
                entry.kind, kind,
                "tracked object kind mismatch: registered as {}, unregistered as {}",
                entry.kind, kind
            );
            self.alive.remove(&address);
            return self.alive.is_empty();
        }
        false
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    pub fn len(&self) -> usize {
        self.alive.len()
    }

    /// Log every object still alive, with its kind, debug name and
    /// approximate outstanding reference count.
    pub fn report_leaks(&self) {
        for entry in self.alive.values() {
            tracing::error!(
                "- ({}) {} [{} ref(s)]",
                entry.kind,
                entry.name,
                entry.object.strong_count()
            );
        }
    }
}
