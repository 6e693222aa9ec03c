//! Engine lifecycle runtime

pub mod global_factory;
pub mod registry;
pub mod threads;

pub use global_factory::GlobalFactory;
pub use registry::{ObjectKind, TrackedObject};
pub use threads::{EngineThread, EngineThreads};
