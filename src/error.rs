//! Error types for the interop shim

use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("Factory error: {0}")]
    Factory(#[from] FactoryError),

    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lifecycle errors from the global factory
///
/// Both variants are recoverable: the factory stays uninitialized and a later
/// acquisition attempt is allowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// The engine's blocking setup must not run on the calling thread
    /// (typically a UI/dispatcher thread the setup call needs exclusive
    /// access to). Retry from a different thread.
    #[error("factory initialization is forbidden on the calling thread")]
    WrongThread,

    /// Thread bring-up or the engine factory construction failed
    #[error("engine factory initialization failed: {0}")]
    InitializationFailed(String),
}

/// Errors from the connection façade
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Connection creation failed: {0}")]
    CreateFailed(String),

    #[error("Connection is closed")]
    Closed,

    #[error("Negotiation failed: {0}")]
    NegotiationFailed(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;
