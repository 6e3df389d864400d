//! Error types for the dining monitor.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A monitor needs at least one actor
    #[error("a monitor needs at least one actor")]
    NoActors,

    /// Invalid driver configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Signal handler registration failed
    #[error("signal error: {0}")]
    Signal(#[from] std::io::Error),

    /// A philosopher thread panicked instead of finishing its run
    #[error("philosopher {0} panicked")]
    ActorPanicked(usize),
}

/// Result type alias for the dining monitor.
pub type Result<T> = std::result::Result<T, Error>;
