//! Error types for the natbridge crate.
//!
//! This module defines the custom error types used throughout the crate.
//! It uses the `thiserror` crate to derive error implementations and provides
//! convenient conversions from common error types.

use thiserror::Error;

/// Errors surfaced by the grammar lifecycle and payload dispatch.
#[derive(Error, Debug)]
pub enum Error {
    /// The host rejected a grammar call (load, activate or deregister)
    #[error("Grammar host error: {0}")]
    Grammar(String),

    /// The HTTP POST to the forwarding endpoint failed
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] reqwest::Error),

    /// The payload could not be serialized to JSON
    #[error("Payload serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The background sink worker could not be started
    #[error("Sink worker error: {0}")]
    Sink(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Grammar(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Sink(err.to_string())
    }
}
