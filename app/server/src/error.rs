//! Error types for the NWC server configuration

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} must not be empty")]
    Empty { key: &'static str },

    #[error("{key} is not a valid URL: {reason}")]
    InvalidUrl { key: &'static str, reason: String },

    #[error("{key} is not a {expected}-char hex string")]
    InvalidHex { key: &'static str, expected: usize },

    #[error("Invalid JWT public key: {0}")]
    InvalidPem(String),

    #[error("Invalid relay address: {0}")]
    InvalidRelay(String),

    #[error("Invalid Nostr key: {0}")]
    InvalidKey(String),

    #[error("Invalid command list: {0}")]
    InvalidCommands(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
