//! UMA NWC Server Library
//!
//! Startup configuration for a Nostr Wallet Connect app paired with a UMA VASP.

pub mod commands;
pub mod config;
pub mod error;
pub mod identity;
pub mod jwt_key;
pub mod relays;

pub use commands::{CommandError, NwcCommand, SupportedCommands};
pub use config::NwcConfig;
pub use error::{ConfigError, ConfigResult};
