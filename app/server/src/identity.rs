//! Nostr identity
//!
//! The keypair the NWC app signs relay messages with.

use nostr::prelude::*;

use crate::error::{ConfigError, ConfigResult};

/// Signing identity derived from the configured private key
pub struct NostrIdentity {
    keys: Keys,
}

impl NostrIdentity {
    /// Build from a hex-encoded secret key
    pub fn from_hex(secret_key_hex: &str) -> ConfigResult<Self> {
        let secret_key = SecretKey::from_hex(secret_key_hex)
            .map_err(|e| ConfigError::InvalidKey(e.to_string()))?;

        Ok(Self {
            keys: Keys::new(secret_key),
        })
    }

    /// Fresh random identity, used for the example Nostr key
    pub fn generate() -> Self {
        Self {
            keys: Keys::generate(),
        }
    }

    /// Keys used to sign relay events
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    /// Get the public key as hex string
    pub fn public_key_hex(&self) -> String {
        self.keys.public_key().to_hex()
    }

    /// Get the secret key as hex string
    pub fn secret_key_hex(&self) -> String {
        self.keys.secret_key().to_secret_hex()
    }
}
