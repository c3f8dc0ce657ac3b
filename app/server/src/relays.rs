//! Relay configuration
//!
//! The Nostr relay the NWC app connects to for wallet messaging.

use nostr::prelude::*;

use crate::error::{ConfigError, ConfigResult};

/// Default public relay used by the example deployment
pub const DEFAULT_RELAY: &str = "wss://relay.getalby.com/v1";

/// Check that a relay address is a usable websocket relay URL
pub fn validate_relay(relay: &str) -> ConfigResult<RelayUrl> {
    RelayUrl::parse(relay).map_err(|e| ConfigError::InvalidRelay(format!("{}: {}", relay, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_relay_is_valid() {
        let url = validate_relay(DEFAULT_RELAY).unwrap();
        assert!(url.as_str().starts_with("wss://relay.getalby.com"));
    }

    #[test]
    fn non_websocket_relay_is_rejected() {
        assert!(validate_relay("https://relay.getalby.com/v1").is_err());
        assert!(validate_relay("not a url").is_err());
    }
}
