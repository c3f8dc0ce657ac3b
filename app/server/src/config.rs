//! Configuration management
//!
//! Startup configuration for the NWC app paired with a UMA VASP. Every key
//! has an example default and can be overridden by an environment variable
//! of the same name.

use rand::RngCore;
use serde::Serialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

use crate::commands::SupportedCommands;
use crate::error::{ConfigError, ConfigResult};
use crate::identity::NostrIdentity;
use crate::jwt_key::JwtPublicKey;
use crate::relays;

pub const DATABASE_URI_SCHEME: &str = "sqlite+aiosqlite:///";
pub const INSTANCE_DIR: &str = "instance";
pub const DATABASE_FILENAME: &str = "nwc.sqlite";

/// Byte length of the generated session secret and Nostr key
pub const SECRET_BYTES: usize = 32;

/// Must match NWC_JWT_PUBKEY in the UMA VASP's own config.
pub const UMA_VASP_JWT_PUBKEY: &str = "-----BEGIN PUBLIC KEY-----\nMFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAEEVs/o5+uQbTjL3chynL4wXgUg2R9\nq9UU8I5mEovUf86QZ7kOBIjJwqnzD1omageEHWwHdBO6B+dFabmdT9POxg==\n-----END PUBLIC KEY-----";
pub const FRONTEND_BUILD_PATH: &str = "../static";
pub const UMA_VASP_LOGIN_URL: &str = "http://localhost:8000/login";
pub const UMA_VASP_TOKEN_EXCHANGE_URL: &str = "http://vasp.local/umanwc/token";
pub const VASP_UMA_API_BASE_URL: &str = "http://vasp.local/umanwc";
pub const VASP_NAME: &str = "Go Demo VASP";
pub const NWC_APP_ROOT_URL: &str = "http://localhost:8080";

/// Environment variable names, identical to the exported key names
pub mod keys {
    pub const DATABASE_URI: &str = "DATABASE_URI";
    pub const SECRET_KEY: &str = "SECRET_KEY";
    pub const UMA_VASP_JWT_PUBKEY: &str = "UMA_VASP_JWT_PUBKEY";
    pub const FRONTEND_BUILD_PATH: &str = "FRONTEND_BUILD_PATH";
    pub const UMA_VASP_LOGIN_URL: &str = "UMA_VASP_LOGIN_URL";
    pub const UMA_VASP_TOKEN_EXCHANGE_URL: &str = "UMA_VASP_TOKEN_EXCHANGE_URL";
    pub const VASP_UMA_API_BASE_URL: &str = "VASP_UMA_API_BASE_URL";
    pub const VASP_NAME: &str = "VASP_NAME";
    pub const NOSTR_PRIVKEY: &str = "NOSTR_PRIVKEY";
    pub const RELAY: &str = "RELAY";
    pub const NWC_APP_ROOT_URL: &str = "NWC_APP_ROOT_URL";
    pub const VASP_SUPPORTED_COMMANDS: &str = "VASP_SUPPORTED_COMMANDS";
}

/// The NWC app's configuration value set
///
/// Serializes under the key names the hosting application reads.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct NwcConfig {
    pub database_uri: String,
    pub secret_key: String,
    pub uma_vasp_jwt_pubkey: String,
    pub frontend_build_path: PathBuf,
    pub uma_vasp_login_url: String,
    pub uma_vasp_token_exchange_url: String,
    pub vasp_uma_api_base_url: String,
    pub vasp_name: String,
    pub nostr_privkey: String,
    pub relay: String,
    pub nwc_app_root_url: String,
    pub vasp_supported_commands: SupportedCommands,
}

impl NwcConfig {
    /// Example configuration rooted at `cwd`
    ///
    /// The session secret and Nostr key are generated fresh on every call.
    /// Pin them through the environment for anything beyond a demo.
    pub fn defaults(cwd: &Path) -> Self {
        Self {
            database_uri: database_uri(cwd),
            secret_key: token_hex(SECRET_BYTES),
            uma_vasp_jwt_pubkey: UMA_VASP_JWT_PUBKEY.to_string(),
            frontend_build_path: PathBuf::from(FRONTEND_BUILD_PATH),
            uma_vasp_login_url: UMA_VASP_LOGIN_URL.to_string(),
            uma_vasp_token_exchange_url: UMA_VASP_TOKEN_EXCHANGE_URL.to_string(),
            vasp_uma_api_base_url: VASP_UMA_API_BASE_URL.to_string(),
            vasp_name: VASP_NAME.to_string(),
            nostr_privkey: NostrIdentity::generate().secret_key_hex(),
            relay: relays::DEFAULT_RELAY.to_string(),
            nwc_app_root_url: NWC_APP_ROOT_URL.to_string(),
            vasp_supported_commands: SupportedCommands::default(),
        }
    }

    /// Load from the process environment
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(&working_dir(), |key| env::var(key).ok())
    }

    /// Apply overrides from `lookup` on top of the defaults, then validate
    ///
    /// Values are trimmed. Empty values are treated as unset.
    pub fn from_lookup<F>(cwd: &Path, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::defaults(cwd);

        let string_fields: [(&str, &mut String); 10] = [
            (keys::DATABASE_URI, &mut config.database_uri),
            (keys::SECRET_KEY, &mut config.secret_key),
            (keys::UMA_VASP_JWT_PUBKEY, &mut config.uma_vasp_jwt_pubkey),
            (keys::UMA_VASP_LOGIN_URL, &mut config.uma_vasp_login_url),
            (keys::UMA_VASP_TOKEN_EXCHANGE_URL, &mut config.uma_vasp_token_exchange_url),
            (keys::VASP_UMA_API_BASE_URL, &mut config.vasp_uma_api_base_url),
            (keys::VASP_NAME, &mut config.vasp_name),
            (keys::NOSTR_PRIVKEY, &mut config.nostr_privkey),
            (keys::RELAY, &mut config.relay),
            (keys::NWC_APP_ROOT_URL, &mut config.nwc_app_root_url),
        ];
        for (key, field) in string_fields {
            if let Some(value) = get(key) {
                debug!("{} overridden from environment", key);
                *field = value;
            }
        }

        if let Some(path) = get(keys::FRONTEND_BUILD_PATH) {
            debug!("{} overridden from environment", keys::FRONTEND_BUILD_PATH);
            config.frontend_build_path = PathBuf::from(path);
        }

        if let Some(list) = get(keys::VASP_SUPPORTED_COMMANDS) {
            debug!("{} overridden from environment", keys::VASP_SUPPORTED_COMMANDS);
            let commands =
                SupportedCommands::from_names(list.split(',').filter(|s| !s.trim().is_empty()))?;
            if commands.is_empty() {
                return Err(ConfigError::Empty {
                    key: keys::VASP_SUPPORTED_COMMANDS,
                });
            }
            config.vasp_supported_commands = commands;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check every value is well-formed in its own right
    pub fn validate(&self) -> ConfigResult<()> {
        validate_database_uri(&self.database_uri)?;
        validate_hex(keys::SECRET_KEY, &self.secret_key, SECRET_BYTES * 2)?;
        JwtPublicKey::parse(&self.uma_vasp_jwt_pubkey)?;

        if self.frontend_build_path.as_os_str().is_empty() {
            return Err(ConfigError::Empty {
                key: keys::FRONTEND_BUILD_PATH,
            });
        }

        validate_http_url(keys::UMA_VASP_LOGIN_URL, &self.uma_vasp_login_url)?;
        validate_http_url(keys::UMA_VASP_TOKEN_EXCHANGE_URL, &self.uma_vasp_token_exchange_url)?;
        validate_http_url(keys::VASP_UMA_API_BASE_URL, &self.vasp_uma_api_base_url)?;
        validate_http_url(keys::NWC_APP_ROOT_URL, &self.nwc_app_root_url)?;

        if self.vasp_name.trim().is_empty() {
            return Err(ConfigError::Empty { key: keys::VASP_NAME });
        }

        validate_hex(keys::NOSTR_PRIVKEY, &self.nostr_privkey, SECRET_BYTES * 2)?;
        self.nostr_identity()?;
        relays::validate_relay(&self.relay)?;

        if self.vasp_supported_commands.is_empty() {
            return Err(ConfigError::Empty {
                key: keys::VASP_SUPPORTED_COMMANDS,
            });
        }

        Ok(())
    }

    /// Parsed JWT verification key
    pub fn jwt_public_key(&self) -> ConfigResult<JwtPublicKey> {
        JwtPublicKey::parse(&self.uma_vasp_jwt_pubkey)
    }

    /// Signing identity for relay messages
    pub fn nostr_identity(&self) -> ConfigResult<NostrIdentity> {
        NostrIdentity::from_hex(&self.nostr_privkey)
    }
}

impl fmt::Debug for NwcConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NwcConfig")
            .field("database_uri", &self.database_uri)
            .field("secret_key", &"<redacted>")
            .field("uma_vasp_jwt_pubkey", &self.uma_vasp_jwt_pubkey)
            .field("frontend_build_path", &self.frontend_build_path)
            .field("uma_vasp_login_url", &self.uma_vasp_login_url)
            .field("uma_vasp_token_exchange_url", &self.uma_vasp_token_exchange_url)
            .field("vasp_uma_api_base_url", &self.vasp_uma_api_base_url)
            .field("vasp_name", &self.vasp_name)
            .field("nostr_privkey", &"<redacted>")
            .field("relay", &self.relay)
            .field("nwc_app_root_url", &self.nwc_app_root_url)
            .field("vasp_supported_commands", &self.vasp_supported_commands)
            .finish()
    }
}

/// SQLite database URI under `<cwd>/instance`
pub fn database_uri(cwd: &Path) -> String {
    format!(
        "{}{}",
        DATABASE_URI_SCHEME,
        cwd.join(INSTANCE_DIR).join(DATABASE_FILENAME).display()
    )
}

/// `nbytes` random bytes, hex-encoded
pub fn token_hex(nbytes: usize) -> String {
    let mut buf = vec![0u8; nbytes];
    rand::thread_rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

fn working_dir() -> PathBuf {
    dir_or_dot(env::current_dir())
}

fn dir_or_dot(dir: std::io::Result<PathBuf>) -> PathBuf {
    dir.unwrap_or_else(|e| {
        // Fallback for a deleted or unreadable cwd
        warn!("Cannot read working directory ({}), using '.'", e);
        PathBuf::from(".")
    })
}

fn validate_database_uri(uri: &str) -> ConfigResult<()> {
    match uri.split_once("://") {
        Some((scheme, rest)) if !scheme.is_empty() && !rest.is_empty() => Ok(()),
        _ if uri.is_empty() => Err(ConfigError::Empty {
            key: keys::DATABASE_URI,
        }),
        _ => Err(ConfigError::InvalidUrl {
            key: keys::DATABASE_URI,
            reason: "missing scheme".to_string(),
        }),
    }
}

fn validate_http_url(key: &'static str, value: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(ConfigError::Empty { key });
    }

    let url = Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
        key,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl {
            key,
            reason: format!("unsupported scheme {}", other),
        }),
    }
}

fn validate_hex(key: &'static str, value: &str, expected: usize) -> ConfigResult<()> {
    if value.len() != expected || hex::decode(value).is_err() {
        return Err(ConfigError::InvalidHex { key, expected });
    }
    Ok(())
}
