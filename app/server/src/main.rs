use anyhow::{Context, Result};
use tracing::info;

use uma_nwc_server::NwcConfig;

/// UMA NWC Server
///
/// Loads and validates the NWC app configuration, then writes the exported
/// key set as JSON to stdout for the hosting application.
///
/// Every key can be overridden by an environment variable of the same name,
/// e.g. `RELAY`, `NOSTR_PRIVKEY` or `VASP_SUPPORTED_COMMANDS=pay_invoice,get_info`.
fn main() -> Result<()> {
    // Logs go to stderr, stdout carries only the export
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    info!("UMA NWC configuration loading...");

    let config = NwcConfig::from_env().context("Invalid NWC configuration")?;

    info!("Database: {}", config.database_uri);
    info!("VASP: {} ({})", config.vasp_name, config.vasp_uma_api_base_url);
    info!("Relay: {}", config.relay);
    info!("App root: {}", config.nwc_app_root_url);

    let jwt_key = config
        .jwt_public_key()
        .context("Invalid JWT public key")?;
    info!("JWT verification key: {:?}", jwt_key.algorithm());

    let identity = config
        .nostr_identity()
        .context("Failed to derive Nostr identity")?;
    info!("Nostr public key: {}", identity.public_key_hex());

    info!(
        "Supported commands ({}): {}",
        config.vasp_supported_commands.len(),
        config.vasp_supported_commands.names().join(", ")
    );

    let export = serde_json::to_string_pretty(&config)
        .context("Failed to serialize configuration")?;
    println!("{}", export);

    Ok(())
}
