//! Check-config command
//!
//! Usage: shopchat-server check-config

use shopchat_core::AppConfig;

/// Execute check-config command
pub fn execute() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    println!(
        "✓ Configuration complete (app url {}, {} scopes)",
        config.app_url,
        config.scopes.len()
    );
    Ok(())
}
