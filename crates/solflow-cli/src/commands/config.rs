//! Config command implementation.

use anyhow::Result;

use crate::config::{Config, Overrides};

/// Show the effective configuration with the API key redacted.
pub fn show(config: &Config, overrides: &Overrides) -> Result<()> {
    let provider = &config.provider;

    println!("SolFlow Configuration");
    println!("{:-<40}", "");
    println!("API URL:          {}", provider.api_url);
    println!(
        "API Key:          {}",
        provider
            .masked_key()
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!("Model:            {}", provider.model_name);
    println!(
        "Request Timeout:  {}",
        provider
            .request_timeout_secs
            .map(|secs| format!("{secs}s"))
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("Dark Mode:        {}", config.dark_mode);

    if let Some(config_path) = overrides.config_location() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Print the config file location.
pub fn path(overrides: &Overrides) -> Result<()> {
    match overrides.config_location() {
        Some(path) => println!("{}", path.display()),
        None => println!("(no config directory available)"),
    }
    Ok(())
}
