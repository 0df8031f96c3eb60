use crate::config::Config;
use anyhow::{Context, Result};
use tracing::info;

/// Prints the effective configuration as TOML; with `save` it is also written to the platform
/// config file, filling in every default.
pub fn run(config: &Config, save: bool) -> Result<()> {
    print!("{}", render(config)?);

    if save {
        match config.save().context("Failed to save configuration")? {
            Some(path) => info!("Saved configuration to {}", path.display()),
            None => info!("No config directory available on this platform, nothing saved"),
        }
    }
    Ok(())
}

pub fn render(config: &Config) -> Result<String> {
    let mut text = String::new();
    if let Some(path) = Config::config_path() {
        text.push_str(&format!("# {}\n", path.display()));
    }
    text.push_str(&toml::to_string_pretty(config).context("Failed to serialize configuration")?);
    Ok(text)
}
