mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        let path = shellexpand::tilde(&path.to_string_lossy()).to_string();
        return load_config(Path::new(&path));
    }

    let default_paths = ["./subburn.toml", "~/.config/subburn/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!(path = %path.display(), "Using config file");
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.timeout_secs == 0 {
        anyhow::bail!("timeout_secs must be greater than 0");
    }

    if config.languages.source.trim().is_empty() {
        anyhow::bail!("Source language cannot be empty");
    }

    if config.languages.target.trim().is_empty() {
        anyhow::bail!("Target language cannot be empty");
    }

    if config.output_dir.as_os_str().is_empty() {
        anyhow::bail!("Output directory cannot be empty");
    }

    for (name, path) in [
        ("yt_dlp_path", &config.tools.yt_dlp_path),
        ("transcript_path", &config.tools.transcript_path),
        ("ffmpeg_path", &config.tools.ffmpeg_path),
    ] {
        if let Some(path) = path {
            if !path.exists() {
                tracing::warn!("Configured {} does not exist: {:?}", name, path);
            }
        }
    }

    Ok(())
}
