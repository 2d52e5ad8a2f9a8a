//! Information display handlers

use crate::errors::RecommenderError;
use crate::AppConfig;
use crate::Result;

/// Print the effective configuration (files plus environment overrides)
pub fn handle_config_command(config: &AppConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| RecommenderError::Custom(format!("Failed to render config: {e}")))?;
    println!("{rendered}");
    Ok(())
}
