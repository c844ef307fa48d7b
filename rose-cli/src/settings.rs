//! Engine configuration from a TOML file plus command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use rose_integrate::IntegrateConfig;

/// Flags that override fields of the loaded configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    /// Layout width in pixels.
    pub width: Option<i32>,
    /// Base font size in pixels.
    pub font_size: Option<u32>,
    /// Lay out in editable mode.
    pub editable: bool,
}

/// Parse `text` as an [`IntegrateConfig`]. Missing fields take defaults.
pub fn parse_config(text: &str) -> Result<IntegrateConfig> {
    toml::from_str(text).context("invalid configuration")
}

/// Load `path` (or the defaults) and apply `overrides`.
pub fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<IntegrateConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            parse_config(&text).with_context(|| format!("in '{}'", path.display()))?
        }
        None => IntegrateConfig::default(),
    };
    if let Some(width) = overrides.width {
        config.max_width = width;
    }
    if let Some(font_size) = overrides.font_size {
        config.font_size = font_size;
    }
    config.editable |= overrides.editable;
    config.validate()?;
    Ok(config)
}
