//! Feed configuration — TOML-declared data directory, symbols, and layout.
//!
//! Lets embedding code declare a feed in a config file instead of in code:
//!
//! ```toml
//! csv_dir = "data/daily"
//! symbols = ["SPY", "QQQ", "AAPL"]
//! layout = "headered"
//! ```

use crate::data::CsvLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Declarative description of a historic multi-symbol feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Directory holding `<symbol>.csv` files.
    pub csv_dir: PathBuf,
    /// Instruments to register.
    pub symbols: Vec<String>,
    /// Input layout; defaults to `headered`.
    #[serde(default)]
    pub layout: CsvLayout,
}

impl FeedConfig {
    /// Load a feed config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read feed config: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a feed config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse feed config TOML: {e}"))
    }

    /// Serialize the config to TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("serialize feed config: {e}"))
    }
}
