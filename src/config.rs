use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::auth::AdminGate;
use crate::identity::{Identity, Palette};
use crate::message::DEFAULT_TEMPLATE;

fn default_refresh_minutes() -> u64 {
    5
}
fn default_country_code() -> String {
    "972".to_string()
}
fn default_link_scheme() -> String {
    "whatsapp".to_string()
}
fn default_message_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

/// Daemon configuration, read once at startup from an optional TOML file.
/// Every field has a default so a missing file or empty table still yields
/// a working daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Polling interval advertised to the frontend; the daemon itself
    /// never fetches.
    pub refresh_minutes: u64,
    pub country_code: String,
    pub link_scheme: String,
    pub message_template: String,
    pub admin: AdminGate,
    /// Optional identity palette override; the built-in animal palette is
    /// used when absent or empty.
    pub palette: Vec<Identity>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            refresh_minutes: default_refresh_minutes(),
            country_code: default_country_code(),
            link_scheme: default_link_scheme(),
            message_template: default_message_template(),
            admin: AdminGate::default(),
            palette: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&text)?;
        Ok(config)
    }

    pub fn palette(&self) -> Palette {
        if self.palette.is_empty() {
            Palette::builtin()
        } else {
            Palette::new(self.palette.clone())
        }
    }
}
