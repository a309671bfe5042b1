// ⚙️ Configuration - JSON file plus environment overrides

use crate::table::DEFAULT_PAGE_SIZE;
use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

pub const CONFIG_ENV: &str = "KRONOS_CONFIG";
pub const BIND_ENV: &str = "KRONOS_BIND";
pub const PAGE_SIZE_ENV: &str = "KRONOS_PAGE_SIZE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the web server listens on
    pub bind_addr: String,

    /// Rows per page for both front ends
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0:3000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Load from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Config::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(content).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then `KRONOS_CONFIG` file, then single-field overrides
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var(CONFIG_ENV) {
            Ok(path) => Config::from_file(path)?,
            Err(_) => Config::default(),
        };

        config.apply_overrides(env::var(BIND_ENV).ok(), env::var(PAGE_SIZE_ENV).ok())?;
        Ok(config)
    }

    pub fn apply_overrides(
        &mut self,
        bind_addr: Option<String>,
        page_size: Option<String>,
    ) -> Result<()> {
        if let Some(addr) = bind_addr {
            self.bind_addr = addr;
        }

        if let Some(raw) = page_size {
            self.page_size = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", PAGE_SIZE_ENV, raw))?;
        }

        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        if self.bind_addr.trim().is_empty() {
            bail!("bind_addr must not be empty");
        }
        Ok(())
    }
}
