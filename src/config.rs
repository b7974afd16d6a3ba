// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Pnlbook", "pnlbook"));

pub const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_BASE_CURRENCY: &str = "CNY";

/// Everything a Session needs to know about where and how to store data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub profile: String,
    pub base_currency: String,
}

/// On-disk overrides, all optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    profile: Option<String>,
    base_currency: Option<String>,
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Config {
            data_dir: data_dir.into(),
            profile: DEFAULT_PROFILE.to_string(),
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    pub fn with_base_currency(mut self, ccy: impl Into<String>) -> Self {
        self.base_currency = ccy.into();
        self
    }

    /// Platform data dir, then `config.toml` from the platform config dir,
    /// then the CLI profile override.
    pub fn load(profile_override: Option<&str>) -> Result<Self> {
        let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
            .context("Could not determine platform-specific data dir")?;
        let mut config = Config::new(proj.data_dir());
        let file = proj.config_dir().join(CONFIG_FILE);
        if file.exists() {
            config.merge_file(&file)?;
        }
        if let Some(p) = profile_override {
            config.profile = p.trim().to_string();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Read config {}", path.display()))?;
        let file: ConfigFile =
            toml::from_str(&raw).with_context(|| format!("Parse config {}", path.display()))?;
        if let Some(dir) = file.data_dir {
            self.data_dir = dir;
        }
        if let Some(p) = file.profile {
            self.profile = p.trim().to_string();
        }
        if let Some(c) = file.base_currency {
            self.base_currency = c.trim().to_uppercase();
        }
        Ok(())
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        let p = &self.profile;
        if p.is_empty() || p == "." || p == ".." || p.contains(['/', '\\']) {
            return Err(LedgerError::Config(format!("profile name '{}'", p)));
        }
        let c = &self.base_currency;
        if c.len() != 3 || !c.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(LedgerError::Config(format!(
                "base currency '{}', expected a 3-letter code",
                c
            )));
        }
        Ok(())
    }

    pub fn profile_dir(&self) -> PathBuf {
        self.data_dir.join(&self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn file_overrides_defaults() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "profile = \"alice\"\nbase_currency = \"usd\"").unwrap();
        let mut config = Config::new("/tmp/pnl");
        config.merge_file(f.path()).unwrap();
        assert_eq!(config.profile, "alice");
        assert_eq!(config.base_currency, "USD");
        assert_eq!(config.profile_dir(), PathBuf::from("/tmp/pnl/alice"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "colour = \"red\"").unwrap();
        assert!(Config::new("/tmp").merge_file(f.path()).is_err());
    }

    #[test]
    fn profile_must_not_escape_data_dir() {
        assert!(Config::new("/tmp").with_profile("../x").validate().is_err());
        assert!(Config::new("/tmp").with_profile("").validate().is_err());
        assert!(Config::new("/tmp").with_base_currency("EURO").validate().is_err());
        assert!(Config::new("/tmp").validate().is_ok());
    }
}
