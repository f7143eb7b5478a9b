//! Purpose: Relay configuration loaded from JSON and merged with CLI flags.
//! Exports: `RelayConfig`.
//! Invariants: Missing fields fall back to defaults; unknown fields are rejected.
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::error::{Error, ErrorKind};
use crate::core::pattern::PathPattern;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    pub path_pattern: Option<String>,
    pub assets_dir: Option<PathBuf>,
    pub call_unload_hook: bool,
    pub require_load_hook: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            path_pattern: None,
            assets_dir: None,
            call_unload_hook: true,
            require_load_hook: false,
        }
    }
}

impl RelayConfig {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to read relay config")
                .with_path(path)
                .with_source(err)
        })?;
        Self::from_json(&text).map_err(|err| err.with_path(path))
    }

    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message("invalid relay config")
                .with_source(err)
        })
    }

    pub fn pattern(&self) -> Result<PathPattern, Error> {
        match &self.path_pattern {
            Some(raw) => PathPattern::new(raw.as_str()),
            None => Ok(PathPattern::default()),
        }
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.assets_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("Assets"))
    }
}
