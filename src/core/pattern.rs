//! Purpose: Expand library path patterns into concrete plugin paths.
//! Exports: `PathPattern`, macro constants.
//! Invariants: `{assets}` and `{proj}` are expanded before `{name}`, so a library name
//! containing macro text is never re-expanded.
use std::path::{Path, PathBuf};

use super::error::{Error, ErrorKind};

pub const NAME_MACRO: &str = "{name}";
pub const ASSETS_MACRO: &str = "{assets}";
pub const PROJECT_MACRO: &str = "{proj}";

pub const DEFAULT_PATTERN: &str = "{assets}/Plugins/__{name}";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathPattern {
    raw: String,
}

impl PathPattern {
    pub fn new(raw: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(Error::new(ErrorKind::Usage).with_message("path pattern is empty"));
        }
        Ok(Self { raw })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn expand_dirs(&self, assets_dir: &Path) -> String {
        let assets = assets_dir.to_string_lossy();
        self.raw
            .replace(ASSETS_MACRO, &assets)
            .replace(PROJECT_MACRO, &format!("{assets}/../"))
    }

    pub fn resolve(&self, name: &str, assets_dir: &Path) -> Result<PathBuf, Error> {
        if name.is_empty() {
            return Err(Error::new(ErrorKind::Usage).with_message("library name is empty"));
        }
        Ok(PathBuf::from(
            self.expand_dirs(assets_dir).replace(NAME_MACRO, name),
        ))
    }
}

impl Default for PathPattern {
    fn default() -> Self {
        Self {
            raw: DEFAULT_PATTERN.to_string(),
        }
    }
}
