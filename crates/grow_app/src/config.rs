use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub(crate) roots: Vec<PathBuf>,
    pub(crate) day_offset: i64,
    pub(crate) location: Option<String>,
    pub(crate) ledger_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Builds a config from any key lookup; unparsable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(root) = lookup("GROW_DATA_ROOT") {
            config.push_root(PathBuf::from(root));
        }
        if let Some(list) = lookup("GROW_DATA_ROOTS") {
            for path in std::env::split_paths(&list) {
                config.push_root(path);
            }
        }
        if let Some(offset) = lookup("GROW_DAY_OFFSET") {
            match offset.trim().parse::<i64>() {
                Ok(value) => config.day_offset = value,
                Err(err) => warn!(%offset, %err, "ignoring GROW_DAY_OFFSET"),
            }
        }
        if let Some(location) = lookup("GROW_LOCATION") {
            let location = location.trim();
            if !location.is_empty() {
                config.location = Some(location.to_string());
            }
        }
        if let Some(path) = lookup("GROW_LEDGER_PATH") {
            if !path.trim().is_empty() {
                config.ledger_path = PathBuf::from(path);
            }
        }
        if config.roots.is_empty() {
            config.push_root(PathBuf::from("data"));
        }
        config
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn day_offset(&self) -> i64 {
        self.day_offset
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn ledger_path(&self) -> &PathBuf {
        &self.ledger_path
    }

    pub(crate) fn push_root(&mut self, path: PathBuf) {
        if !self.roots.contains(&path) {
            info!(path = %path.display(), "registering data root");
            self.roots.push(path);
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            day_offset: 0,
            location: None,
            ledger_path: PathBuf::from("facility-ledger.json"),
        }
    }
}
