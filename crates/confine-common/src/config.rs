//! Configuration model for mount table inspection.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfineError, Result};

/// Where and how to read a mount table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountinfoConfig {
    /// Path of the mountinfo file to parse.
    pub path: PathBuf,
}

impl Default for MountinfoConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(crate::constants::DEFAULT_MOUNTINFO_PATH),
        }
    }
}

impl MountinfoConfig {
    /// Creates a configuration reading from `path`.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parses a configuration from JSON. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails
    /// [`validate`](Self::validate).
    pub fn from_json(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can be used.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty.
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfineError::Config {
                message: "mountinfo path must not be empty".into(),
            });
        }
        Ok(())
    }
}
