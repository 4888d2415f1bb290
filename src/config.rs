//! Configuration handling for flowmodel.
//!
//! Settings live in `.flowmodel/config.toml` at the project root:
//!
//! ```toml
//! [flowmodel]
//! language = "java"
//! mode = "framework"
//! show_type_models = true
//! ```
//!
//! Every key is optional. A project without the file gets the defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flowmodel_core::adapter::Ecosystem;
use flowmodel_core::sorting::Mode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Directory holding the project configuration.
pub const CONFIG_DIR: &str = ".flowmodel";

/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to get current directory: {0}")]
    CurrentDir(#[source] io::Error),
}

/// flowmodel configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub flowmodel: FlowmodelConfig,
}

/// Core flowmodel settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FlowmodelConfig {
    /// Ecosystem used when `--language` is not given
    #[serde(default)]
    pub language: Option<Ecosystem>,

    /// Grouping mode for `sort`
    #[serde(default)]
    pub mode: Mode,

    /// Emit `type` models from `encode`
    #[serde(default)]
    pub show_type_models: bool,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from .flowmodel/config.toml in the given project root
    pub fn load_from_project(project_root: &Path) -> Result<Self, ConfigError> {
        let config_path = project_root.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration for the project containing `start`.
    ///
    /// Falls back to defaults outside any project.
    pub fn discover_from(start: &Path) -> Result<Self, ConfigError> {
        match find_project_root_from(start) {
            Some(root) => {
                debug!(root = %root.display(), "found project configuration directory");
                Self::load_from_project(&root)
            }
            None => Ok(Config::default()),
        }
    }

    /// Load configuration for the project containing the working directory.
    pub fn discover() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
        Self::discover_from(&cwd)
    }
}

/// Find the project root by searching upward for a `.flowmodel/` directory
pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_DIR).is_dir())
        .map(Path::to_path_buf)
}

// ============================================================================
// Tests
// ============================================================================
