//! Configuration for a graph run
//!
//! Every key is optional. A TOML file fills in what it names and the CLI
//! overrides individual values afterwards.
//!
//! ```toml
//! [discovery]
//! respect_gitignore = true
//!
//! [layout]
//! iterations = 80
//!
//! [output]
//! title = "My Project"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default file name of the emitted page, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "import_graph_interactive.html";

/// Default chart title
pub const DEFAULT_TITLE: &str = "Python Project Import Graph";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub layout: LayoutConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Skip files excluded by `.gitignore`
    pub respect_gitignore: bool,
    /// Descend into dot-directories and pick up dot-files
    pub include_hidden: bool,
    /// Glob patterns, relative to the scanned root
    pub patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            respect_gitignore: true,
            include_hidden: true,
            patterns: vec!["**/*.py".to_string()],
        }
    }
}

/// Parameters handed to the force simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub iterations: usize,
    /// Ideal edge length inside the simulation, before rescaling
    pub scale: f32,
    /// Per-step damping of node velocity
    pub cooloff: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            scale: 45.0,
            cooloff: 0.975,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub title: String,
    pub open_browser: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT),
            title: DEFAULT_TITLE.to_string(),
            open_browser: true,
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw).map_err(|err| Error::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.discovery.patterns.is_empty() {
            return Err(Error::Config("discovery.patterns must not be empty".into()));
        }
        for pattern in &self.discovery.patterns {
            globset::Glob::new(pattern).map_err(|err| {
                Error::Config(format!("discovery.patterns entry '{pattern}': {err}"))
            })?;
        }
        if !self.layout.scale.is_finite() || self.layout.scale <= 0.0 {
            return Err(Error::Config(format!(
                "layout.scale must be positive, got {}",
                self.layout.scale
            )));
        }
        if !(0.0..=1.0).contains(&self.layout.cooloff) {
            return Err(Error::Config(format!(
                "layout.cooloff must be within 0..=1, got {}",
                self.layout.cooloff
            )));
        }
        Ok(())
    }
}
