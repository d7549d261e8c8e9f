//! Configuration loading from spekt.toml
//!
//! Runtime settings can be specified in a `spekt.toml` file in the project
//! root. The configuration is discovered automatically by walking up from
//! the current directory, and every setting has a sensible default so the
//! file is optional.

use crate::filter::FrameworkStackTraceFilter;
use crate::unroll::DEFAULT_UNROLL_TEMPLATE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Spekt runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpektConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Failure diff configuration
    #[serde(default)]
    pub diff: DiffConfig,
    /// Stack-trace filtering configuration
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Runner configuration for spec execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Name template for unrolled features without an explicit one
    #[serde(default = "default_unroll_template")]
    pub unroll_template: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            unroll_template: default_unroll_template(),
        }
    }
}

fn default_unroll_template() -> String {
    DEFAULT_UNROLL_TEMPLATE.to_string()
}

/// Failure diff configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiffConfig {
    /// Truncate rendered operands beyond this many characters (0 = no limit)
    #[serde(default)]
    pub max_rendered_len: usize,
}

/// Stack-trace filtering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Function-path prefixes hidden from reported traces
    #[serde(default = "default_hidden_prefixes")]
    pub hidden_prefixes: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            hidden_prefixes: default_hidden_prefixes(),
        }
    }
}

fn default_hidden_prefixes() -> Vec<String> {
    FrameworkStackTraceFilter::default_prefixes()
}

impl SpektConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from the
    /// current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join("spekt.toml");
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        // The template values start with `#`, so the `"#` sequence would
        // close a single-hash raw string.
        r##"# Spekt configuration file

[runner]
# Name template applied to unrolled features that carry no template of
# their own. #feature_name and #iteration_count are always available;
# other #tokens bind to the feature's data variables.
unroll_template = "#feature_name[#iteration_count]"

[diff]
# Truncate rendered comparison operands beyond this many characters.
# 0 means no limit.
max_rendered_len = 0

[filter]
# Function-path prefixes scrubbed from reported stack traces.
hidden_prefixes = [
    "spekt_runtime::",
    "spekt_model::",
    "core::panicking",
    "std::panicking",
]
"##
        .to_string()
    }
}
