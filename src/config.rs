use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration file looked up in the current directory by default.
pub const CONFIG_FILE: &str = "laub.yaml";

/// Fixed output file name, overwritten unconditionally on every run.
pub const OUTPUT_FILE: &str = "dirtreeAppendix.tex";

/// Renderer configuration (laub.yaml, overridable from CLI flags).
///
/// Everything the renderer needs is carried explicitly through this
/// structure; nothing persists between invocations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Directory to render the tree from
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Repository base URL the links point into
    #[serde(default)]
    pub url: Option<String>,

    /// Branch name used in link targets
    #[serde(default)]
    pub branch: Option<String>,

    /// Top-level directories to include (empty: include all)
    #[serde(default)]
    pub allow: Vec<String>,

    /// Directory names and file extensions to exclude
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Output file (default: dirtreeAppendix.tex)
    #[serde(default)]
    pub output: Option<PathBuf>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no root directory given (ROOT argument or 'root' in laub.yaml)")]
    MissingRoot,
    #[error("no repository URL given (--url or 'url' in laub.yaml)")]
    MissingUrl,
    #[error("no branch name given (--branch or 'branch' in laub.yaml)")]
    MissingBranch,
}

/// Fully-resolved settings handed to the renderer.
#[derive(Debug, Clone)]
pub struct Settings {
    pub root: PathBuf,
    pub url: String,
    pub branch: String,
    pub allow: Vec<String>,
    pub ignore: Vec<String>,
    pub output: PathBuf,
}

impl RenderConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: RenderConfig = serde_yml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Load laub.yaml from the current directory if present, otherwise
    /// start from an empty configuration
    pub fn load_default() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply CLI overrides on top of the file values: scalar flags
    /// replace when given, list flags replace only when non-empty (an
    /// absent repeatable flag parses as an empty list and must not wipe
    /// the configured one)
    pub fn merge(&mut self, overrides: RenderConfig) {
        if let Some(root) = overrides.root {
            self.root = Some(root);
        }
        if let Some(url) = overrides.url {
            self.url = Some(url);
        }
        if let Some(branch) = overrides.branch {
            self.branch = Some(branch);
        }
        if !overrides.allow.is_empty() {
            self.allow = overrides.allow;
        }
        if !overrides.ignore.is_empty() {
            self.ignore = overrides.ignore;
        }
        if let Some(output) = overrides.output {
            self.output = Some(output);
        }
    }

    /// Resolve into renderer settings, rejecting missing required fields
    pub fn resolve(self) -> Result<Settings, ConfigError> {
        Ok(Settings {
            root: self.root.ok_or(ConfigError::MissingRoot)?,
            url: self.url.ok_or(ConfigError::MissingUrl)?,
            branch: self.branch.ok_or(ConfigError::MissingBranch)?,
            allow: self.allow,
            ignore: self.ignore,
            output: self.output.unwrap_or_else(|| PathBuf::from(OUTPUT_FILE)),
        })
    }
}
