//! Configuration file management.
//!
//! Handles reading, writing, and validating `.keyref.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::core::domain::TeamMember;
use crate::core::types::BackendName;
use crate::core::validation;
use crate::error::{ConfigError, Result};

/// Project configuration stored in `.keyref.toml`
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Project metadata
    pub project: ProjectMeta,
    /// Secret stores, in lookup priority order
    #[serde(default)]
    pub backends: Vec<BackendConfig>,
    /// Recipients of sync envelopes
    #[serde(default)]
    pub team: Vec<TeamMember>,
    #[serde(skip)]
    path: PathBuf,
}

/// Project section of the configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectMeta {
    /// Project name, the root namespace for its secrets
    pub name: String,
    /// Configuration version
    pub version: String,
}

/// One configured backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Unique label
    pub name: BackendName,
    /// Vendor type; defaults to `name` when omitted
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Vendor-specific options
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, String>,
}

impl BackendConfig {
    /// A backend with an explicit type and no options.
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: Some(kind.to_string()),
            config: BTreeMap::new(),
        }
    }

    /// Configured type, or the name when no type is set.
    pub fn effective_type(&self) -> &str {
        self.kind.as_deref().unwrap_or(&self.name)
    }

    /// A vendor-specific option.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }
}

impl Config {
    /// Create a new configuration for `project` with current version
    pub fn new(project: &str) -> Self {
        Self {
            project: ProjectMeta {
                name: project.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            backends: Vec::new(),
            team: Vec::new(),
            path: Self::config_path(),
        }
    }

    /// Path to the configuration file in the current directory
    pub fn config_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Check if a configuration file exists in the current directory
    pub fn exists() -> bool {
        Self::config_path().exists()
    }

    /// Load configuration from `.keyref.toml` in the current directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotInitialized` if the file doesn't exist,
    /// or `ConfigError::Parse` if the TOML is malformed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load and validate configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        if !path.exists() {
            return Err(ConfigError::NotInitialized.into());
        }
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.path = path.to_path_buf();

        debug!(
            project = %config.project.name,
            backends = config.backends.len(),
            team = config.team.len(),
            "config loaded"
        );

        config.validate()?;
        Ok(config)
    }

    /// Set where `save` writes.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Path this config was loaded from or will be saved to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save configuration, replacing the file atomically
    ///
    /// The whole document is written to a sibling temp file and renamed
    /// over the original, so readers see either the old or the new roster.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self) -> Result<()> {
        debug!(path = %self.path.display(), "saving config");

        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;

        Ok(())
    }

    /// Project name
    pub fn project_name(&self) -> &str {
        &self.project.name
    }

    /// Configured backend by name
    pub fn backend(&self, name: &str) -> Option<&BackendConfig> {
        self.backends.iter().find(|b| b.name == name)
    }

    /// Team member by name
    pub fn member(&self, name: &str) -> Option<&TeamMember> {
        self.team.iter().find(|m| m.name == name)
    }

    /// Validate the configuration structure and contents
    ///
    /// Checks:
    /// - Version field is present and looks like semver
    /// - Project name is a valid namespace component
    /// - Backend names are valid and unique
    /// - Team member names are unique and keys are valid age recipients
    ///
    /// Backend types are checked when the registry is built.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` or `ValidationError` on the first failure.
    pub fn validate(&self) -> Result<()> {
        debug!("validating config");

        if self.project.version.is_empty() {
            return Err(ConfigError::MissingField { field: "version" }.into());
        }

        if self.project.version.split('.').count() < 2 {
            return Err(ConfigError::InvalidValue {
                field: "version",
                reason: format!("not a valid semver: {}", self.project.version),
            }
            .into());
        }

        validation::validate_name("project", &self.project.name)?;

        let mut names = HashSet::new();
        for backend in &self.backends {
            validation::validate_name("backend", &backend.name)?;
            if !names.insert(backend.name.as_str()) {
                return Err(ConfigError::DuplicateBackend(backend.name.clone()).into());
            }
        }

        let mut members = HashSet::new();
        for member in &self.team {
            member.validate().map_err(|e| ConfigError::InvalidValue {
                field: "team",
                reason: format!("member '{}': {}", member.name, e),
            })?;
            if !members.insert(member.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "team",
                    reason: format!("duplicate member '{}'", member.name),
                }
                .into());
            }
        }

        Ok(())
    }
}
