//! Read-only environment variable backend.
//!
//! Maps a key to a variable name by upper-casing it and replacing every
//! non-alphanumeric character with `_`, so `myapp/secrets/api_key` reads
//! `MYAPP_SECRETS_API_KEY` (with the optional configured prefix in front).

use std::env::VarError;

use super::Backend;
use crate::core::config::BackendConfig;
use crate::error::{BackendError, Result};

/// Environment variables as a secret source.
#[derive(Debug)]
pub struct EnvBackend {
    name: String,
    prefix: String,
}

impl EnvBackend {
    /// Create an env backend with an optional variable-name prefix.
    pub fn new(name: &str, prefix: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            prefix: prefix.unwrap_or_default().to_string(),
        }
    }

    /// Build from `[backends.config]`; recognizes `prefix`.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(&config.name, config.option("prefix"))
    }

    /// Variable name a key maps to.
    pub fn var_name(&self, key: &str) -> String {
        let mapped: String = key
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() {
                    ch.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", self.prefix, mapped)
    }
}

impl Backend for EnvBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Result<String> {
        match std::env::var(self.var_name(key)) {
            Ok(value) => Ok(value),
            Err(VarError::NotPresent) => Err(BackendError::not_found(&self.name, key).into()),
            Err(VarError::NotUnicode(_)) => Err(BackendError::vendor(
                &self.name,
                format!("{} is not valid unicode", self.var_name(key)),
            )
            .into()),
        }
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(BackendError::ReadOnly {
            backend: self.name.clone(),
        }
        .into())
    }

    fn delete(&self, _key: &str) -> Result<()> {
        Err(BackendError::ReadOnly {
            backend: self.name.clone(),
        }
        .into())
    }

    fn list(&self) -> Result<Vec<String>> {
        // Variable names cannot be mapped back to keys.
        Err(BackendError::Unsupported {
            backend: self.name.clone(),
            operation: "list",
        }
        .into())
    }
}
