//! Secret-store backends.
//!
//! A [`Backend`] is a synchronous key/value secret store. Vendor
//! implementations are selected by the closed [`BackendKind`] enum when the
//! registry is built; an unknown type is a configuration error, never a
//! silent fallback.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Backend` trait in a new file
//! 2. Add a variant to `BackendKind` and a match arm in [`build`]
//! 3. Re-export from this module

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::core::config::BackendConfig;
use crate::error::{ConfigError, Result};

mod env;
mod file;
#[cfg(target_os = "macos")]
mod keychain;
mod memory;
pub mod namespace;
pub mod registry;

pub use env::EnvBackend;
pub use file::FileBackend;
#[cfg(target_os = "macos")]
pub use keychain::KeychainBackend;
pub use memory::MemoryBackend;
pub use namespace::{get_with_fallback, Namespace, NamespacedBackend};
pub use registry::Registry;

/// Secret-store capability set.
///
/// `get` and `delete` report an absent key as `BackendError::NotFound`
/// (see [`crate::error::Error::is_not_found`]); every other error is a vendor
/// failure and is propagated untouched. There is no retry at this layer.
pub trait Backend {
    /// Configured label of this backend.
    fn name(&self) -> &str;

    /// Fetch a value.
    fn get(&self, key: &str) -> Result<String>;

    /// Create or overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value.
    fn delete(&self, key: &str) -> Result<()>;

    /// All keys held by this store.
    fn list(&self) -> Result<Vec<String>>;

    /// Release vendor resources. Called once by the registry.
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Known backend vendor types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// age-encrypted JSON file under `~/.keyref/stores`
    File,
    /// macOS Keychain generic passwords
    Keychain,
    /// Read-only process environment
    Env,
    /// Process-local map
    Memory,
}

impl BackendKind {
    /// Every recognized type, in display order.
    pub const ALL: [BackendKind; 4] = [
        BackendKind::File,
        BackendKind::Keychain,
        BackendKind::Env,
        BackendKind::Memory,
    ];

    /// Identifier used in `.keyref.toml`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::File => "file",
            BackendKind::Keychain => "keychain",
            BackendKind::Env => "env",
            BackendKind::Memory => "memory",
        }
    }

    /// Comma-separated list of recognized identifiers.
    pub fn expected() -> String {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|k| k.as_str() == s).ok_or(())
    }
}

impl BackendConfig {
    /// Resolve the configured type into a known kind.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownBackendType` for unrecognized identifiers.
    pub fn kind(&self) -> Result<BackendKind> {
        let effective = self.effective_type();
        effective.parse().map_err(|_| {
            ConfigError::UnknownBackendType {
                name: self.name.clone(),
                kind: effective.to_string(),
                expected: BackendKind::expected(),
            }
            .into()
        })
    }
}

/// Construct a backend from its configuration.
///
/// # Errors
///
/// Returns `ConfigError::UnknownBackendType` for unknown types, or the
/// vendor's construction error (missing identity, unsupported platform).
pub fn build(config: &BackendConfig) -> Result<Box<dyn Backend>> {
    let kind = config.kind()?;
    debug!(backend = %config.name, kind = %kind, "building backend");

    match kind {
        BackendKind::File => Ok(Box::new(FileBackend::from_config(config)?)),
        BackendKind::Keychain => keychain_from_config(config),
        BackendKind::Env => Ok(Box::new(EnvBackend::from_config(config))),
        BackendKind::Memory => Ok(Box::new(MemoryBackend::new(&config.name))),
    }
}

#[cfg(target_os = "macos")]
fn keychain_from_config(config: &BackendConfig) -> Result<Box<dyn Backend>> {
    Ok(Box::new(KeychainBackend::from_config(config)))
}

#[cfg(not(target_os = "macos"))]
fn keychain_from_config(config: &BackendConfig) -> Result<Box<dyn Backend>> {
    Err(crate::error::BackendError::Unsupported {
        backend: config.name.clone(),
        operation: "keychain storage on this platform",
    }
    .into())
}
