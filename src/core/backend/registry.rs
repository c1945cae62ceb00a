//! Backend registry.
//!
//! Owns the backends built for one command invocation, in declaration
//! order. Backends are closed exactly once: explicitly via
//! [`Registry::close_all`], or on drop if that never happened, so every
//! early-return path still releases vendor resources.

use tracing::{debug, warn};

use super::{build, Backend};
use crate::core::config::BackendConfig;
use crate::error::{BackendError, ConfigError, Result};

/// Named, ordered collection of live backends.
#[derive(Default)]
pub struct Registry {
    backends: Vec<Box<dyn Backend>>,
    closed: bool,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("backends", &self.names())
            .field("closed", &self.closed)
            .finish()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every configured backend, in order.
    ///
    /// Fails on the first unknown type or construction error; backends
    /// already built are closed when the partial registry is dropped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unknown types or duplicate names, or the
    /// vendor's construction error.
    pub fn from_configs(configs: &[BackendConfig]) -> Result<Self> {
        let mut registry = Self::new();
        for config in configs {
            if registry.backend(&config.name).is_some() {
                return Err(ConfigError::DuplicateBackend(config.name.clone()).into());
            }
            registry.register(build(config)?)?;
        }
        debug!(backends = registry.len(), "registry built");
        Ok(registry)
    }

    /// Add a backend under its own name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateBackend` if the name is taken.
    pub fn register(&mut self, backend: Box<dyn Backend>) -> Result<()> {
        if self.backend(backend.name()).is_some() {
            return Err(ConfigError::DuplicateBackend(backend.name().to_string()).into());
        }
        self.backends.push(backend);
        Ok(())
    }

    /// Look up a backend by name; `None` if not registered.
    pub fn backend(&self, name: &str) -> Option<&dyn Backend> {
        self.backends
            .iter()
            .find(|b| b.name() == name)
            .map(|b| b.as_ref())
    }

    /// The first registered backend.
    pub fn default_backend(&self) -> Option<&dyn Backend> {
        self.backends.first().map(|b| b.as_ref())
    }

    /// Named backend, or the default one when `name` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::BackendNotConfigured` for an unknown name, or
    /// `ConfigError::NoBackends` if the registry is empty.
    pub fn select(&self, name: Option<&str>) -> Result<&dyn Backend> {
        match name {
            Some(name) => self
                .backend(name)
                .ok_or_else(|| ConfigError::BackendNotConfigured(name.to_string()).into()),
            None => self
                .default_backend()
                .ok_or_else(|| ConfigError::NoBackends.into()),
        }
    }

    /// Backends in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Backend> {
        self.backends.iter().map(|b| b.as_ref())
    }

    /// Backend names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Close every backend, continuing past failures.
    ///
    /// Idempotent: a second call is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Close` listing every backend that failed.
    pub fn close_all(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let failures: Vec<String> = self
            .backends
            .iter()
            .filter_map(|b| match b.close() {
                Ok(()) => None,
                Err(e) => {
                    warn!(backend = %b.name(), error = %e, "failed to close backend");
                    Some(format!("{}: {}", b.name(), e))
                }
            })
            .collect();

        debug!(backends = self.backends.len(), failed = failures.len(), "registry closed");

        if failures.is_empty() {
            Ok(())
        } else {
            Err(BackendError::Close {
                count: failures.len(),
                details: failures.join("; "),
            }
            .into())
        }
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        // Errors were already logged per backend.
        let _ = self.close_all();
    }
}
