//! Per-invocation project state shared by commands.

use crate::cli::Scope;
use crate::core::backend::{Namespace, Registry};
use crate::core::config::Config;
use crate::error::Result;

/// The loaded `.keyref.toml`.
pub struct Project {
    pub config: Config,
}

impl Project {
    /// Load the config from the current directory.
    pub fn open() -> Result<Self> {
        Ok(Self {
            config: Config::load()?,
        })
    }

    pub fn name(&self) -> &str {
        self.config.project_name()
    }

    /// Project or profile namespace.
    pub fn namespace(&self, profile: Option<&str>) -> Result<Namespace> {
        Namespace::for_profile(self.name(), profile)
    }

    /// Build every configured backend.
    pub fn registry(&self) -> Result<Registry> {
        Registry::from_configs(&self.config.backends)
    }

    /// Namespace and registry for a scoped secret command.
    ///
    /// The namespace is validated before any backend is built.
    pub fn open_scope(&self, scope: &Scope) -> Result<(Namespace, Registry)> {
        let namespace = self.namespace(scope.profile.as_deref())?;
        let registry = self.registry()?;
        Ok((namespace, registry))
    }
}
