//! Key namespacing.
//!
//! Several projects (and profiles of one project) can share one physical
//! store. [`NamespacedBackend`] prefixes every key with `<project>/` or
//! `<project>/<profile>/` before delegating, and hides keys outside its
//! prefix from `list`.
//!
//! Namespace components are validated to never contain `/`, which keeps
//! wrapping injective for a given namespace.

use tracing::trace;

use super::Backend;
use crate::core::constants::NAMESPACE_SEPARATOR;
use crate::core::validation::validate_name;
use crate::error::Result;

/// A key-prefixing scheme.
///
/// Profile namespaces nest inside their project's prefix: the project key
/// `prod/x` and the key `x` of profile `prod` are the same physical key
/// (`<project>/prod/x`), and a project-level `list` includes every profile's
/// keys under their `<profile>/` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Namespace {
    /// `<project>/<key>`
    Project(String),
    /// `<project>/<profile>/<key>`
    Profile { project: String, profile: String },
}

impl Namespace {
    /// Project namespace.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidName` if the project name is invalid.
    pub fn project(project: &str) -> Result<Self> {
        validate_name("project", project)?;
        Ok(Self::Project(project.to_string()))
    }

    /// Profile namespace within a project.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidName` if either name is invalid.
    pub fn profile(project: &str, profile: &str) -> Result<Self> {
        validate_name("project", project)?;
        validate_name("profile", profile)?;
        Ok(Self::Profile {
            project: project.to_string(),
            profile: profile.to_string(),
        })
    }

    /// Project or profile namespace depending on whether a profile is set.
    pub fn for_profile(project: &str, profile: Option<&str>) -> Result<Self> {
        match profile {
            Some(profile) => Self::profile(project, profile),
            None => Self::project(project),
        }
    }

    /// The project namespace a profile namespace falls back to.
    pub fn parent(&self) -> Option<Namespace> {
        match self {
            Self::Project(_) => None,
            Self::Profile { project, .. } => Some(Self::Project(project.clone())),
        }
    }

    /// Prefix including the trailing separator.
    pub fn prefix(&self) -> String {
        match self {
            Self::Project(project) => format!("{}{}", project, NAMESPACE_SEPARATOR),
            Self::Profile { project, profile } => format!(
                "{}{sep}{}{sep}",
                project,
                profile,
                sep = NAMESPACE_SEPARATOR
            ),
        }
    }

    /// Physical key for a logical key.
    pub fn wrap_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix(), key)
    }

    /// Logical key for a physical key, if it belongs to this namespace.
    pub fn unwrap_key<'a>(&self, wrapped: &'a str) -> Option<&'a str> {
        wrapped
            .strip_prefix(self.prefix().as_str())
            .filter(|key| !key.is_empty())
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project(project) => write!(f, "{}", project),
            Self::Profile { project, profile } => write!(f, "{}/{}", project, profile),
        }
    }
}

/// A backend view restricted to one namespace.
///
/// Borrows the wrapped backend; the registry keeps ownership.
pub struct NamespacedBackend<'a> {
    inner: &'a dyn Backend,
    namespace: Namespace,
}

impl<'a> NamespacedBackend<'a> {
    pub fn new(inner: &'a dyn Backend, namespace: Namespace) -> Self {
        Self { inner, namespace }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }
}

impl Backend for NamespacedBackend<'_> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn get(&self, key: &str) -> Result<String> {
        trace!(backend = %self.inner.name(), namespace = %self.namespace, key, "get");
        self.inner.get(&self.namespace.wrap_key(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        trace!(backend = %self.inner.name(), namespace = %self.namespace, key, "set");
        self.inner.set(&self.namespace.wrap_key(key), value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(&self.namespace.wrap_key(key))
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self
            .inner
            .list()?
            .iter()
            .filter_map(|k| self.namespace.unwrap_key(k))
            .map(str::to_string)
            .collect())
    }

    fn close(&self) -> Result<()> {
        // The registry owns and closes the wrapped backend.
        Ok(())
    }
}

/// Get `key` from `namespace`, falling back to the project namespace when a
/// profile namespace reports NotFound.
///
/// # Errors
///
/// Returns the NotFound from the last namespace tried, or the first vendor
/// error encountered.
pub fn get_with_fallback(backend: &dyn Backend, namespace: &Namespace, key: &str) -> Result<String> {
    match NamespacedBackend::new(backend, namespace.clone()).get(key) {
        Err(e) if e.is_not_found() => match namespace.parent() {
            Some(parent) => {
                trace!(backend = %backend.name(), namespace = %parent, key, "falling back to project namespace");
                NamespacedBackend::new(backend, parent).get(key)
            }
            None => Err(e),
        },
        other => other,
    }
}
