//! Reference resolution.
//!
//! Replaces every `ref://<path>` value in a merged env with the secret held
//! by the first backend, in declaration order, that has `<path>` in the
//! active namespace. A failing key is recorded and the rest continue.
//!
//! ## Lookup order
//!
//! For each backend in order, the profile namespace is tried first and the
//! project namespace second. The first value found wins, so a backend
//! declared earlier always shadows a later one.
//!
//! ## Nested references
//!
//! A resolved value that is itself a reference is resolved again. Each
//! chain tracks the paths it visited: revisiting one is a cycle, and a
//! chain longer than [`MAX_REF_DEPTH`] is rejected.

use tracing::{debug, trace, warn};

use crate::core::backend::{get_with_fallback, Namespace, Registry};
use crate::core::constants::MAX_REF_DEPTH;
use crate::core::domain::env::{is_reference, reference_path};
use crate::core::domain::{Entry, Env, KeyError, Resolution};
use crate::error::{ConfigError, Error, ResolveError, Result};

/// Resolves references against a built registry.
pub struct Resolver<'a> {
    registry: &'a Registry,
    namespace: Namespace,
    max_depth: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a Registry, namespace: Namespace) -> Self {
        Self {
            registry,
            namespace,
            max_depth: MAX_REF_DEPTH,
        }
    }

    /// Bound on nested reference chains.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve every reference entry of `env`.
    ///
    /// Never fails as a whole: per-key failures are collected in the
    /// returned [`Resolution`].
    pub fn resolve(&self, env: &Env) -> Resolution {
        let mut entries = Vec::with_capacity(env.len());
        let mut errors = Vec::new();
        let mut references = 0;

        for entry in env.entries() {
            if !entry.was_ref {
                entries.push(entry.clone());
                continue;
            }
            references += 1;

            match self.resolve_entry(&entry.value) {
                Ok(value) => entries.push(Entry {
                    key: entry.key.clone(),
                    value,
                    was_ref: true,
                }),
                Err(cause) => {
                    debug!(key = %entry.key, error = %cause, "reference unresolved");
                    errors.push(KeyError {
                        key: entry.key.clone(),
                        cause,
                    });
                    entries.push(entry.clone());
                }
            }
        }

        debug!(
            references,
            failed = errors.len(),
            namespace = %self.namespace,
            "resolution finished"
        );
        Resolution::new(entries, errors, references)
    }

    fn resolve_entry(&self, token: &str) -> std::result::Result<String, ResolveError> {
        let mut visited: Vec<String> = Vec::new();
        let mut current = token.to_string();

        loop {
            let path = match reference_path(&current) {
                Some(path) if !path.is_empty() => path.to_string(),
                _ => return Err(ResolveError::EmptyPath(current)),
            };

            if visited.contains(&path) {
                visited.push(path);
                return Err(ResolveError::Cycle {
                    chain: visited.join(" -> "),
                });
            }
            if visited.len() >= self.max_depth {
                return Err(ResolveError::TooDeep {
                    path,
                    limit: self.max_depth,
                });
            }

            let value = self.lookup(&path)?;
            visited.push(path);

            if !is_reference(&value) {
                return Ok(value);
            }
            trace!(depth = visited.len(), "value is a nested reference");
            current = value;
        }
    }

    /// Fetch one path from the first backend that has it.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::NotFound` listing the backends tried, or
    /// `ResolveError::Backend` with the last vendor error seen.
    pub fn lookup(&self, path: &str) -> std::result::Result<String, ResolveError> {
        let mut last_error: Option<Error> = None;

        for backend in self.registry.iter() {
            match get_with_fallback(backend, &self.namespace, path) {
                Ok(value) => {
                    debug!(backend = %backend.name(), path, "reference resolved");
                    return Ok(value);
                }
                Err(e) if e.is_not_found() => {
                    trace!(backend = %backend.name(), path, "not found, trying next backend");
                }
                Err(e) => {
                    warn!(backend = %backend.name(), path, error = %e, "backend lookup failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(source) => Err(ResolveError::Backend {
                path: path.to_string(),
                source: Box::new(source),
            }),
            None => Err(ResolveError::NotFound {
                path: path.to_string(),
                tried: self.registry.names().join(", "),
            }),
        }
    }
}

/// Resolve `env`, building backends only if it contains references.
///
/// `build` is called at most once. The registry it returns is closed before
/// this function returns, on success and failure alike; close failures are
/// logged and do not affect the result.
///
/// # Errors
///
/// Returns the error from `build`, or `ConfigError::NoBackends` if
/// references exist but no backend is configured. Per-key failures are
/// reported in the returned [`Resolution`], not as an error.
pub fn resolve_with<F>(env: &Env, namespace: Namespace, build: F) -> Result<Resolution>
where
    F: FnOnce() -> Result<Registry>,
{
    if !env.has_references() {
        debug!(entries = env.len(), "no references, skipping backend construction");
        return Ok(Resolution::unchanged(env.entries().to_vec()));
    }

    let mut registry = build()?;
    if registry.is_empty() {
        return Err(ConfigError::NoBackends.into());
    }

    let resolution = Resolver::new(&registry, namespace).resolve(env);

    if let Err(e) = registry.close_all() {
        warn!(error = %e, "failed to close backends");
    }
    Ok(resolution)
}
