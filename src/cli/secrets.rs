//! Secret management commands.
//!
//! Keys are logical paths inside the project (or profile) namespace.

use tracing::info;
use zeroize::Zeroizing;

use crate::cli::project::Project;
use crate::cli::{output, Scope};
use crate::core::backend::{get_with_fallback, Backend, NamespacedBackend};
use crate::core::resolve::Resolver;
use crate::core::validation::{validate_key, validate_value};
use crate::error::Result;

/// Store a secret in the selected backend.
pub fn set(key: &str, value: &str, scope: &Scope) -> Result<()> {
    validate_key(key)?;
    validate_value(key, value)?;

    let project = Project::open()?;
    let (namespace, mut registry) = project.open_scope(scope)?;
    let backend = registry.select(scope.backend.as_deref())?;
    let backend_name = backend.name().to_string();

    NamespacedBackend::new(backend, namespace.clone()).set(key, value)?;
    registry.close_all()?;

    info!(key = %key, backend = %backend_name, namespace = %namespace, "secret set");
    output::success(&format!("set {} in {}", output::key(key), backend_name));
    Ok(())
}

/// Print a secret.
///
/// Without `--backend`, backends are tried in order like reference
/// resolution does.
pub fn get(key: &str, scope: &Scope) -> Result<()> {
    validate_key(key)?;

    let project = Project::open()?;
    let (namespace, mut registry) = project.open_scope(scope)?;

    let value = Zeroizing::new(match scope.backend.as_deref() {
        Some(name) => get_with_fallback(registry.select(Some(name))?, &namespace, key)?,
        None => Resolver::new(&registry, namespace).lookup(key)?,
    });
    registry.close_all()?;

    output::data(&value);
    Ok(())
}

/// Remove a secret from the selected backend.
pub fn rm(key: &str, scope: &Scope) -> Result<()> {
    validate_key(key)?;

    let project = Project::open()?;
    let (namespace, mut registry) = project.open_scope(scope)?;
    let backend = registry.select(scope.backend.as_deref())?;
    let backend_name = backend.name().to_string();

    NamespacedBackend::new(backend, namespace).delete(key)?;
    registry.close_all()?;

    info!(key = %key, backend = %backend_name, "secret removed");
    output::success(&format!("removed {} from {}", output::key(key), backend_name));
    Ok(())
}

/// List secret paths in the selected backend.
pub fn list(scope: &Scope, json: bool) -> Result<()> {
    let project = Project::open()?;
    let (namespace, mut registry) = project.open_scope(scope)?;
    let backend = registry.select(scope.backend.as_deref())?;
    let backend_name = backend.name().to_string();

    let keys = NamespacedBackend::new(backend, namespace.clone()).list()?;
    registry.close_all()?;

    if json {
        let result = serde_json::json!({
            "backend": backend_name,
            "namespace": namespace.to_string(),
            "keys": keys,
            "count": keys.len(),
        });
        output::data(&serde_json::to_string_pretty(&result)?);
    } else if keys.is_empty() {
        output::dimmed(&format!("no secrets in {} ({})", backend_name, namespace));
    } else {
        output::section(&format!(
            "{} secrets in {} ({})",
            keys.len(),
            backend_name,
            namespace
        ));
        for key in &keys {
            output::list_item(key);
        }
    }

    Ok(())
}
