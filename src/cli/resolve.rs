//! Resolve command - print the merged env with references resolved.

use std::path::Path;

use serde_json::{Map, Value};

use crate::cli::project::Project;
use crate::cli::{output, Format};
use crate::core::domain::env::to_env_string;
use crate::core::domain::Entry;
use crate::core::env::load_layers;
use crate::core::resolve::resolve_with;
use crate::error::Result;

/// Print the resolved env.
pub fn execute(profile: Option<&str>, strict: bool, format: Format) -> Result<()> {
    let entries = resolve_env(profile, strict)?;

    match format {
        Format::Env => output::raw(&to_env_string(&entries)),
        // serde_json preserve_order keeps definition order in the map.
        Format::Json => {
            let map: Map<String, Value> = entries
                .into_iter()
                .map(|e| (e.key, Value::String(e.value)))
                .collect();
            output::data(&serde_json::to_string_pretty(&map)?);
        }
    }
    Ok(())
}

/// Load the env layers for `profile` and resolve their references.
///
/// Unresolved keys are printed as warnings. The call fails in strict mode
/// if any key failed, and in any mode if every reference failed.
pub(crate) fn resolve_env(profile: Option<&str>, strict: bool) -> Result<Vec<Entry>> {
    let project = Project::open()?;
    let namespace = project.namespace(profile)?;
    let env = load_layers(Path::new("."), profile)?;

    let resolution = resolve_with(&env, namespace, || project.registry())?;

    for error in resolution.errors() {
        output::warn(&error.to_string());
    }
    resolution.ensure(strict)?;

    Ok(resolution.into_entries())
}
