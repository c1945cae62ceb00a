//! Sync commands - share a namespace as an encrypted envelope.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::cli::project::Project;
use crate::cli::{output, Scope};
use crate::core::backend::NamespacedBackend;
use crate::core::domain::Identity;
use crate::core::sync;
use crate::error::Result;

const STDIO: &str = "-";

/// Export the selected namespace for the team plus `recipients`.
///
/// Nothing is written unless the whole export succeeds.
pub fn export(scope: &Scope, output_path: &str, recipients: &[String]) -> Result<()> {
    let project = Project::open()?;
    let recipients = sync::collect_recipients(&project.config.team, recipients)?;

    let (namespace, mut registry) = project.open_scope(scope)?;
    let backend = registry.select(scope.backend.as_deref())?;
    let envelope = sync::export(&NamespacedBackend::new(backend, namespace), &recipients)?;
    registry.close_all()?;

    if output_path == STDIO {
        output::raw(&envelope);
    } else {
        write_atomic(Path::new(output_path), &envelope)?;
        output::success(&format!(
            "exported to {} for {} recipients",
            output_path,
            recipients.len()
        ));
    }
    Ok(())
}

/// Import an envelope into the selected backend and namespace.
pub fn import(scope: &Scope, input: &str, identity_files: &[PathBuf], force: bool) -> Result<()> {
    let envelope = if input == STDIO {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)?
    };

    let identities = if identity_files.is_empty() {
        vec![Identity::load_global()?]
    } else {
        let mut identities = Vec::new();
        for path in identity_files {
            identities.extend(Identity::load_all(path)?);
        }
        identities
    };

    let project = Project::open()?;
    let (namespace, mut registry) = project.open_scope(scope)?;
    let backend = registry.select(scope.backend.as_deref())?;
    let report = sync::import(
        &envelope,
        &identities,
        &NamespacedBackend::new(backend, namespace),
        force,
    )?;
    registry.close_all()?;

    output::success(&format!(
        "imported {}, skipped {}",
        report.imported.len(),
        report.skipped.len()
    ));
    for key in &report.skipped {
        output::list_item(&format!("{} (exists, use --force to overwrite)", output::key(key)));
    }
    Ok(())
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("tmp");
    {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}
