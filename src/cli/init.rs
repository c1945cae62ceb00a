//! Init command - create `.keyref.toml`.

use tracing::info;

use crate::cli::output;
use crate::core::config::{BackendConfig, Config};
use crate::core::domain::{Identity, TeamMember};
use crate::core::validation::validate_name;
use crate::error::{ConfigError, Error, Result};

/// Initialize keyref in the current directory.
///
/// Writes a config with one `file` backend named `local` and the caller as
/// the first team member, generating `~/.keyref/identity` if needed.
pub fn execute(project: Option<String>, name: Option<String>) -> Result<()> {
    if Config::exists() {
        return Err(ConfigError::AlreadyInitialized.into());
    }

    let project = match project {
        Some(project) => project,
        None => default_project_name()?,
    };
    let name = name.unwrap_or_else(whoami::username);
    validate_name("project", &project)?;
    validate_name("member", &name)?;

    let had_identity = Identity::has_global()?;
    let identity = Identity::load_or_generate_global()?;

    let mut config = Config::new(&project);
    config.backends.push(BackendConfig::new("local", "file"));
    config
        .team
        .push(TeamMember::new(name.as_str(), identity.public_key())?);
    config.validate()?;
    config.save()?;

    info!(project = %project, member = %name, "initialized");

    output::success(&format!("initialized {}", Config::config_path().display()));
    output::kv("project", &project);
    output::kv("backend", "local (file)");
    output::kv("member", &name);
    if !had_identity {
        output::kv("identity", identity.path().display());
    }
    Ok(())
}

fn default_project_name() -> Result<String> {
    let cwd = std::env::current_dir()?;
    cwd.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::Other("cannot infer project name; pass --project".to_string()))
}
