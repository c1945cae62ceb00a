//! Env layering for a project directory.
//!
//! Layers, lowest to highest precedence: `.env`, `.env.<profile>`,
//! `.env.local`. The base file is required; the others are optional.

use std::path::Path;

use tracing::debug;

use crate::core::constants;
use crate::core::domain::Env;
use crate::core::validation::validate_name;
use crate::error::Result;

/// Load and merge the env layers in `dir`.
///
/// # Errors
///
/// Returns an io `NotFound` error if `.env` is missing, a validation error
/// for an invalid profile name, or any read error.
pub fn load_layers(dir: &Path, profile: Option<&str>) -> Result<Env> {
    let base = Env::load(dir.join(constants::ENV_FILE))?;

    let overlay = match profile {
        Some(profile) => {
            validate_name("profile", profile)?;
            Env::load_optional(dir.join(constants::profile_env_file(profile)))?
        }
        None => Env::new(),
    };

    let local = Env::load_optional(dir.join(constants::LOCAL_ENV_FILE))?;

    let merged = Env::merge([&base, &overlay, &local]);
    debug!(
        base = base.len(),
        profile = overlay.len(),
        local = local.len(),
        merged = merged.len(),
        "env layers merged"
    );
    Ok(merged)
}
