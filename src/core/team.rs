//! Team member management.
//!
//! The roster lives in `.keyref.toml`; every change rewrites the whole
//! config so a failed add or remove leaves the file untouched.

use tracing::info;

use crate::core::config::Config;
use crate::core::domain::TeamMember;
use crate::error::{ConfigError, Result};

/// Add a team member by their age public key.
///
/// # Errors
///
/// Returns `ConfigError::MemberExists` if the name is taken, or a
/// validation error for a bad name or key. The config is not saved on error.
pub fn add(config: &mut Config, name: &str, public_key: &str) -> Result<()> {
    if config.member(name).is_some() {
        return Err(ConfigError::MemberExists(name.to_string()).into());
    }

    let member = TeamMember::new(name, public_key.trim())?;
    config.team.push(member);
    if let Err(e) = config.save() {
        config.team.pop();
        return Err(e);
    }

    info!(member = %name, "team member added");
    Ok(())
}

/// Remove a team member.
///
/// Envelopes already exported for this member stay readable by them;
/// only future exports exclude them.
///
/// # Errors
///
/// Returns `ConfigError::MemberNotFound` if no member has that name.
pub fn remove(config: &mut Config, name: &str) -> Result<()> {
    let index = config
        .team
        .iter()
        .position(|m| m.name == name)
        .ok_or_else(|| ConfigError::MemberNotFound(name.to_string()))?;

    let member = config.team.remove(index);
    if let Err(e) = config.save() {
        config.team.insert(index, member);
        return Err(e);
    }

    info!(member = %name, "team member removed");
    Ok(())
}

/// Team members in roster order.
pub fn list(config: &Config) -> &[TeamMember] {
    &config.team
}
