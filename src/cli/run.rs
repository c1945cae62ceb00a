//! Run command.
//!
//! Executes a command with the resolved env layered over the current
//! process environment.

use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::resolve::resolve_env;
use crate::error::{Error, Result};

/// Run `command`, returning its exit code.
pub fn execute(profile: Option<&str>, strict: bool, command: &[String]) -> Result<i32> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| Error::Other("no command specified".to_string()))?;

    let entries = resolve_env(profile, strict)?;

    let mut cmd = std::process::Command::new(program);
    cmd.args(args);

    debug!(program = %program, vars = entries.len(), "spawning");
    for entry in entries {
        let value = Zeroizing::new(entry.value);
        cmd.env(&entry.key, value.as_str());
    }

    let status = cmd
        .status()
        .map_err(|e| Error::Other(format!("failed to run {}: {}", program, e)))?;

    // Killed by a signal: no exit code.
    Ok(status.code().unwrap_or(1))
}
