//! Team management commands.

use crate::cli::output;
use crate::core::config::Config;
use crate::core::team;
use crate::error::Result;

/// Add a team member.
pub fn add(name: &str, key: &str) -> Result<()> {
    let mut config = Config::load()?;
    team::add(&mut config, name, key)?;
    output::success(&format!("added {}", name));
    output::dimmed("future sync exports will include them");
    Ok(())
}

/// List team members.
pub fn list(json: bool) -> Result<()> {
    let config = Config::load()?;
    let members = team::list(&config);

    if json {
        output::data(&serde_json::to_string_pretty(members)?);
    } else if members.is_empty() {
        output::dimmed("no team members");
    } else {
        output::section(&format!("{} team members", members.len()));
        for member in members {
            output::kv(&member.name, member.short_key());
        }
    }

    Ok(())
}

/// Remove a team member.
pub fn rm(name: &str) -> Result<()> {
    let mut config = Config::load()?;
    team::remove(&mut config, name)?;
    output::success(&format!("removed {}", name));
    Ok(())
}
