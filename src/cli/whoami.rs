//! Whoami command - print your public key.

use crate::cli::output;
use crate::core::domain::Identity;
use crate::error::{IdentityError, Result};

/// Print your public key.
pub fn execute() -> Result<()> {
    let path = Identity::global_path()?;
    if !path.exists() {
        return Err(IdentityError::NotFound(path.display().to_string()).into());
    }

    let identity = Identity::load(&path)?;
    output::data(&identity.public_key());
    Ok(())
}
