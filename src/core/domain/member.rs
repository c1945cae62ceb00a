//! Team member representation.
//!
//! A team member is a named age public key entitled to decrypt sync envelopes.

use serde::{Deserialize, Serialize};

use crate::core::cipher;
use crate::core::types::{MemberName, PublicKey};
use crate::core::validation;
use crate::error::Result;

/// A team member who can decrypt sync envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: MemberName,
    pub public_key: PublicKey,
}

impl TeamMember {
    /// Create a new team member, validating the name and public key.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name is invalid, or
    /// `CipherError::InvalidPublicKey` if the key is not an age recipient.
    pub fn new(name: impl Into<MemberName>, public_key: impl Into<PublicKey>) -> Result<Self> {
        let member = Self {
            name: name.into(),
            public_key: public_key.into(),
        };
        member.validate()?;
        Ok(member)
    }

    /// Check the name and public key.
    pub fn validate(&self) -> Result<()> {
        validation::validate_name("member", &self.name)?;
        cipher::parse_recipient(&self.public_key)?;
        Ok(())
    }

    /// Shortened public key for display.
    pub fn short_key(&self) -> String {
        if self.public_key.len() > 24 {
            format!("{}...", &self.public_key[..24])
        } else {
            self.public_key.clone()
        }
    }
}

impl std::fmt::Display for TeamMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
