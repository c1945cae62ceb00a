//! Resolution results.

use crate::core::domain::env::Entry;
use crate::error::{ResolveError, Result};

/// A reference that could not be resolved.
#[derive(Debug)]
pub struct KeyError {
    /// Env key whose reference failed
    pub key: String,
    pub cause: ResolveError,
}

impl std::fmt::Display for KeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.cause)
    }
}

/// Outcome of resolving an env.
///
/// Entries keep their original order. Unresolved entries keep their
/// `ref://` token as value and have a matching [`KeyError`].
#[derive(Debug)]
pub struct Resolution {
    entries: Vec<Entry>,
    errors: Vec<KeyError>,
    references: usize,
}

impl Resolution {
    pub(crate) fn new(entries: Vec<Entry>, errors: Vec<KeyError>, references: usize) -> Self {
        Self {
            entries,
            errors,
            references,
        }
    }

    /// A resolution that had nothing to resolve.
    pub fn unchanged(entries: Vec<Entry>) -> Self {
        Self::new(entries, Vec::new(), 0)
    }

    /// True when every reference resolved.
    pub fn is_resolved(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn errors(&self) -> &[KeyError] {
        &self.errors
    }

    /// Number of reference entries that were attempted.
    pub fn references(&self) -> usize {
        self.references
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Escalate key errors to a single failure.
    ///
    /// Fails when `strict` is set and any key failed, or when every
    /// reference failed regardless of mode.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::Partial` with the failure count.
    pub fn ensure(&self, strict: bool) -> Result<()> {
        let failed = self.errors.len();
        if failed == 0 {
            return Ok(());
        }
        if strict || failed == self.references {
            return Err(ResolveError::Partial {
                failed,
                total: self.references,
            }
            .into());
        }
        Ok(())
    }
}
