//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// An age public key string (starts with "age1...").
pub type PublicKey = String;

/// A team member name.
pub type MemberName = String;

/// A configured backend label.
pub type BackendName = String;
