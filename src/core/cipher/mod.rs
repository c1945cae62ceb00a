//! Cryptographic operations.
//!
//! keyref does not implement any primitive itself: it composes age
//! (x25519 recipients, ASCII armor) behind the [`Cipher`] trait. Each
//! recipient gets an independently wrapped file key, so any one matching
//! identity can decrypt.

use crate::error::Result;
use ::age::x25519;

mod age;

pub use age::{parse_recipient, Age};

/// Cryptographic backend trait.
pub trait Cipher {
    /// Type representing a recipient public key.
    type Recipient;

    /// Type representing a private identity/key.
    type Identity;

    /// Encrypt plaintext once for all `recipients`.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if encryption fails or `recipients` is empty.
    fn encrypt(&self, plaintext: &str, recipients: &[Self::Recipient]) -> Result<String>;

    /// Decrypt with whichever of `identities` matches a recipient stanza.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::NoMatchingKeys` if none of the identities match,
    /// or `CipherError::DecryptionFailed` if the input is not valid ciphertext.
    fn decrypt(&self, encrypted: &str, identities: &[&Self::Identity]) -> Result<String>;
}

/// Encrypt plaintext for multiple age recipients.
///
/// Convenience wrapper around `Age::encrypt`.
///
/// # Returns
///
/// ASCII-armored encrypted string that any recipient can decrypt.
pub fn encrypt(plaintext: &str, recipients: &[x25519::Recipient]) -> Result<String> {
    Age.encrypt(plaintext, recipients)
}

/// Decrypt an age-encrypted string with any of the given identities.
///
/// Convenience wrapper around `Age::decrypt`.
pub fn decrypt(encrypted: &str, identities: &[&x25519::Identity]) -> Result<String> {
    Age.decrypt(encrypted, identities)
}
