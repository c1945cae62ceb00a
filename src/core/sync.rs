//! Sync envelopes.
//!
//! An envelope is a point-in-time snapshot of one namespace: a JSON object
//! of key/value strings, age-encrypted once for every recipient and ASCII
//! armored so it can be committed to version control.
//!
//! Keys are serialized in sorted order, so exporting the same set twice
//! produces the same plaintext.

use std::collections::{BTreeMap, HashSet};

use age::x25519;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::core::backend::Backend;
use crate::core::cipher;
use crate::core::domain::{Identity, SyncReport, TeamMember};
use crate::core::validation::validate_key;
use crate::error::{CipherError, CodecError, Error, Result};

/// Parse the union of team and ad hoc recipients, dropping duplicates.
///
/// # Errors
///
/// Returns `CodecError::NoRecipients` if the union is empty, or
/// `CipherError::InvalidPublicKey` for an unparseable key.
pub fn collect_recipients(team: &[TeamMember], extra: &[String]) -> Result<Vec<x25519::Recipient>> {
    let mut seen = HashSet::new();
    let mut recipients = Vec::new();

    let keys = team
        .iter()
        .map(|m| m.public_key.as_str())
        .chain(extra.iter().map(String::as_str));

    for key in keys {
        let key = key.trim();
        if seen.insert(key.to_string()) {
            recipients.push(cipher::parse_recipient(key)?);
        }
    }

    if recipients.is_empty() {
        return Err(CodecError::NoRecipients.into());
    }
    Ok(recipients)
}

/// Export every key visible through `view` as an armored envelope.
///
/// Reads are sequential; the first failing `get` aborts the export.
///
/// # Errors
///
/// Returns `CodecError::NoRecipients` before touching the backend when
/// `recipients` is empty, `CodecError::NoSecrets` when the view holds no
/// keys, or the backend's error.
pub fn export(view: &dyn Backend, recipients: &[x25519::Recipient]) -> Result<String> {
    if recipients.is_empty() {
        return Err(CodecError::NoRecipients.into());
    }

    let keys = view.list()?;
    if keys.is_empty() {
        return Err(CodecError::NoSecrets.into());
    }

    let mut secrets = BTreeMap::new();
    for key in keys {
        let value = view.get(&key)?;
        secrets.insert(key, value);
    }

    let plaintext = Zeroizing::new(serde_json::to_string(&secrets)?);
    let envelope = cipher::encrypt(&plaintext, recipients)?;

    info!(
        backend = %view.name(),
        keys = secrets.len(),
        recipients = recipients.len(),
        "envelope exported"
    );
    Ok(envelope)
}

/// Decrypt and parse an envelope.
///
/// # Errors
///
/// Returns `CodecError::NoIdentities`, `CodecError::NoMatchingIdentity`, or
/// `CodecError::Malformed` for anything that is not a valid envelope.
pub fn decode(envelope: &str, identities: &[Identity]) -> Result<BTreeMap<String, String>> {
    if identities.is_empty() {
        return Err(CodecError::NoIdentities.into());
    }
    let keys: Vec<&x25519::Identity> = identities.iter().map(Identity::as_age).collect();

    let plaintext = Zeroizing::new(cipher::decrypt(envelope, &keys).map_err(|e| match e {
        Error::Cipher(CipherError::NoMatchingKeys) => Error::from(CodecError::NoMatchingIdentity),
        other => CodecError::Malformed(other.to_string()).into(),
    })?);

    let secrets: BTreeMap<String, String> = serde_json::from_str(&plaintext)
        .map_err(|e| CodecError::Malformed(format!("invalid payload: {}", e)))?;

    for key in secrets.keys() {
        validate_key(key).map_err(|e| CodecError::Malformed(e.to_string()))?;
    }

    debug!(keys = secrets.len(), "envelope decoded");
    Ok(secrets)
}

/// Import an envelope into `target`.
///
/// The envelope is fully decrypted and validated before the first write.
/// Keys already present are skipped unless `force` is set. Keys absent
/// from the envelope are never deleted, so importing the same envelope
/// again converges to the same key set.
///
/// # Errors
///
/// Returns any [`decode`] error without writing, or the first backend
/// error. Writes made before a backend error are kept; rerunning the
/// import completes it.
pub fn import(
    envelope: &str,
    identities: &[Identity],
    target: &dyn Backend,
    force: bool,
) -> Result<SyncReport> {
    let secrets = decode(envelope, identities)?;
    let mut report = SyncReport::default();

    for (key, value) in &secrets {
        let exists = match target.get(key) {
            Ok(_) => true,
            Err(e) if e.is_not_found() => false,
            Err(e) => return Err(e),
        };

        if exists && !force {
            debug!(key = %key, "key exists, skipping");
            report.skipped.push(key.clone());
            continue;
        }

        target.set(key, value)?;
        report.imported.push(key.clone());
    }

    info!(
        backend = %target.name(),
        imported = report.imported.len(),
        skipped = report.skipped.len(),
        "envelope imported"
    );
    Ok(report)
}
