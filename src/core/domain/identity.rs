//! Identity type.
//!
//! Wraps an age private key. The user's identity lives in `~/.keyref/identity`
//! and is used both to encrypt file-backend stores and to open sync envelopes.

use std::fs;
use std::path::{Path, PathBuf};

use age::secrecy::ExposeSecret;
use age::x25519;
use tracing::{debug, warn};

use crate::core::constants;
use crate::core::types::PublicKey;
use crate::error::{IdentityError, Result};

/// A private key identity for decrypting secrets
pub struct Identity {
    inner: x25519::Identity,
    path: PathBuf,
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("public_key", &self.public_key())
            .field("path", &self.path)
            .finish()
    }
}

impl Identity {
    /// Wrap an in-memory age identity.
    pub fn from_parts(inner: x25519::Identity, path: PathBuf) -> Self {
        Self { inner, path }
    }

    /// Load the first identity from a key file.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::NotFound` if the file doesn't exist, or
    /// `IdentityError::InvalidFormat` if it holds no valid age identity.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_all(path)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                IdentityError::InvalidFormat(format!("no identity in {}", path.display())).into()
            })
    }

    /// Load every identity from a key file.
    ///
    /// The file holds one `AGE-SECRET-KEY-...` per line; blank lines and
    /// `#` comments are ignored.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the file is missing or any line is malformed.
    pub fn load_all(path: &Path) -> Result<Vec<Self>> {
        debug!(path = %path.display(), "loading identity");

        if !path.exists() {
            return Err(IdentityError::NotFound(path.display().to_string()).into());
        }

        #[cfg(unix)]
        {
            if crate::core::validation::validate_file_permissions(path, 0o600).is_err() {
                warn!(path = %path.display(), "insecure key file permissions");
            }
        }

        let contents = fs::read_to_string(path).map_err(IdentityError::ReadFailed)?;

        let mut identities = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let inner: x25519::Identity = line
                .parse()
                .map_err(|e: &str| IdentityError::InvalidFormat(e.to_string()))?;
            identities.push(Self::from_parts(inner, path.to_path_buf()));
        }

        debug!(count = identities.len(), "identities loaded");
        Ok(identities)
    }

    /// Generate a new identity and save it to `path` with 0600 permissions.
    ///
    /// Also writes the public key next to it as `<path>.pub`.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::WriteFailed` if the key cannot be written.
    pub fn generate(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "generating new identity");

        let inner = x25519::Identity::generate();

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(IdentityError::WriteFailed)?;
        }

        let secret = inner.to_string();
        fs::write(path, format!("{}\n", secret.expose_secret()))
            .map_err(IdentityError::WriteFailed)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .map_err(IdentityError::WriteFailed)?;
        }

        let identity = Self::from_parts(inner, path.to_path_buf());
        let mut pub_path = path.as_os_str().to_owned();
        pub_path.push(".pub");
        fs::write(PathBuf::from(pub_path), format!("{}\n", identity.public_key()))
            .map_err(IdentityError::WriteFailed)?;

        debug!(path = %path.display(), "identity saved");
        Ok(identity)
    }

    /// Corresponding public key
    pub fn public_key(&self) -> PublicKey {
        self.inner.to_public().to_string()
    }

    /// The age recipient for this identity
    pub fn to_recipient(&self) -> x25519::Recipient {
        self.inner.to_public()
    }

    /// Reference to the inner age identity for decryption
    pub fn as_age(&self) -> &x25519::Identity {
        &self.inner
    }

    /// Key file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Per-user state directory (`~/.keyref`)
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(IdentityError::NoHome)?;
        Ok(home.join(constants::HOME_DIR))
    }

    /// Global identity path (`~/.keyref/identity`)
    pub fn global_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join(constants::IDENTITY_FILE))
    }

    /// Check if the global identity exists
    pub fn has_global() -> Result<bool> {
        Ok(Self::global_path()?.exists())
    }

    /// Load the global identity
    pub fn load_global() -> Result<Self> {
        Self::load(&Self::global_path()?)
    }

    /// Load the global identity, generating it on first use.
    pub fn load_or_generate_global() -> Result<Self> {
        let path = Self::global_path()?;
        if path.exists() {
            Self::load(&path)
        } else {
            Self::generate(&path)
        }
    }
}
