//! Encrypted file backend.
//!
//! Stores all keys of one backend as a JSON object, age-encrypted to the
//! local identity, at `~/.keyref/stores/<name>.age` (or the configured
//! `path`). The file is re-read on every operation and replaced atomically
//! on every write, so nothing is cached between calls.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::Backend;
use crate::core::cipher;
use crate::core::config::BackendConfig;
use crate::core::constants;
use crate::core::domain::Identity;
use crate::error::{BackendError, Result};

/// age-encrypted JSON file store.
pub struct FileBackend {
    name: String,
    path: PathBuf,
    identity: Identity,
}

impl std::fmt::Debug for FileBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileBackend")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}

impl FileBackend {
    /// Open a store at `path`, encrypting to `identity`.
    pub fn new(name: &str, path: PathBuf, identity: Identity) -> Self {
        Self {
            name: name.to_string(),
            path,
            identity,
        }
    }

    /// Build from `[backends.config]`; recognizes `path`.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the local identity cannot be loaded.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let path = match config.option("path") {
            Some(path) => PathBuf::from(path),
            None => Self::default_path(&config.name)?,
        };
        let identity = Identity::load_global()?;
        Ok(Self::new(&config.name, path, identity))
    }

    /// Default store location for a backend name.
    pub fn default_path(name: &str) -> Result<PathBuf> {
        Ok(Identity::home_dir()?
            .join(constants::STORES_DIR)
            .join(format!("{}.age", name)))
    }

    /// Store file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            trace!(path = %self.path.display(), "store file absent, treating as empty");
            return Ok(BTreeMap::new());
        }

        let encrypted = fs::read_to_string(&self.path)?;
        let plaintext = Zeroizing::new(
            cipher::decrypt(&encrypted, &[self.identity.as_age()]).map_err(|e| {
                BackendError::vendor(&self.name, format!("cannot open store: {}", e))
            })?,
        );

        serde_json::from_str(&plaintext).map_err(|e| {
            BackendError::vendor(&self.name, format!("corrupt store: {}", e)).into()
        })
    }

    fn write(&self, data: &BTreeMap<String, String>) -> Result<()> {
        let plaintext = Zeroizing::new(serde_json::to_string(data)?);
        let encrypted = cipher::encrypt(&plaintext, &[self.identity.to_recipient()])?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let tmp = self.path.with_extension("age.tmp");
        {
            let mut file = open_private(&tmp)?;
            file.write_all(encrypted.as_bytes())?;
            file.flush()?;
        }
        fs::rename(&tmp, &self.path)?;

        debug!(backend = %self.name, keys = data.len(), "store written");
        Ok(())
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}

impl Backend for FileBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Result<String> {
        self.read()?
            .remove(key)
            .ok_or_else(|| BackendError::not_found(&self.name, key).into())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut data = self.read()?;
        data.insert(key.to_string(), value.to_string());
        self.write(&data)
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut data = self.read()?;
        if data.remove(key).is_none() {
            return Err(BackendError::not_found(&self.name, key).into());
        }
        self.write(&data)
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.read()?.into_keys().collect())
    }

    fn close(&self) -> Result<()> {
        let tmp = self.path.with_extension("age.tmp");
        if tmp.exists() {
            fs::remove_file(&tmp)?;
        }
        Ok(())
    }
}
