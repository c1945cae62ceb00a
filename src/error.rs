//! Error types.
//!
//! One top-level [`Error`] wraps a focused enum per concern so callers can
//! match on the category (configuration, backend, resolution, sync codec)
//! without parsing messages.

use thiserror::Error;

/// Top-level error for all keyref operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error means "the key is absent", as opposed to a failure.
    ///
    /// NotFound drives the ordered backend fallback and the
    /// profile-to-project fallback; everything else is a real failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Backend(BackendError::NotFound { .. }))
    }
}

/// Project configuration errors. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("not initialized: .keyref.toml not found")]
    NotInitialized,

    #[error("already initialized: .keyref.toml exists")]
    AlreadyInitialized,

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unknown backend type '{kind}' for backend '{name}' (expected one of: {expected})")]
    UnknownBackendType {
        name: String,
        kind: String,
        expected: String,
    },

    #[error("duplicate backend name: {0}")]
    DuplicateBackend(String),

    #[error("backend not configured: {0}")]
    BackendNotConfigured(String),

    #[error("no backends configured")]
    NoBackends,

    #[error("team member already exists: {0}")]
    MemberExists(String),

    #[error("team member not found: {0}")]
    MemberNotFound(String),
}

/// Errors raised by a secret-store backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{backend}: key not found: {key}")]
    NotFound { backend: String, key: String },

    #[error("{backend}: backend is read-only")]
    ReadOnly { backend: String },

    #[error("{backend}: {operation} is not supported")]
    Unsupported {
        backend: String,
        operation: &'static str,
    },

    #[error("{backend}: {message}")]
    Vendor { backend: String, message: String },

    #[error("failed to close {count} backend(s): {details}")]
    Close { count: usize, details: String },
}

impl BackendError {
    /// Convenience constructor for the common "key absent" case.
    pub fn not_found(backend: &str, key: &str) -> Self {
        Self::NotFound {
            backend: backend.to_string(),
            key: key.to_string(),
        }
    }

    /// Wrap a vendor failure message.
    pub fn vendor(backend: &str, message: impl Into<String>) -> Self {
        Self::Vendor {
            backend: backend.to_string(),
            message: message.into(),
        }
    }
}

/// Per-reference resolution failures.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid reference '{0}': empty path")]
    EmptyPath(String),

    #[error("{path}: not found in any backend (tried: {tried})")]
    NotFound { path: String, tried: String },

    #[error("{path}: {source}")]
    Backend {
        path: String,
        #[source]
        source: Box<Error>,
    },

    #[error("reference cycle: {chain}")]
    Cycle { chain: String },

    #[error("reference nesting exceeds {limit} levels at {path}")]
    TooDeep { path: String, limit: usize },

    #[error("{failed} of {total} references could not be resolved")]
    Partial { failed: usize, total: usize },
}

/// Sync envelope errors. Always fatal to the sync operation.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("at least one recipient is required")]
    NoRecipients,

    #[error("no secrets to export")]
    NoSecrets,

    #[error("at least one identity is required to decrypt")]
    NoIdentities,

    #[error("no matching identity: this envelope was not encrypted for any supplied key")]
    NoMatchingIdentity,

    #[error("malformed sync envelope: {0}")]
    Malformed(String),
}

/// Low-level encryption failures.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("no matching identity for this ciphertext")]
    NoMatchingKeys,

    #[error("armor failed: {0}")]
    ArmorFailed(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}

/// Input validation failures.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("key cannot be empty")]
    EmptyKey,

    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("value for '{0}' cannot be empty")]
    EmptyValue(String),

    #[error("invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("insecure permissions on {path}: expected {expected}, found {actual}")]
    InvalidPermissions {
        path: String,
        expected: String,
        actual: String,
    },
}

/// Private key (identity) storage errors.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("no identity found at {0}")]
    NotFound(String),

    #[error("invalid identity format: {0}")]
    InvalidFormat(String),

    #[error("failed to read identity: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("failed to write identity: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("unable to determine home directory")]
    NoHome,
}

pub type Result<T> = std::result::Result<T, Error>;
