//! Constants used throughout keyref.
//!
//! Centralizes magic strings and configuration values.

/// Configuration file name (.keyref.toml).
pub const CONFIG_FILE: &str = ".keyref.toml";

/// Base env file, lowest precedence layer.
pub const ENV_FILE: &str = ".env";

/// Local override env file, highest precedence layer.
pub const LOCAL_ENV_FILE: &str = ".env.local";

/// Per-user state directory relative to HOME (~/.keyref).
pub const HOME_DIR: &str = ".keyref";

/// Private identity file name inside the state directory.
pub const IDENTITY_FILE: &str = "identity";

/// Directory for file-backend stores inside the state directory.
pub const STORES_DIR: &str = "stores";

/// Prefix that marks a value as a secret reference.
pub const REF_PREFIX: &str = "ref://";

/// Separator between namespace components and the logical key.
pub const NAMESPACE_SEPARATOR: char = '/';

/// Maximum number of reference hops followed for a single key.
pub const MAX_REF_DEPTH: usize = 8;

/// Default sync envelope file name.
pub const SYNC_FILE: &str = ".keyref.sync.age";

/// Keychain service name used when none is configured.
pub const KEYCHAIN_SERVICE: &str = "com.keyref";

/// Profile-specific env file name (`.env.<profile>`).
pub fn profile_env_file(profile: &str) -> String {
    format!("{}.{}", ENV_FILE, profile)
}
