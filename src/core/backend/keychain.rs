//! macOS Keychain backend.
//!
//! Each key is a generic password item: service = configured service
//! (default `com.keyref`), account = the (already namespaced) key.

use security_framework::item::{ItemClass, ItemSearchOptions, Limit};
use security_framework::passwords::{
    delete_generic_password, get_generic_password, set_generic_password,
};
use tracing::{debug, error};

use super::Backend;
use crate::core::config::BackendConfig;
use crate::core::constants;
use crate::error::{BackendError, Result};

/// errSecItemNotFound
const ITEM_NOT_FOUND: i32 = -25300;
/// errSecUserCanceled
const USER_CANCELED: i32 = -128;

/// Keychain-backed secret store
pub struct KeychainBackend {
    name: String,
    service: String,
}

impl KeychainBackend {
    /// Create a keychain backend for `service`.
    pub fn new(name: &str, service: &str) -> Self {
        Self {
            name: name.to_string(),
            service: service.to_string(),
        }
    }

    /// Build from `[backends.config]`; recognizes `service`.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(
            &config.name,
            config.option("service").unwrap_or(constants::KEYCHAIN_SERVICE),
        )
    }

    fn map_error(&self, key: &str, e: security_framework::base::Error) -> crate::error::Error {
        match e.code() {
            ITEM_NOT_FOUND => BackendError::not_found(&self.name, key).into(),
            USER_CANCELED => {
                error!(backend = %self.name, "keychain access denied");
                BackendError::vendor(&self.name, "keychain access denied").into()
            }
            code => {
                error!(backend = %self.name, error_code = code, "keychain error");
                BackendError::vendor(&self.name, format!("keychain error: {}", e)).into()
            }
        }
    }
}

impl Backend for KeychainBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Result<String> {
        let bytes = get_generic_password(&self.service, key).map_err(|e| self.map_error(key, e))?;
        String::from_utf8(bytes).map_err(|e| {
            BackendError::vendor(&self.name, format!("invalid UTF-8 in keychain item: {}", e))
                .into()
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        debug!(backend = %self.name, service = %self.service, "writing keychain item");
        set_generic_password(&self.service, key, value.as_bytes())
            .map_err(|e| self.map_error(key, e))
    }

    fn delete(&self, key: &str) -> Result<()> {
        delete_generic_password(&self.service, key).map_err(|e| self.map_error(key, e))
    }

    fn list(&self) -> Result<Vec<String>> {
        let results = ItemSearchOptions::new()
            .class(ItemClass::generic_password())
            .service(&self.service)
            .load_attributes(true)
            .limit(Limit::All)
            .search();

        let results = match results {
            Ok(results) => results,
            Err(e) if e.code() == ITEM_NOT_FOUND => return Ok(Vec::new()),
            Err(e) => return Err(self.map_error("*", e)),
        };

        let mut keys: Vec<String> = results
            .iter()
            .filter_map(|r| r.simplify_dict())
            .filter_map(|attrs| attrs.get("acct").cloned())
            .collect();
        keys.sort();
        Ok(keys)
    }
}
