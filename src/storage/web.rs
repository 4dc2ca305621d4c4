use crate::{storage::CredentialStore, MapError, Result};
use web_sys::Storage;

/// Browser `localStorage` backed store
pub struct LocalStorageCredentialStore {
    storage: Storage,
}

impl LocalStorageCredentialStore {
    /// Opens the window's local storage
    pub fn open() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| MapError::Store("no window available".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| MapError::Store(format!("localStorage unavailable: {:?}", e)))?
            .ok_or_else(|| MapError::Store("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl CredentialStore for LocalStorageCredentialStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| MapError::Store(format!("read '{}' failed: {:?}", key, e)))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| MapError::Store(format!("write '{}' failed: {:?}", key, e)))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| MapError::Store(format!("remove '{}' failed: {:?}", key, e)))
    }
}
