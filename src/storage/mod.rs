//! Persistent key-value storage for the map access credential.
//!
//! The store is an injected dependency of [`IncidentMap`](crate::core::map::IncidentMap),
//! read once at construction and written when a credential is submitted.

pub mod file;
pub mod memory;
#[cfg(feature = "wasm")]
pub mod web;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;
#[cfg(feature = "wasm")]
pub use web::LocalStorageCredentialStore;

use crate::Result;

/// String-valued persistent store
pub trait CredentialStore {
    fn load(&self, key: &str) -> Result<Option<String>>;

    fn save(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for Box<S> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
