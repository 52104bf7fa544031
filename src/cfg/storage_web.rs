use gloo_storage::{LocalStorage, Storage, errors::StorageError};

use super::Settings;

pub(super) const LOCATION: &str = "/solar-system-demo | settings";

/// `Ok(None)` if nothing is stored.
pub(super) fn load() -> Result<Option<Settings>, LoadError> {
    match LocalStorage::get(LOCATION) {
        Ok(settings) => Ok(Some(settings)),
        Err(StorageError::KeyNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

pub(crate) type LoadError = StorageError;
