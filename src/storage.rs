//! Local Storage Helpers
//!
//! JSON documents in `window.localStorage`. Everything here is best-effort:
//! a browser with storage disabled simply behaves like a fresh session.

use serde::de::DeserializeOwned;
use serde::Serialize;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub fn read_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    let raw = local_storage()?.get_item(key).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring unreadable stored value for {}: {}", key, e);
            None
        }
    }
}

pub fn write_json<T: Serialize>(key: &str, value: &T) -> Result<(), String> {
    let storage = local_storage().ok_or_else(|| "Local storage unavailable".to_string())?;
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    storage
        .set_item(key, &raw)
        .map_err(|e| format!("Failed to write {}: {:?}", key, e))
}

pub fn remove(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}
