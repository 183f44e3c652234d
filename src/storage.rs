use std::cell::RefCell;
use std::collections::HashMap;
use web_sys::Storage;

/// String key-value persistence.
pub trait SettingsStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str);
}

/// `window.localStorage`; silently degrades when storage is unavailable
/// (private mode, disabled cookies).
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

fn storage() -> Option<Storage> {
    let window = web_sys::window()?;
    window.local_storage().ok().flatten()
}

impl SettingsStore for LocalStore {
    fn load(&self, key: &str) -> Option<String> {
        storage()?.get_item(key).ok().flatten()
    }

    fn save(&self, key: &str, value: &str) {
        match storage() {
            Some(store) => {
                if store.set_item(key, value).is_err() {
                    log::warn!("Could not persist {}", key);
                }
            }
            None => log::warn!("localStorage unavailable, {} not persisted", key),
        }
    }
}

/// In-memory store for non-browser hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}
