use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use web_sys::window;

use super::answers::AnswerMap;
use super::error::StorageError;

/// Where quiz answers survive page reloads.
pub trait AnswerStore {
    fn read_raw(&self) -> Option<String>;
    fn write_raw(&self, raw: &str) -> Result<(), StorageError>;
    fn remove(&self);

    /// Missing or unreadable records load as an empty map.
    fn load(&self) -> AnswerMap {
        match self.read_raw() {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Discarding unreadable saved answers: {}", e);
                AnswerMap::new()
            }),
            None => AnswerMap::new(),
        }
    }

    fn save(&self, answers: &AnswerMap) -> Result<(), StorageError> {
        let raw = serde_json::to_string(answers)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.write_raw(&raw)
    }
}

/// Browser `localStorage` under a single key.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalAnswerStore {
    key: String,
}

impl LocalAnswerStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<web_sys::Storage> {
        window().and_then(|w| w.local_storage().ok()).flatten()
    }
}

impl AnswerStore for LocalAnswerStore {
    fn read_raw(&self) -> Option<String> {
        Self::storage()?.get_item(&self.key).ok().flatten()
    }

    fn write_raw(&self, raw: &str) -> Result<(), StorageError> {
        let storage = Self::storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(&self.key, raw)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }

    fn remove(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(&self.key);
        }
    }
}

/// In-memory store; clones share the same slot, like two handles on one
/// `localStorage` key.
#[derive(Clone, Debug, Default)]
pub struct MemoryAnswerStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: &str) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(raw.to_string()))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slot.borrow().is_none()
    }
}

impl AnswerStore for MemoryAnswerStore {
    fn read_raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn write_raw(&self, raw: &str) -> Result<(), StorageError> {
        *self.slot.borrow_mut() = Some(raw.to_string());
        Ok(())
    }

    fn remove(&self) {
        self.slot.borrow_mut().take();
    }
}
