//! Durable key-value storage for shopping list state.
//!
//! The list is persisted as a handful of string values under fixed keys.
//! There is no atomicity across keys; each `set` is last-write-wins.
//!
//! - `MemoryStore`: in-process map, used by tests and ephemeral sessions
//! - `DocumentStore`: a single Automerge document on disk
//!   (`<data_dir>/shopping.automerge`) whose root map holds the values

mod document;
mod error;
mod memory;

pub use document::DocumentStore;
pub use error::StoreError;
pub use memory::MemoryStore;

/// A string key-value store.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` if it was never set.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}
