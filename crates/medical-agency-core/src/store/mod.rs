//! Key-value storage layer.
//!
//! Each record collection lives as one JSON document under a single key.
//! The only atomicity guarantee is single-key overwrite.

mod memory;
mod schema;
mod sqlite;
#[cfg(test)]
pub(crate) mod testing;

pub use memory::*;
pub use schema::*;
pub use sqlite::*;

use thiserror::Error;

/// Storage errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// String key-value store backing the repositories.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrite the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// List all keys currently present.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Remove `key`. Returns whether a value was present.
    fn remove(&self, key: &str) -> StoreResult<bool>;
}
