//! Key-value persistence consumed by the registry.
//!
//! Adapters take `&self` and keep their own interior locking so a single
//! adapter value can be shared between a registry and an inspector (tests,
//! host diagnostics) without extra wrapping.

use std::collections::BTreeMap;

use crate::error::Result;

mod deferred;
mod memory;
mod sqlite;

pub use deferred::DeferredStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub trait PersistenceAdapter {
    /// Full snapshot of every persisted key/value pair.
    fn read_all(&self) -> Result<BTreeMap<String, String>>;

    /// Store `value` under `key`, overwriting any previous value.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<()>;

    /// Block until every accepted write/remove is durable.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

impl<A: PersistenceAdapter + ?Sized> PersistenceAdapter for Box<A> {
    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        (**self).read_all()
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }
}

#[cfg(test)]
mod tests;
