use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{Result, TagSearchError};

use super::PersistenceAdapter;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingOp {
    Write(String),
    Remove,
}

/// Write-behind wrapper: mutations are accepted immediately and applied to
/// the inner adapter on [`PersistenceAdapter::flush`] or drop.
///
/// Only the latest pending operation per key is kept.
#[derive(Debug)]
pub struct DeferredStore<A: PersistenceAdapter> {
    inner: A,
    pending: Mutex<BTreeMap<String, PendingOp>>,
}

impl<A: PersistenceAdapter> DeferredStore<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            pending: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn pending_len(&self) -> Result<usize> {
        Ok(self.lock_pending()?.len())
    }

    fn lock_pending(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, PendingOp>>> {
        self.pending
            .lock()
            .map_err(|_| TagSearchError::mutex_poisoned("deferred store"))
    }

    fn enqueue(&self, key: &str, op: PendingOp) -> Result<()> {
        self.lock_pending()?.insert(key.to_string(), op);
        Ok(())
    }
}

impl<A: PersistenceAdapter> PersistenceAdapter for DeferredStore<A> {
    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let mut snapshot = self.inner.read_all()?;
        for (key, op) in self.lock_pending()?.iter() {
            match op {
                PendingOp::Write(value) => {
                    snapshot.insert(key.clone(), value.clone());
                }
                PendingOp::Remove => {
                    snapshot.remove(key);
                }
            }
        }
        Ok(snapshot)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.enqueue(key, PendingOp::Write(value.to_string()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.enqueue(key, PendingOp::Remove)
    }

    fn flush(&self) -> Result<()> {
        let mut pending = self.lock_pending()?;
        let total = pending.len();
        let mut ops = std::mem::take(&mut *pending).into_iter();
        while let Some((key, op)) = ops.next() {
            let applied = match &op {
                PendingOp::Write(value) => self.inner.write(&key, value),
                PendingOp::Remove => self.inner.remove(&key),
            };
            if let Err(err) = applied {
                // Failed and not-yet-applied ops stay queued for the next flush.
                pending.insert(key, op);
                pending.extend(ops);
                tracing::warn!(remaining = pending.len(), error = %err, "deferred flush stopped early");
                return Err(err);
            }
        }
        drop(pending);
        self.inner.flush()?;
        if total > 0 {
            tracing::info!(applied = total, "flushed deferred saved search writes");
        }
        Ok(())
    }
}

impl<A: PersistenceAdapter> Drop for DeferredStore<A> {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            tracing::warn!(error = %err, "dropping deferred store with unflushed writes");
        }
    }
}
