use std::collections::BTreeMap;

use tempfile::tempdir;

use super::*;

#[test]
fn sqlite_store_upserts_and_removes() {
    let temp = tempdir().expect("tempdir");
    let store = SqliteStore::open(temp.path().join("searches.db")).expect("open");

    store.write("News", "AI breakthroughs").expect("write");
    store.write("art", "painting tips").expect("write");
    store.write("News", "rust releases").expect("overwrite");

    let all = store.read_all().expect("read_all");
    assert_eq!(all.len(), 2);
    assert_eq!(all.get("News").map(String::as_str), Some("rust releases"));
    assert!(store.updated_at("News").expect("updated_at").is_some());

    store.remove("News").expect("remove");
    store.remove("News").expect("remove absent key");
    let all = store.read_all().expect("read_all");
    assert_eq!(all.keys().collect::<Vec<_>>(), vec!["art"]);
}

#[test]
fn sqlite_store_keeps_case_variants_distinct() {
    let store = SqliteStore::open_in_memory().expect("open");
    store.write("News", "a").expect("write");
    store.write("news", "b").expect("write");
    assert_eq!(store.read_all().expect("read_all").len(), 2);
}

#[test]
fn sqlite_store_survives_reopen() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("nested").join("searches.db");
    {
        let store = SqliteStore::open(&path).expect("open");
        store.write("Tech", "rust lang").expect("write");
    }
    let reopened = SqliteStore::open(&path).expect("reopen");
    let all = reopened.read_all().expect("read_all");
    assert_eq!(all.get("Tech").map(String::as_str), Some("rust lang"));
}

#[cfg(unix)]
#[test]
fn sqlite_store_hardens_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("searches.db");
    let _store = SqliteStore::open(&path).expect("open");
    let mode = std::fs::metadata(&path)
        .expect("metadata")
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn memory_store_clones_share_entries() {
    let store = MemoryStore::with_entries([("a", "1")]);
    let observer = store.clone();
    store.write("b", "2").expect("write");
    store.remove("a").expect("remove");
    let expected: BTreeMap<String, String> = [("b".to_string(), "2".to_string())].into();
    assert_eq!(observer.snapshot().expect("snapshot"), expected);
}

#[test]
fn deferred_store_holds_writes_until_flush() {
    let inner = MemoryStore::new();
    let deferred = DeferredStore::new(inner.clone());

    deferred.write("News", "first").expect("write");
    deferred.write("News", "second").expect("write");
    deferred.write("art", "painting").expect("write");
    deferred.remove("art").expect("remove");

    assert!(inner.snapshot().expect("snapshot").is_empty());
    assert_eq!(deferred.pending_len().expect("pending"), 2);

    let overlay = deferred.read_all().expect("read_all");
    assert_eq!(overlay.get("News").map(String::as_str), Some("second"));
    assert!(!overlay.contains_key("art"));

    deferred.flush().expect("flush");
    assert_eq!(deferred.pending_len().expect("pending"), 0);
    assert_eq!(
        inner.snapshot().expect("snapshot").get("News").map(String::as_str),
        Some("second")
    );
}

#[test]
fn deferred_store_flushes_on_drop() {
    let inner = MemoryStore::new();
    {
        let deferred = DeferredStore::new(inner.clone());
        deferred.write("Tech", "rust lang").expect("write");
    }
    assert_eq!(inner.snapshot().expect("snapshot").len(), 1);
}

struct RejectingStore;

impl PersistenceAdapter for RejectingStore {
    fn read_all(&self) -> crate::Result<BTreeMap<String, String>> {
        Ok(BTreeMap::new())
    }

    fn write(&self, _key: &str, _value: &str) -> crate::Result<()> {
        Err(crate::TagSearchError::Internal("read-only".to_string()))
    }

    fn remove(&self, _key: &str) -> crate::Result<()> {
        Ok(())
    }
}

#[test]
fn deferred_store_requeues_failed_flush() {
    let deferred = DeferredStore::new(RejectingStore);
    deferred.write("a", "1").expect("write");
    deferred.write("b", "2").expect("write");

    assert!(deferred.flush().is_err());
    assert_eq!(deferred.pending_len().expect("pending"), 2);

    // Drop would retry and fail again; leave only a remove that succeeds.
    deferred.remove("a").expect("remove");
    deferred.remove("b").expect("remove");
    deferred.flush().expect("flush removes");
}
