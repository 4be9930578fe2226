use std::collections::HashMap;

use crate::error::{Result, TagSearchError};
use crate::models::{SavedSearch, UpsertOutcome};
use crate::persistence::PersistenceAdapter;

mod order;

pub use order::{compare_tags, same_tag_ignoring_case};

/// In-memory authority over saved searches and their display order.
///
/// Uniqueness is by exact string (`"News"` and `"news"` are two entries);
/// ordering is case-insensitive. Every mutation updates memory first and
/// then forwards to the adapter. Adapter failures are returned but the
/// in-memory change is kept.
#[derive(Debug)]
pub struct TaggedSearchRegistry<A: PersistenceAdapter> {
    adapter: A,
    store: HashMap<String, String>,
    ordered_tags: Vec<String>,
}

impl<A: PersistenceAdapter> TaggedSearchRegistry<A> {
    /// Empty registry over `adapter`; call [`Self::load`] before use.
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            store: HashMap::new(),
            ordered_tags: Vec::new(),
        }
    }

    /// Construct and hydrate in one step.
    pub fn open(adapter: A) -> Result<Self> {
        let mut registry = Self::new(adapter);
        registry.load()?;
        Ok(registry)
    }

    /// Replace in-memory state with the adapter's snapshot. On failure the
    /// previous state is left untouched.
    pub fn load(&mut self) -> Result<usize> {
        let snapshot = self
            .adapter
            .read_all()
            .map_err(|err| TagSearchError::persistence("read_all", err))?;

        let mut store = HashMap::with_capacity(snapshot.len());
        for (tag, query) in snapshot {
            if tag.is_empty() || query.is_empty() {
                tracing::warn!(tag = %tag, "skipping persisted entry with empty tag or query");
                continue;
            }
            store.insert(tag, query);
        }
        let mut ordered_tags: Vec<String> = store.keys().cloned().collect();
        order::sort_tags(&mut ordered_tags);

        self.store = store;
        self.ordered_tags = ordered_tags;
        tracing::info!(count = self.store.len(), "loaded saved searches");
        Ok(self.store.len())
    }

    pub fn upsert(&mut self, tag: &str, query: &str) -> Result<UpsertOutcome> {
        validate_entry(tag, query)?;

        let outcome = match self.store.get_mut(tag) {
            Some(existing) => {
                query.clone_into(existing);
                UpsertOutcome::Updated
            }
            None => {
                if let Err(position) = order::locate(&self.ordered_tags, tag) {
                    self.ordered_tags.insert(position, tag.to_string());
                }
                self.store.insert(tag.to_string(), query.to_string());
                let variants = self.case_variants(tag);
                if !variants.is_empty() {
                    tracing::warn!(tag, ?variants, "saved tag differs from existing tags only by case");
                }
                UpsertOutcome::Created
            }
        };
        debug_assert!(self.is_consistent());
        tracing::debug!(tag, outcome = outcome.as_str(), "upserted saved search");

        self.adapter.write(tag, query).map_err(|err| {
            tracing::warn!(tag, error = %err, "saved search write not persisted");
            TagSearchError::persistence("write", err)
        })?;
        Ok(outcome)
    }

    /// Returns whether `tag` was present. Deleting an absent tag is a no-op
    /// and does not touch the adapter.
    pub fn delete(&mut self, tag: &str) -> Result<bool> {
        if self.store.remove(tag).is_none() {
            return Ok(false);
        }
        if let Ok(position) = order::locate(&self.ordered_tags, tag) {
            self.ordered_tags.remove(position);
        }
        debug_assert!(self.is_consistent());
        tracing::debug!(tag, "deleted saved search");

        self.adapter.remove(tag).map_err(|err| {
            tracing::warn!(tag, error = %err, "saved search removal not persisted");
            TagSearchError::persistence("remove", err)
        })?;
        Ok(true)
    }

    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.store.get(tag).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.store.contains_key(tag)
    }

    /// Tags in case-insensitive order.
    #[must_use]
    pub fn list(&self) -> &[String] {
        &self.ordered_tags
    }

    pub fn entries(&self) -> impl Iterator<Item = SavedSearch> + '_ {
        self.ordered_tags.iter().filter_map(|tag| {
            self.store.get(tag).map(|query| SavedSearch {
                tag: tag.clone(),
                query: query.clone(),
            })
        })
    }

    /// Other stored tags that equal `tag` under lowercasing.
    #[must_use]
    pub fn case_variants(&self, tag: &str) -> Vec<String> {
        self.ordered_tags
            .iter()
            .filter(|candidate| candidate.as_str() != tag && same_tag_ignoring_case(candidate, tag))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Wait for the adapter to make every accepted mutation durable.
    pub fn flush(&self) -> Result<()> {
        self.adapter
            .flush()
            .map_err(|err| TagSearchError::persistence("flush", err))
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    fn is_consistent(&self) -> bool {
        self.ordered_tags.len() == self.store.len()
            && order::is_sorted(&self.ordered_tags)
            && self.ordered_tags.iter().all(|tag| self.store.contains_key(tag))
    }
}

fn validate_entry(tag: &str, query: &str) -> Result<()> {
    match (tag.is_empty(), query.is_empty()) {
        (false, false) => Ok(()),
        (true, true) => Err(TagSearchError::InvalidInput(
            "tag and query must both be non-empty".to_string(),
        )),
        (true, false) => Err(TagSearchError::InvalidInput(
            "tag must be non-empty".to_string(),
        )),
        (false, true) => Err(TagSearchError::InvalidInput(
            "query must be non-empty".to_string(),
        )),
    }
}
