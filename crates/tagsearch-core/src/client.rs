use std::fs;
use std::path::Path;

use crate::action::{ActionBuilder, ShareMessage};
use crate::config::{AppConfig, DurabilityMode};
use crate::error::{Result, TagSearchError};
use crate::interaction::{EntryChoice, EntryOutcome, resolve_entry_choice};
use crate::models::{RemoveResult, SaveResult, SavedSearch};
use crate::persistence::{DeferredStore, PersistenceAdapter, SqliteStore};
use crate::registry::TaggedSearchRegistry;

pub const STATE_DB_FILE_NAME: &str = ".tagsearch_state.sqlite3";

/// Application facade: configuration, storage, registry and action builder
/// wired together for one host session.
pub struct TagSearch {
    registry: TaggedSearchRegistry<Box<dyn PersistenceAdapter>>,
    actions: ActionBuilder,
    config: AppConfig,
}

impl std::fmt::Debug for TagSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagSearch")
            .field("tags", &self.registry.len())
            .field("durability", &self.config.persistence.durability)
            .finish_non_exhaustive()
    }
}

impl TagSearch {
    /// Open (or create) the saved searches kept under `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        let config = AppConfig::load(root)?;
        // Templates are checked before touching the database.
        let actions = ActionBuilder::from_config(&config.actions)?;

        let sqlite = SqliteStore::open(root.join(STATE_DB_FILE_NAME))?;
        let adapter: Box<dyn PersistenceAdapter> = match config.persistence.durability {
            DurabilityMode::Immediate => Box::new(sqlite),
            DurabilityMode::Deferred => Box::new(DeferredStore::new(sqlite)),
        };
        let registry = TaggedSearchRegistry::open(adapter)?;
        tracing::info!(
            root = %root.display(),
            durability = %config.persistence.durability,
            tags = registry.len(),
            "tagsearch session ready"
        );
        Ok(Self {
            registry,
            actions,
            config,
        })
    }

    /// Session over a caller-supplied adapter.
    pub fn with_adapter(adapter: Box<dyn PersistenceAdapter>, config: AppConfig) -> Result<Self> {
        let actions = ActionBuilder::from_config(&config.actions)?;
        let registry = TaggedSearchRegistry::open(adapter)?;
        Ok(Self {
            registry,
            actions,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn actions(&self) -> &ActionBuilder {
        &self.actions
    }

    pub fn save(&mut self, tag: &str, query: &str) -> Result<SaveResult> {
        let outcome = self.registry.upsert(tag, query)?;
        Ok(SaveResult {
            tag: tag.to_string(),
            outcome,
            case_variants: self.registry.case_variants(tag),
        })
    }

    pub fn remove(&mut self, tag: &str) -> Result<RemoveResult> {
        let removed = self.registry.delete(tag)?;
        Ok(RemoveResult {
            tag: tag.to_string(),
            removed,
        })
    }

    #[must_use]
    pub fn query(&self, tag: &str) -> Option<&str> {
        self.registry.get(tag)
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        self.registry.list()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<SavedSearch> {
        self.registry.entries().collect()
    }

    pub fn search_url(&self, tag: &str) -> Result<String> {
        let query = self.require(tag)?;
        Ok(self.actions.build_search_url(query))
    }

    pub fn share_message(&self, tag: &str) -> Result<ShareMessage> {
        let query = self.require(tag)?;
        Ok(self.actions.build_share_message(query))
    }

    pub fn resolve_entry_choice(
        &self,
        tag: &str,
        choice: Option<EntryChoice>,
    ) -> Result<EntryOutcome> {
        resolve_entry_choice(&self.registry, &self.actions, tag, choice)
    }

    /// Discard in-memory state and re-read storage.
    pub fn reload(&mut self) -> Result<usize> {
        self.registry.load()
    }

    pub fn flush(&self) -> Result<()> {
        self.registry.flush()
    }

    fn require(&self, tag: &str) -> Result<&str> {
        self.registry
            .get(tag)
            .ok_or_else(|| TagSearchError::NotFound(format!("saved search '{tag}'")))
    }
}
