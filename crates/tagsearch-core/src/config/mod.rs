use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TagSearchError};

mod env;
mod file;

pub use file::CONFIG_FILE_NAME;

pub const SEARCH_URL_ENV: &str = "TAGSEARCH_SEARCH_URL";
pub const SHARE_SUBJECT_ENV: &str = "TAGSEARCH_SHARE_SUBJECT";
pub const SHARE_MESSAGE_ENV: &str = "TAGSEARCH_SHARE_MESSAGE";
pub const DURABILITY_ENV: &str = "TAGSEARCH_DURABILITY";

pub const DEFAULT_SEARCH_URL: &str = "https://www.flickr.com/search/?text=";
pub const DEFAULT_SHARE_SUBJECT: &str = "Flickr search that might interest you";
pub const DEFAULT_SHARE_MESSAGE: &str = "Check out the results of this Flickr search: {url}";

/// When adapter writes become durable relative to the registry call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurabilityMode {
    /// Each upsert/delete is committed before the call returns.
    #[default]
    Immediate,
    /// Writes are queued and committed on flush or shutdown.
    Deferred,
}

impl DurabilityMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Deferred => "deferred",
        }
    }
}

impl Display for DurabilityMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurabilityMode {
    type Err = TagSearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" | "sync" => Ok(Self::Immediate),
            "deferred" | "async" => Ok(Self::Deferred),
            other => Err(TagSearchError::Config(format!(
                "unknown durability mode: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionConfig {
    pub search_url: String,
    pub share_subject: String,
    pub share_message: String,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            share_subject: DEFAULT_SHARE_SUBJECT.to_string(),
            share_message: DEFAULT_SHARE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersistenceConfig {
    pub durability: DurabilityMode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    pub actions: ActionConfig,
    pub persistence: PersistenceConfig,
}

impl AppConfig {
    /// Defaults, then `<root>/tagsearch.toml`, then `TAGSEARCH_*` variables.
    pub fn load(root: &Path) -> Result<Self> {
        Self::default()
            .with_file_overrides(root)?
            .with_env_overrides(env::read_env)
    }

    pub fn with_file_overrides(mut self, root: &Path) -> Result<Self> {
        let Some(file) = file::read_config_file(root)? else {
            return Ok(self);
        };
        if let Some(value) = env::non_empty_trimmed(file.actions.search_url) {
            self.actions.search_url = value;
        }
        if let Some(value) = env::non_empty_trimmed(file.actions.share_subject) {
            self.actions.share_subject = value;
        }
        if let Some(value) = env::non_blank(file.actions.share_message) {
            self.actions.share_message = value;
        }
        if let Some(durability) = file.persistence.durability {
            self.persistence.durability = durability;
        }
        Ok(self)
    }

    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(value) = env::non_empty_trimmed(lookup(SEARCH_URL_ENV)) {
            self.actions.search_url = value;
        }
        if let Some(value) = env::non_empty_trimmed(lookup(SHARE_SUBJECT_ENV)) {
            self.actions.share_subject = value;
        }
        if let Some(value) = env::non_blank(lookup(SHARE_MESSAGE_ENV)) {
            self.actions.share_message = value;
        }
        if let Some(value) = env::non_empty_trimmed(lookup(DURABILITY_ENV)) {
            self.persistence.durability = value.parse()?;
        }
        Ok(self)
    }
}
