use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

use super::DurabilityMode;

pub const CONFIG_FILE_NAME: &str = "tagsearch.toml";

/// On-disk overrides. Every field is optional; absent fields keep defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct FileConfig {
    #[serde(default)]
    pub(super) actions: FileActionConfig,
    #[serde(default)]
    pub(super) persistence: FilePersistenceConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct FileActionConfig {
    pub(super) search_url: Option<String>,
    pub(super) share_subject: Option<String>,
    pub(super) share_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct FilePersistenceConfig {
    pub(super) durability: Option<DurabilityMode>,
}

pub(super) fn read_config_file(root: &Path) -> Result<Option<FileConfig>> {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(&path)?;
    let parsed: FileConfig = toml::from_str(&raw)?;
    tracing::debug!(path = %path.display(), "loaded configuration file");
    Ok(Some(parsed))
}
