use serde::{Deserialize, Serialize};

/// One tag/query association as presented to hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub tag: String,
    pub query: String,
}

/// Whether an upsert created a new exact-string tag or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl UpsertOutcome {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveResult {
    pub tag: String,
    pub outcome: UpsertOutcome,
    /// Other stored tags equal to `tag` under lowercasing.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub case_variants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveResult {
    pub tag: String,
    pub removed: bool,
}
