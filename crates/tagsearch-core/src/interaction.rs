//! Share / edit / delete decisions for a single saved search.
//!
//! Hosts show their own chooser and pass the user's pick here; the returned
//! [`EntryOutcome`] tells them what to render or dispatch next. Deletion is
//! not performed here so the host can still ask for confirmation.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::action::{ActionBuilder, ShareMessage};
use crate::error::{Result, TagSearchError};
use crate::persistence::PersistenceAdapter;
use crate::registry::TaggedSearchRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryChoice {
    Share,
    Edit,
    Delete,
    Cancel,
}

impl EntryChoice {
    pub const ALL: [Self; 4] = [Self::Share, Self::Edit, Self::Delete, Self::Cancel];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Share => "share",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Cancel => "cancel",
        }
    }
}

impl Display for EntryChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryChoice {
    type Err = TagSearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "share" => Ok(Self::Share),
            "edit" => Ok(Self::Edit),
            "delete" => Ok(Self::Delete),
            "cancel" => Ok(Self::Cancel),
            _ => Err(TagSearchError::InvalidInput(format!(
                "unknown entry choice: {s}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryOutcome {
    Share { tag: String, message: ShareMessage },
    Edit { tag: String, query: String },
    Delete { tag: String },
    Cancelled,
}

/// `None` means the chooser was dismissed.
pub fn resolve_entry_choice<A: PersistenceAdapter>(
    registry: &TaggedSearchRegistry<A>,
    actions: &ActionBuilder,
    tag: &str,
    choice: Option<EntryChoice>,
) -> Result<EntryOutcome> {
    let choice = match choice {
        None | Some(EntryChoice::Cancel) => return Ok(EntryOutcome::Cancelled),
        Some(choice) => choice,
    };
    let query = registry
        .get(tag)
        .ok_or_else(|| TagSearchError::NotFound(format!("saved search '{tag}'")))?;

    Ok(match choice {
        EntryChoice::Share => EntryOutcome::Share {
            tag: tag.to_string(),
            message: actions.build_share_message(query),
        },
        EntryChoice::Edit => EntryOutcome::Edit {
            tag: tag.to_string(),
            query: query.to_string(),
        },
        EntryChoice::Delete => EntryOutcome::Delete {
            tag: tag.to_string(),
        },
        EntryChoice::Cancel => EntryOutcome::Cancelled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn fixture() -> (TaggedSearchRegistry<MemoryStore>, ActionBuilder) {
        let registry = TaggedSearchRegistry::open(MemoryStore::with_entries([(
            "Tech",
            "rust lang",
        )]))
        .expect("open");
        let actions = ActionBuilder::new("https://example.com/?q=", "Subject", "See {url}")
            .expect("builder");
        (registry, actions)
    }

    #[test]
    fn edit_returns_current_pair() {
        let (registry, actions) = fixture();
        let outcome =
            resolve_entry_choice(&registry, &actions, "Tech", Some(EntryChoice::Edit)).expect("edit");
        assert_eq!(
            outcome,
            EntryOutcome::Edit {
                tag: "Tech".to_string(),
                query: "rust lang".to_string(),
            }
        );
    }

    #[test]
    fn share_builds_message() {
        let (registry, actions) = fixture();
        let outcome = resolve_entry_choice(&registry, &actions, "Tech", Some(EntryChoice::Share))
            .expect("share");
        let EntryOutcome::Share { message, .. } = outcome else {
            panic!("expected share outcome");
        };
        assert_eq!(message.body, "See https://example.com/?q=rust%20lang");
    }

    #[test]
    fn delete_defers_to_host_and_keeps_entry() {
        let (registry, actions) = fixture();
        let outcome = resolve_entry_choice(&registry, &actions, "Tech", Some(EntryChoice::Delete))
            .expect("delete");
        assert_eq!(
            outcome,
            EntryOutcome::Delete {
                tag: "Tech".to_string()
            }
        );
        assert!(registry.contains("Tech"));
    }

    #[test]
    fn dismissal_cancels_even_for_unknown_tag() {
        let (registry, actions) = fixture();
        for choice in [None, Some(EntryChoice::Cancel)] {
            let outcome =
                resolve_entry_choice(&registry, &actions, "ghost", choice).expect("cancel");
            assert_eq!(outcome, EntryOutcome::Cancelled);
        }
    }

    #[test]
    fn unknown_tag_is_not_found() {
        let (registry, actions) = fixture();
        let err = resolve_entry_choice(&registry, &actions, "tech", Some(EntryChoice::Share))
            .expect_err("case-sensitive lookup");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn choices_parse_from_their_names() {
        for choice in EntryChoice::ALL {
            assert_eq!(choice.as_str().parse::<EntryChoice>().expect("parse"), choice);
        }
        assert!("rename".parse::<EntryChoice>().is_err());
    }

    #[test]
    fn outcome_serializes_with_kind_tag() {
        let value = serde_json::to_value(EntryOutcome::Cancelled).expect("json");
        assert_eq!(value, serde_json::json!({"kind": "cancelled"}));
    }
}
