use clap::{Args, ValueEnum};
use tagsearch_core::EntryChoice;

#[derive(Debug, Args)]
pub struct SaveArgs {
    pub tag: String,
    #[arg(allow_hyphen_values = true)]
    pub query: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Include each tag's query in the output.
    #[arg(long, default_value_t = false)]
    pub with_queries: bool,
}

#[derive(Debug, Args)]
pub struct TagArg {
    pub tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntryChoiceArg {
    Share,
    Edit,
    Delete,
    Cancel,
}

impl From<EntryChoiceArg> for EntryChoice {
    fn from(value: EntryChoiceArg) -> Self {
        match value {
            EntryChoiceArg::Share => Self::Share,
            EntryChoiceArg::Edit => Self::Edit,
            EntryChoiceArg::Delete => Self::Delete,
            EntryChoiceArg::Cancel => Self::Cancel,
        }
    }
}

#[derive(Debug, Args)]
pub struct ActArgs {
    pub tag: String,
    #[arg(value_enum)]
    pub choice: EntryChoiceArg,
    /// Confirm a delete choice; without it the entry is kept.
    #[arg(long, default_value_t = false)]
    pub yes: bool,
}
