use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;

#[cfg(test)]
mod tests;

pub use args::{ActArgs, EntryChoiceArg, ListArgs, SaveArgs, TagArg};

#[derive(Debug, Parser)]
#[command(name = "tagsearch")]
#[command(about = "Save, list and share tagged searches", version)]
pub struct Cli {
    #[arg(long, default_value = ".tagsearch")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Init,
    /// Save a new search or replace the query of an existing tag.
    Save(SaveArgs),
    Ls(ListArgs),
    Get(TagArg),
    /// Delete a saved search. Deleting an unknown tag succeeds.
    Rm(TagArg),
    /// Print the browser URL for a saved search.
    Url(TagArg),
    Share(TagArg),
    /// Resolve a share/edit/delete choice for a saved search.
    Act(ActArgs),
    /// Print the resolved configuration.
    Config,
}
