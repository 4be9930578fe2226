use anyhow::Result;

use crate::cli::{ActArgs, Commands, EntryChoiceArg};

/// Checks that need no storage access. Runs before the session is opened so
/// rejected input never creates or touches the state database.
pub(super) fn validate_command_preflight(command: &Commands) -> Result<()> {
    match command {
        Commands::Save(args) => validate_save_input(&args.tag, &args.query),
        Commands::Get(args)
        | Commands::Rm(args)
        | Commands::Url(args)
        | Commands::Share(args) => validate_tag_input(&args.tag),
        Commands::Act(args) => validate_act_args(args),
        _ => Ok(()),
    }
}

pub(super) fn validate_save_input(tag: &str, query: &str) -> Result<()> {
    if tag.is_empty() || query.is_empty() {
        anyhow::bail!("enter both a tag and a search query");
    }
    Ok(())
}

fn validate_tag_input(tag: &str) -> Result<()> {
    if tag.is_empty() {
        anyhow::bail!("tag must be non-empty");
    }
    Ok(())
}

fn validate_act_args(args: &ActArgs) -> Result<()> {
    validate_tag_input(&args.tag)?;
    if args.yes && args.choice != EntryChoiceArg::Delete {
        anyhow::bail!("--yes only applies to the delete choice");
    }
    Ok(())
}

/// Commands that only read state and never need a flush.
pub(super) const fn command_is_read_only(command: &Commands) -> bool {
    match command {
        Commands::Ls(_)
        | Commands::Get(_)
        | Commands::Url(_)
        | Commands::Share(_)
        | Commands::Config => true,
        Commands::Act(args) => !args.yes,
        Commands::Init | Commands::Save(_) | Commands::Rm(_) => false,
    }
}
