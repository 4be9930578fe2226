use std::path::Path;

use anyhow::{Context, Result};
use tagsearch_core::interaction::EntryOutcome;
use tagsearch_core::{EntryChoice, TagSearch};

use crate::cli::{ActArgs, Commands};

mod support;
mod validation;

#[cfg(test)]
mod tests;

use self::support::print_json;
use self::validation::{command_is_read_only, validate_command_preflight};

pub(crate) fn run_from_root(root: &Path, command: Commands) -> Result<()> {
    validate_command_preflight(&command)?;

    let mut app = TagSearch::open(root)
        .with_context(|| format!("failed to open saved searches at {}", root.display()))?;
    run_validated(&mut app, root, command)
}

fn run_validated(app: &mut TagSearch, root: &Path, command: Commands) -> Result<()> {
    let read_only = command_is_read_only(&command);

    match command {
        Commands::Init => {
            print_json(&serde_json::json!({
                "status": "ok",
                "root": root.display().to_string(),
                "tags": app.tags().len(),
            }))?;
        }
        Commands::Save(args) => {
            let saved = app.save(&args.tag, &args.query)?;
            for variant in &saved.case_variants {
                tracing::warn!(tag = %saved.tag, %variant, "tag differs from an existing tag only by case");
            }
            print_json(&saved)?;
        }
        Commands::Ls(args) => {
            if args.with_queries {
                print_json(&app.entries())?;
            } else {
                print_json(&app.tags())?;
            }
        }
        Commands::Get(args) => {
            let query = app
                .query(&args.tag)
                .with_context(|| format!("no saved search tagged '{}'", args.tag))?;
            print_json(&serde_json::json!({
                "tag": args.tag,
                "query": query,
            }))?;
        }
        Commands::Rm(args) => {
            let removed = app.remove(&args.tag)?;
            print_json(&removed)?;
        }
        Commands::Url(args) => {
            println!("{}", app.search_url(&args.tag)?);
        }
        Commands::Share(args) => {
            let message = app.share_message(&args.tag)?;
            print_json(&message)?;
        }
        Commands::Act(args) => {
            handle_act(app, args)?;
        }
        Commands::Config => {
            print_json(app.config())?;
        }
    }

    if !read_only {
        app.flush().context("failed to persist saved searches")?;
    }
    Ok(())
}

fn handle_act(app: &mut TagSearch, args: ActArgs) -> Result<()> {
    let outcome = app.resolve_entry_choice(&args.tag, Some(EntryChoice::from(args.choice)))?;
    match outcome {
        EntryOutcome::Delete { tag } => {
            if args.yes {
                let removed = app.remove(&tag)?;
                print_json(&serde_json::json!({
                    "kind": "delete",
                    "tag": removed.tag,
                    "removed": removed.removed,
                }))?;
            } else {
                print_json(&serde_json::json!({
                    "kind": "delete",
                    "tag": tag,
                    "removed": false,
                    "confirm": "re-run with --yes to delete",
                }))?;
            }
        }
        other => print_json(&other)?,
    }
    Ok(())
}
