use std::path::Path;

use tempfile::tempdir;

use super::{run_validated, validation};
use crate::cli::{ActArgs, Commands, EntryChoiceArg, ListArgs, SaveArgs, TagArg};
use tagsearch_core::TagSearch;

fn run(app: &mut TagSearch, root: &Path, command: Commands) -> anyhow::Result<()> {
    validation::validate_command_preflight(&command)?;
    run_validated(app, root, command)
}

fn save(tag: &str, query: &str) -> Commands {
    Commands::Save(SaveArgs {
        tag: tag.to_string(),
        query: query.to_string(),
    })
}

fn tag_arg(tag: &str) -> TagArg {
    TagArg {
        tag: tag.to_string(),
    }
}

#[test]
fn save_list_delete_scenario() {
    let temp = tempdir().expect("tempdir");
    let mut app = TagSearch::open(temp.path()).expect("app");

    run(&mut app, temp.path(), Commands::Init).expect("init");
    run(&mut app, temp.path(), save("News", "AI breakthroughs")).expect("save news");
    run(&mut app, temp.path(), save("art", "painting tips")).expect("save art");
    assert_eq!(app.tags(), ["art", "News"]);

    run(
        &mut app,
        temp.path(),
        Commands::Ls(ListArgs { with_queries: true }),
    )
    .expect("ls");
    run(&mut app, temp.path(), Commands::Rm(tag_arg("News"))).expect("rm");
    run(&mut app, temp.path(), Commands::Rm(tag_arg("News"))).expect("rm again");
    assert_eq!(app.tags(), ["art"]);
}

#[test]
fn empty_save_is_rejected_before_state_changes() {
    let temp = tempdir().expect("tempdir");
    let mut app = TagSearch::open(temp.path()).expect("app");

    let err = run(&mut app, temp.path(), save("", "query")).expect_err("empty tag");
    assert!(err.to_string().contains("enter both a tag and a search query"));
    let err = run(&mut app, temp.path(), save("tag", "")).expect_err("empty query");
    assert!(err.to_string().contains("enter both a tag and a search query"));
    assert!(app.tags().is_empty());
}

#[test]
fn url_and_share_require_known_tag() {
    let temp = tempdir().expect("tempdir");
    let mut app = TagSearch::open(temp.path()).expect("app");
    run(&mut app, temp.path(), save("Cats", "tabby cat")).expect("save");

    run(&mut app, temp.path(), Commands::Url(tag_arg("Cats"))).expect("url");
    run(&mut app, temp.path(), Commands::Share(tag_arg("Cats"))).expect("share");
    assert!(run(&mut app, temp.path(), Commands::Url(tag_arg("Dogs"))).is_err());
    assert!(run(&mut app, temp.path(), Commands::Get(tag_arg("Dogs"))).is_err());
}

#[test]
fn act_delete_needs_confirmation() {
    let temp = tempdir().expect("tempdir");
    let mut app = TagSearch::open(temp.path()).expect("app");
    run(&mut app, temp.path(), save("News", "AI")).expect("save");

    let unconfirmed = Commands::Act(ActArgs {
        tag: "News".to_string(),
        choice: EntryChoiceArg::Delete,
        yes: false,
    });
    run(&mut app, temp.path(), unconfirmed).expect("act without --yes");
    assert_eq!(app.tags(), ["News"]);

    let confirmed = Commands::Act(ActArgs {
        tag: "News".to_string(),
        choice: EntryChoiceArg::Delete,
        yes: true,
    });
    run(&mut app, temp.path(), confirmed).expect("act with --yes");
    assert!(app.tags().is_empty());
}

#[test]
fn act_confirmation_only_applies_to_delete() {
    let command = Commands::Act(ActArgs {
        tag: "News".to_string(),
        choice: EntryChoiceArg::Share,
        yes: true,
    });
    assert!(validation::validate_command_preflight(&command).is_err());
}

#[test]
fn act_cancel_succeeds_for_unknown_tag() {
    let temp = tempdir().expect("tempdir");
    let mut app = TagSearch::open(temp.path()).expect("app");
    let command = Commands::Act(ActArgs {
        tag: "ghost".to_string(),
        choice: EntryChoiceArg::Cancel,
        yes: false,
    });
    run(&mut app, temp.path(), command).expect("cancel");
}

#[test]
fn read_only_classification() {
    assert!(validation::command_is_read_only(&Commands::Ls(ListArgs {
        with_queries: false
    })));
    assert!(validation::command_is_read_only(&Commands::Config));
    assert!(!validation::command_is_read_only(&save("a", "b")));
    assert!(!validation::command_is_read_only(&Commands::Rm(tag_arg("a"))));
}
