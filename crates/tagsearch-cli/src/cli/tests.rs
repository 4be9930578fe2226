use super::*;
use clap::Parser;

#[test]
fn save_parses_tag_and_query() {
    let cli = Cli::try_parse_from(["tagsearch", "save", "News", "AI breakthroughs"]).expect("parse");
    match cli.command {
        Commands::Save(SaveArgs { tag, query }) => {
            assert_eq!(tag, "News");
            assert_eq!(query, "AI breakthroughs");
        }
        _ => panic!("expected save command"),
    }
}

#[test]
fn save_accepts_hyphenated_query() {
    let cli = Cli::try_parse_from(["tagsearch", "save", "Rust", "-unsafe async"]).expect("parse");
    match cli.command {
        Commands::Save(SaveArgs { query, .. }) => assert_eq!(query, "-unsafe async"),
        _ => panic!("expected save command"),
    }
}

#[test]
fn root_defaults_and_overrides() {
    let cli = Cli::try_parse_from(["tagsearch", "ls"]).expect("parse");
    assert_eq!(cli.root, PathBuf::from(".tagsearch"));

    let cli = Cli::try_parse_from(["tagsearch", "--root", "/tmp/searches", "ls", "--with-queries"])
        .expect("parse");
    assert_eq!(cli.root, PathBuf::from("/tmp/searches"));
    assert!(matches!(
        cli.command,
        Commands::Ls(ListArgs { with_queries: true })
    ));
}

#[test]
fn act_parses_choice_and_confirmation() {
    let cli =
        Cli::try_parse_from(["tagsearch", "act", "News", "delete", "--yes"]).expect("parse");
    match cli.command {
        Commands::Act(ActArgs { tag, choice, yes }) => {
            assert_eq!(tag, "News");
            assert_eq!(choice, EntryChoiceArg::Delete);
            assert!(yes);
        }
        _ => panic!("expected act command"),
    }
}

#[test]
fn act_rejects_unknown_choice() {
    let parsed = Cli::try_parse_from(["tagsearch", "act", "News", "rename"]);
    assert!(parsed.is_err(), "rename is not an entry choice");
}

#[test]
fn save_requires_query_argument() {
    let parsed = Cli::try_parse_from(["tagsearch", "save", "News"]);
    assert!(parsed.is_err(), "query is required");
}
