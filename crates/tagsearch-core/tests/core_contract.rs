use std::{fs, path::PathBuf};

use serde_json::Value;
use tagsearch_core::config::AppConfig;
use tagsearch_core::{EntryChoice, MemoryStore, TagSearch, TaggedSearchRegistry};
use uuid::Uuid;

const FIXED_TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

fn load_fixture() -> Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("core_contract_fixture.json");
    let raw = fs::read_to_string(path).expect("read core contract fixture");
    serde_json::from_str(&raw).expect("parse core contract fixture")
}

fn fixture_section(raw: &Value, key: &str) -> Value {
    raw.get(key)
        .cloned()
        .unwrap_or_else(|| panic!("missing fixture section: {key}"))
}

fn memory_app() -> TagSearch {
    TagSearch::with_adapter(Box::new(MemoryStore::new()), AppConfig::default()).expect("app")
}

#[test]
fn empty_tag_error_payload_matches_contract() {
    let raw = load_fixture();
    let mut app = memory_app();

    let err = app.save("", "x").expect_err("empty tag");
    let mut serialized =
        serde_json::to_value(err.to_payload("save", None)).expect("serialize payload");
    let trace_id = serialized
        .get("trace_id")
        .and_then(Value::as_str)
        .expect("trace_id string");
    Uuid::parse_str(trace_id).expect("trace_id must be a UUID");
    serialized["trace_id"] = Value::String(FIXED_TRACE_ID.to_string());

    assert_eq!(serialized, fixture_section(&raw, "error_payload_invalid_input"));
    assert!(app.tags().is_empty());
}

#[test]
fn share_outcome_matches_contract() {
    let raw = load_fixture();
    let mut app = memory_app();
    app.save("News", "AI breakthroughs").expect("save");

    let outcome = app
        .resolve_entry_choice("News", Some(EntryChoice::Share))
        .expect("share");
    let serialized = serde_json::to_value(outcome).expect("serialize outcome");
    assert_eq!(serialized, fixture_section(&raw, "entry_outcome_share"));
}

#[test]
fn save_result_lists_case_variants() {
    let raw = load_fixture();
    let mut app = memory_app();
    app.save("News", "upper").expect("save");
    let saved = app.save("news", "lower").expect("save");
    let serialized = serde_json::to_value(saved).expect("serialize save result");
    assert_eq!(serialized, fixture_section(&raw, "save_result_with_variants"));
}

#[test]
fn registry_end_to_end_over_injected_store() {
    let store = MemoryStore::new();
    let mut registry = TaggedSearchRegistry::open(store.clone()).expect("open");
    assert!(registry.list().is_empty());

    registry.upsert("News", "AI breakthroughs").expect("news");
    assert_eq!(registry.list(), ["News"]);
    registry.upsert("art", "painting tips").expect("art");
    assert_eq!(registry.list(), ["art", "News"]);
    registry.delete("News").expect("delete");
    assert_eq!(registry.list(), ["art"]);

    let rehydrated = TaggedSearchRegistry::open(store).expect("reopen");
    assert_eq!(rehydrated.list(), ["art"]);
    assert_eq!(rehydrated.get("art"), Some("painting tips"));
}
