// Public fallible APIs in this crate share one concrete error contract (`TagSearchError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod action;
pub mod client;
pub mod config;
pub mod error;
pub mod interaction;
pub mod models;
pub mod persistence;
pub mod registry;

pub use action::{ActionBuilder, ShareMessage};
pub use client::TagSearch;
pub use error::{TagSearchError, Result};
pub use interaction::{EntryChoice, EntryOutcome};
pub use persistence::{DeferredStore, MemoryStore, PersistenceAdapter, SqliteStore};
pub use registry::TaggedSearchRegistry;
