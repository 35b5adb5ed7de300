#![warn(clippy::all, missing_docs)]

//! Core domain logic for the ApexDraft fantasy dashboard.
//!
//! This crate hosts the catalog models and OpenF1 client, configuration
//! handling, the draft roster and its rules, and the persistence layer
//! used by the terminal UI and any future frontends.

pub mod catalog;
pub mod config;
pub mod draft;
pub mod models;
pub mod money;
pub mod storage;

pub use catalog::{Catalog, CatalogEvent, CatalogSync, OpenF1Client};
pub use config::AppConfig;
pub use draft::{
    CommitMode, DraftOutcome, DraftResult, DraftRosterState, DraftStore, SharedDraftStore,
    MAX_CONSTRUCTORS, MAX_DRIVERS, TOTAL_BUDGET,
};
pub use models::{Constructor, Driver, DriverStats};
pub use money::Price;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, STORAGE_KEY};
