//! hafalan-store: backing store integrations.
//!
//! Implements the `SnapshotProvider` and `MutationSink` traits for a
//! PostgREST backend, a local JSON file and an in-memory test store.

pub mod config;
pub mod file;
pub mod memory;
pub mod postgrest;

pub use config::{create_store, load_config, HafalanConfig, StoreConfig};
pub use hafalan_core::error::StoreError;
