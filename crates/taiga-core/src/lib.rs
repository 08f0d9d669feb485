//! Shared data model, configuration, and persistence for taiga.
//!
//! Everything UI-facing (rendering, playback widgets, OS notification
//! delivery) lives outside this workspace; this crate provides the canonical
//! anime records, the injected config/credential stores, and the
//! continue-watching/favorites library that the API and download crates
//! build on.

pub mod backup;
pub mod config;
pub mod credentials;
pub mod error;
pub mod library;
pub mod models;
pub mod notify;
pub mod storage;

pub use config::{ConfigStore, MemoryConfigStore};
pub use credentials::{CredentialKey, CredentialStore, MemoryCredentialStore};
pub use error::CoreError;
pub use library::LibraryStore;
pub use notify::{LogNotifier, Notification, Notifier};
pub use storage::SqliteStore;
