//! Storage backends for the Burrow URL store.
//!
//! [`SqliteRepository`] is the durable backend: one `url` table keyed by a
//! unique alias. [`InMemoryRepository`] honours the same contract without
//! touching disk and is meant for tests of upstream callers.

pub mod memory;
pub mod sqlite;

pub use burrow_core::{ReadRepository, Repository, Result, StorageError};
pub use memory::InMemoryRepository;
pub use sqlite::{SqliteConfig, SqliteRepository};
