//! Core types and traits for the Burrow URL store.
//!
//! This crate defines the storage contract shared by every backend and by
//! the callers that consume it: the repository traits and the error
//! taxonomy they report through.

pub mod error;
pub mod repository;

pub use error::{Result, StorageError};
pub use repository::{ReadRepository, Repository};
