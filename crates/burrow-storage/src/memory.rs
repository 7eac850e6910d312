use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use burrow_core::{ReadRepository, Repository, Result, StorageError};
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use tracing::{debug, trace};

/// In-memory storage entry for a URL mapping.
#[derive(Debug, Clone)]
struct Entry {
    id: i64,
    url: String,
}

/// In-memory implementation of the repository traits using DashMap.
///
/// `save` claims the alias through the map's entry API, so two racing saves
/// of one alias resolve to one success and one `AliasExists`. Ids come from
/// a counter that only advances on a successful save and never goes back,
/// so deleting a record never frees its id.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, Entry>,
    last_id: AtomicI64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
            last_id: AtomicI64::new(0),
        }
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, alias: &str) -> Result<String> {
        self.storage
            .get(alias)
            .map(|entry| entry.url.clone())
            .ok_or_else(|| StorageError::NotFound(alias.to_owned()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn save(&self, url: &str, alias: &str) -> Result<i64> {
        // The entry guard holds the shard lock, so check-and-insert is atomic.
        match self.storage.entry(alias.to_owned()) {
            MapEntry::Occupied(_) => Err(StorageError::AliasExists(alias.to_owned())),
            MapEntry::Vacant(slot) => {
                let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
                slot.insert(Entry {
                    id,
                    url: url.to_owned(),
                });
                debug!(alias = %alias, id, "saved url");
                Ok(id)
            }
        }
    }

    async fn delete(&self, alias: &str) -> Result<()> {
        match self.storage.remove(alias) {
            Some((_, entry)) => debug!(alias = %alias, id = entry.id, "deleted url"),
            None => trace!(alias = %alias, "delete of unknown alias"),
        }
        Ok(())
    }
}
