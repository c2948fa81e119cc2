//! Snapshot persistence seam.
//!
//! The engine makes no assumption about storage beyond "a snapshot is fully
//! serializable data", so persistence is a trait the deployment supplies. A
//! relational implementation lives outside this crate; the in-memory store
//! here backs tests and single-process deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::game::entities::{TableId, TableSnapshot};

use super::errors::StoreResult;

/// Trait for snapshot persistence, enabling testing through mock
/// implementations and dependency injection.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Fetch the latest snapshot for a table.
    async fn load(&self, table_id: TableId) -> StoreResult<Option<TableSnapshot>>;

    /// Persist a snapshot as the table's latest state.
    async fn save(&self, snapshot: &TableSnapshot) -> StoreResult<()>;
}

/// Process-local snapshot store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<TableId, TableSnapshot>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemoryStore {
    async fn load(&self, table_id: TableId) -> StoreResult<Option<TableSnapshot>> {
        Ok(self.tables.read().await.get(&table_id).cloned())
    }

    async fn save(&self, snapshot: &TableSnapshot) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .insert(snapshot.id, snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::RoomCode;

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = InMemoryStore::new();
        let snapshot = TableSnapshot::new(RoomCode::new("STO123"), 5, 10);
        store.save(&snapshot).await.unwrap();
        let loaded = store.load(snapshot.id).await.unwrap();
        assert_eq!(loaded, Some(snapshot));
    }

    #[tokio::test]
    async fn test_load_unknown_table_is_none() {
        let store = InMemoryStore::new();
        let loaded = store.load(TableId::new_v4()).await.unwrap();
        assert_eq!(loaded, None);
    }
}
