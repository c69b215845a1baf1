//! Stock domain ports
//!
//! [`StockStore`] is the persistence port for stock items and the
//! movement log. Methods that pair an item write with a movement append
//! must apply both atomically (one database transaction, or equivalent);
//! the [`StockLedger`](crate::ledger::StockLedger) relies on that plus
//! its own write serialization to keep movement chains consistent.
//!
//! Query methods return fully materialized result sets ordered by
//! creation timestamp descending.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use core_kernel::{DomainStore, PostId, StockItemId, StoreError, VaccineId};

use crate::item::StockItem;
use crate::movement::{MovementKind, StockMovement};

/// Persistence port for stock items and the movement ledger
#[async_trait]
pub trait StockStore: DomainStore {
    // ------------------------------------------------------------------
    // Item state
    // ------------------------------------------------------------------

    /// Fetches a stock item by id
    async fn get_item(&self, id: StockItemId) -> Result<Option<StockItem>, StoreError>;

    /// All stock items, newest first
    async fn list_items(&self) -> Result<Vec<StockItem>, StoreError>;

    /// Stock items at one post, newest first
    async fn list_items_by_post(&self, post_id: PostId) -> Result<Vec<StockItem>, StoreError>;

    /// Stock items for one (post, vaccine) pair
    async fn list_items_for(
        &self,
        post_id: PostId,
        vaccine_id: VaccineId,
    ) -> Result<Vec<StockItem>, StoreError>;

    // ------------------------------------------------------------------
    // Paired writes (atomic per call)
    // ------------------------------------------------------------------

    /// Inserts a new item and appends its entry movement
    async fn insert_item_with_movement(
        &self,
        item: StockItem,
        movement: StockMovement,
    ) -> Result<(), StoreError>;

    /// Replaces an item's state, appending a movement when one was produced
    ///
    /// Fails with `NotFound` when the item no longer exists.
    async fn update_item_with_movement(
        &self,
        item: StockItem,
        movement: Option<StockMovement>,
    ) -> Result<(), StoreError>;

    /// Deletes an item and appends its closing movement
    ///
    /// The movement outlives the item; only current state is removed.
    async fn delete_item_with_movement(
        &self,
        id: StockItemId,
        movement: StockMovement,
    ) -> Result<(), StoreError>;

    // ------------------------------------------------------------------
    // Movement log queries
    // ------------------------------------------------------------------

    /// All movements, newest first
    async fn movements(&self) -> Result<Vec<StockMovement>, StoreError>;

    /// Movements at one post, newest first
    async fn movements_by_post(&self, post_id: PostId) -> Result<Vec<StockMovement>, StoreError>;

    /// Movements for one vaccine, newest first
    async fn movements_by_vaccine(
        &self,
        vaccine_id: VaccineId,
    ) -> Result<Vec<StockMovement>, StoreError>;

    /// Movements of one kind, newest first
    async fn movements_by_kind(&self, kind: MovementKind)
        -> Result<Vec<StockMovement>, StoreError>;

    /// Movements created within the closed range `[start, end]`
    async fn movements_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StockMovement>, StoreError>;

    /// The most recent `limit` movements
    async fn recent_movements(&self, limit: usize) -> Result<Vec<StockMovement>, StoreError>;
}

/// In-memory mock implementation of [`StockStore`] for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Holds items in a map and the movement log in append order
    #[derive(Debug, Default)]
    pub struct MockStockStore {
        items: Arc<RwLock<HashMap<StockItemId, StockItem>>>,
        log: Arc<RwLock<Vec<StockMovement>>>,
    }

    impl MockStockStore {
        /// Creates an empty mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// The movement log in append (chronological) order
        pub async fn log_in_append_order(&self) -> Vec<StockMovement> {
            self.log.read().await.clone()
        }

        /// Newest first; append order breaks timestamp ties so a frozen
        /// test clock still yields a deterministic ordering
        fn descending(log: &[StockMovement]) -> Vec<StockMovement> {
            let mut out: Vec<_> = log.iter().rev().cloned().collect();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            out
        }
    }

    impl DomainStore for MockStockStore {}

    #[async_trait]
    impl StockStore for MockStockStore {
        async fn get_item(&self, id: StockItemId) -> Result<Option<StockItem>, StoreError> {
            Ok(self.items.read().await.get(&id).cloned())
        }

        async fn list_items(&self) -> Result<Vec<StockItem>, StoreError> {
            let mut items: Vec<_> = self.items.read().await.values().cloned().collect();
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(items)
        }

        async fn list_items_by_post(&self, post_id: PostId) -> Result<Vec<StockItem>, StoreError> {
            let mut items: Vec<_> = self
                .items
                .read()
                .await
                .values()
                .filter(|i| i.post_id == post_id)
                .cloned()
                .collect();
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(items)
        }

        async fn list_items_for(
            &self,
            post_id: PostId,
            vaccine_id: VaccineId,
        ) -> Result<Vec<StockItem>, StoreError> {
            Ok(self
                .items
                .read()
                .await
                .values()
                .filter(|i| i.post_id == post_id && i.vaccine_id == vaccine_id)
                .cloned()
                .collect())
        }

        async fn insert_item_with_movement(
            &self,
            item: StockItem,
            movement: StockMovement,
        ) -> Result<(), StoreError> {
            let mut items = self.items.write().await;
            let mut log = self.log.write().await;
            if items.contains_key(&item.id) {
                return Err(StoreError::conflict(format!(
                    "stock item {} already exists",
                    item.id
                )));
            }
            items.insert(item.id, item);
            log.push(movement);
            Ok(())
        }

        async fn update_item_with_movement(
            &self,
            item: StockItem,
            movement: Option<StockMovement>,
        ) -> Result<(), StoreError> {
            let mut items = self.items.write().await;
            let mut log = self.log.write().await;
            if !items.contains_key(&item.id) {
                return Err(StoreError::not_found("StockItem", item.id));
            }
            items.insert(item.id, item);
            if let Some(movement) = movement {
                log.push(movement);
            }
            Ok(())
        }

        async fn delete_item_with_movement(
            &self,
            id: StockItemId,
            movement: StockMovement,
        ) -> Result<(), StoreError> {
            let mut items = self.items.write().await;
            let mut log = self.log.write().await;
            if items.remove(&id).is_none() {
                return Err(StoreError::not_found("StockItem", id));
            }
            log.push(movement);
            Ok(())
        }

        async fn movements(&self) -> Result<Vec<StockMovement>, StoreError> {
            Ok(Self::descending(&self.log.read().await))
        }

        async fn movements_by_post(
            &self,
            post_id: PostId,
        ) -> Result<Vec<StockMovement>, StoreError> {
            let log = self.log.read().await;
            Ok(Self::descending(&log)
                .into_iter()
                .filter(|m| m.post_id == post_id)
                .collect())
        }

        async fn movements_by_vaccine(
            &self,
            vaccine_id: VaccineId,
        ) -> Result<Vec<StockMovement>, StoreError> {
            let log = self.log.read().await;
            Ok(Self::descending(&log)
                .into_iter()
                .filter(|m| m.vaccine_id == vaccine_id)
                .collect())
        }

        async fn movements_by_kind(
            &self,
            kind: MovementKind,
        ) -> Result<Vec<StockMovement>, StoreError> {
            let log = self.log.read().await;
            Ok(Self::descending(&log)
                .into_iter()
                .filter(|m| m.kind == kind)
                .collect())
        }

        async fn movements_between(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<StockMovement>, StoreError> {
            let log = self.log.read().await;
            Ok(Self::descending(&log)
                .into_iter()
                .filter(|m| m.created_at >= start && m.created_at <= end)
                .collect())
        }

        async fn recent_movements(&self, limit: usize) -> Result<Vec<StockMovement>, StoreError> {
            let log = self.log.read().await;
            Ok(Self::descending(&log).into_iter().take(limit).collect())
        }
    }
}
