//! The stock ledger
//!
//! [`StockLedger`] is the single entry point for stock mutations. Every
//! mutating operation reads the current quantity, computes the
//! before/after pair, writes the new item state, and appends one movement
//! per affected item, all under one internal write gate so concurrent
//! callers cannot interleave and break the chain invariant
//! (`movement[i].quantity_after == movement[i+1].quantity_before`).
//!
//! Queries bypass the gate and observe read-committed state.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use chrono::{DateTime, Utc};
use core_kernel::{ActorId, Clock, MovementId, PostId, StockItemId, SystemClock, VaccineId};

use crate::error::StockError;
use crate::item::{NewStockItem, StockItem, StockUpdate};
use crate::movement::{MovementKind, StockMovement};
use crate::ports::StockStore;
use crate::reporting::{self, SummaryStats};

/// Default window for [`StockLedger::recent_movements`]
pub const DEFAULT_RECENT_LIMIT: usize = 50;

/// Owns current stock quantities and the append-only movement history
pub struct StockLedger {
    store: Arc<dyn StockStore>,
    clock: Arc<dyn Clock>,
    /// Serializes mutations; the single-logical-writer boundary
    write_gate: Mutex<()>,
}

impl StockLedger {
    /// Creates a ledger using the system clock
    pub fn new(store: Arc<dyn StockStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Creates a ledger with an injected clock (deterministic tests)
    pub fn with_clock(store: Arc<dyn StockStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_gate: Mutex::new(()),
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Creates a stock item and appends its initial entry movement
    ///
    /// # Errors
    ///
    /// [`StockError::Validation`] when the initial quantity is not
    /// positive.
    pub async fn create_stock(
        &self,
        new: NewStockItem,
        actor: Option<ActorId>,
    ) -> Result<StockItem, StockError> {
        if new.quantity <= 0 {
            return Err(StockError::validation(format!(
                "initial quantity must be positive, got {}",
                new.quantity
            )));
        }

        let _gate = self.write_gate.lock().await;
        let now = self.clock.now();
        let item = StockItem {
            id: StockItemId::new_v7(),
            post_id: new.post_id,
            vaccine_id: new.vaccine_id,
            quantity: new.quantity,
            batch: new.batch,
            expiration_date: new.expiration_date,
            created_at: now,
            updated_at: now,
        };

        let movement = self.movement(
            &item,
            actor,
            MovementKind::Entry,
            new.quantity,
            0,
            new.quantity,
            "Initial stock entry",
            "New stock item created",
            now,
        );

        self.store
            .insert_item_with_movement(item.clone(), movement)
            .await?;
        info!(item = %item.id, post = %item.post_id, quantity = item.quantity, "stock created");
        Ok(item)
    }

    /// Applies a partial update, appending a movement only when the
    /// quantity changed
    ///
    /// An increase records an entry, a decrease an exit, both with the
    /// absolute difference as the change.
    ///
    /// # Errors
    ///
    /// - [`StockError::NotFound`] when the item does not exist
    /// - [`StockError::Validation`] when the requested quantity is
    ///   negative
    pub async fn update_stock(
        &self,
        id: StockItemId,
        update: StockUpdate,
        actor: Option<ActorId>,
    ) -> Result<StockItem, StockError> {
        if let Some(quantity) = update.quantity {
            if quantity < 0 {
                return Err(StockError::validation(format!(
                    "quantity cannot be negative, got {quantity}"
                )));
            }
        }

        let _gate = self.write_gate.lock().await;
        let current = self
            .store
            .get_item(id)
            .await?
            .ok_or_else(|| StockError::not_found(id))?;

        let before = current.quantity;
        let after = update.quantity.unwrap_or(before);
        let change = after - before;
        let now = self.clock.now();

        let item = StockItem {
            quantity: after,
            batch: update.batch.unwrap_or(current.batch),
            expiration_date: update.expiration_date.unwrap_or(current.expiration_date),
            updated_at: now,
            ..current
        };

        let movement = if change != 0 {
            let (kind, reason) = if change > 0 {
                (MovementKind::Entry, "Stock correction in")
            } else {
                (MovementKind::Exit, "Stock correction out")
            };
            Some(self.movement(
                &item,
                actor,
                kind,
                change.abs(),
                before,
                after,
                reason,
                &format!("Stock updated by {} doses", change.abs()),
                now,
            ))
        } else {
            None
        };

        self.store
            .update_item_with_movement(item.clone(), movement)
            .await?;
        debug!(item = %id, before, after, "stock updated");
        Ok(item)
    }

    /// Withdraws a batch entirely: one exit movement draining the current
    /// quantity, then deletion of the item
    ///
    /// History is preserved; only current state is removed.
    pub async fn remove_stock(
        &self,
        id: StockItemId,
        actor: Option<ActorId>,
    ) -> Result<(), StockError> {
        self.drain_and_delete(id, actor, MovementKind::Exit, "Stock removed")
            .await
    }

    /// Identical to [`remove_stock`] but records the drain as an expired
    /// batch
    ///
    /// [`remove_stock`]: Self::remove_stock
    pub async fn record_expired(
        &self,
        id: StockItemId,
        actor: Option<ActorId>,
    ) -> Result<(), StockError> {
        self.drain_and_delete(id, actor, MovementKind::Expired, "Expired vaccine batch")
            .await
    }

    /// Consumes one dose for an administered vaccination
    ///
    /// Selection is first-to-expire-first-out: among items matching
    /// (post, vaccine) the earliest expiration date wins, ties broken by
    /// the smallest item id so repeated calls are deterministic.
    ///
    /// # Errors
    ///
    /// [`StockError::InsufficientStock`] when no item matches or the
    /// selected item has no doses left.
    pub async fn apply_dose(
        &self,
        post_id: PostId,
        vaccine_id: VaccineId,
        actor: Option<ActorId>,
    ) -> Result<(), StockError> {
        let _gate = self.write_gate.lock().await;
        let candidates = self.store.list_items_for(post_id, vaccine_id).await?;
        let selected = select_first_to_expire(&candidates)
            .filter(|item| item.quantity > 0)
            .ok_or(StockError::InsufficientStock {
                post_id,
                vaccine_id,
            })?;

        let before = selected.quantity;
        let after = before - 1;
        let now = self.clock.now();
        let item = StockItem {
            quantity: after,
            updated_at: now,
            ..selected.clone()
        };
        let movement = self.movement(
            &item,
            actor,
            MovementKind::Exit,
            1,
            before,
            after,
            "Vaccine dose applied",
            "Dose administered to patient",
            now,
        );

        self.store
            .update_item_with_movement(item, Some(movement))
            .await?;
        info!(item = %selected.id, post = %post_id, remaining = after, "dose applied");
        Ok(())
    }

    /// Applies a signed correction to an item's quantity
    ///
    /// Unlike entry/exit movements the adjustment movement carries the
    /// signed delta directly.
    ///
    /// # Errors
    ///
    /// [`StockError::Validation`] for a zero delta or a delta that would
    /// drive the quantity negative; [`StockError::NotFound`] when the
    /// item does not exist.
    pub async fn adjust_stock(
        &self,
        id: StockItemId,
        delta: i64,
        reason: impl Into<String>,
        actor: Option<ActorId>,
    ) -> Result<StockItem, StockError> {
        if delta == 0 {
            return Err(StockError::validation("adjustment delta must be non-zero"));
        }

        let _gate = self.write_gate.lock().await;
        let current = self
            .store
            .get_item(id)
            .await?
            .ok_or_else(|| StockError::not_found(id))?;

        let before = current.quantity;
        let after = before + delta;
        if after < 0 {
            return Err(StockError::validation(format!(
                "adjustment of {delta} would drive quantity below zero (current {before})"
            )));
        }

        let now = self.clock.now();
        let item = StockItem {
            quantity: after,
            updated_at: now,
            ..current
        };
        let movement = self.movement(
            &item,
            actor,
            MovementKind::Adjustment,
            delta,
            before,
            after,
            &reason.into(),
            "Manual stock adjustment",
            now,
        );

        self.store
            .update_item_with_movement(item.clone(), Some(movement))
            .await?;
        debug!(item = %id, delta, after, "stock adjusted");
        Ok(item)
    }

    /// Moves doses of a batch to another post
    ///
    /// Appends a transfer movement at the source (quantity decreases) and
    /// one at the destination (quantity increases), merging into an
    /// existing destination item with the same vaccine, batch and
    /// expiration date or creating a new one.
    ///
    /// # Errors
    ///
    /// [`StockError::Validation`] for a non-positive quantity, a transfer
    /// to the source's own post, or a quantity exceeding what the source
    /// holds; [`StockError::NotFound`] when the source does not exist.
    pub async fn transfer_stock(
        &self,
        id: StockItemId,
        to_post: PostId,
        quantity: i64,
        actor: Option<ActorId>,
    ) -> Result<(), StockError> {
        if quantity <= 0 {
            return Err(StockError::validation(format!(
                "transfer quantity must be positive, got {quantity}"
            )));
        }

        let _gate = self.write_gate.lock().await;
        let source = self
            .store
            .get_item(id)
            .await?
            .ok_or_else(|| StockError::not_found(id))?;

        if source.post_id == to_post {
            return Err(StockError::validation(
                "cannot transfer stock to the same post",
            ));
        }
        if quantity > source.quantity {
            return Err(StockError::validation(format!(
                "transfer of {quantity} exceeds available quantity {}",
                source.quantity
            )));
        }

        let now = self.clock.now();

        // Outbound leg
        let source_after = source.quantity - quantity;
        let updated_source = StockItem {
            quantity: source_after,
            updated_at: now,
            ..source.clone()
        };
        let out_movement = self.movement(
            &updated_source,
            actor,
            MovementKind::Transfer,
            quantity,
            source.quantity,
            source_after,
            "Transfer to another post",
            "Outbound transfer leg",
            now,
        );
        self.store
            .update_item_with_movement(updated_source, Some(out_movement))
            .await?;

        // Inbound leg: merge into a matching destination batch or create one
        let destination = self
            .store
            .list_items_for(to_post, source.vaccine_id)
            .await?
            .into_iter()
            .find(|i| i.batch == source.batch && i.expiration_date == source.expiration_date);

        match destination {
            Some(dest) => {
                let before = dest.quantity;
                let after = before + quantity;
                let updated_dest = StockItem {
                    quantity: after,
                    updated_at: now,
                    ..dest
                };
                let in_movement = self.movement(
                    &updated_dest,
                    actor,
                    MovementKind::Transfer,
                    quantity,
                    before,
                    after,
                    "Transfer from another post",
                    "Inbound transfer leg",
                    now,
                );
                self.store
                    .update_item_with_movement(updated_dest, Some(in_movement))
                    .await?;
            }
            None => {
                let dest = StockItem {
                    id: StockItemId::new_v7(),
                    post_id: to_post,
                    vaccine_id: source.vaccine_id,
                    quantity,
                    batch: source.batch.clone(),
                    expiration_date: source.expiration_date,
                    created_at: now,
                    updated_at: now,
                };
                let in_movement = self.movement(
                    &dest,
                    actor,
                    MovementKind::Transfer,
                    quantity,
                    0,
                    quantity,
                    "Transfer from another post",
                    "Inbound transfer leg",
                    now,
                );
                self.store
                    .insert_item_with_movement(dest, in_movement)
                    .await?;
            }
        }

        info!(item = %id, %to_post, quantity, "stock transferred");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Fetches a stock item
    pub async fn get_item(&self, id: StockItemId) -> Result<StockItem, StockError> {
        self.store
            .get_item(id)
            .await?
            .ok_or_else(|| StockError::not_found(id))
    }

    /// All stock items, newest first
    pub async fn list_items(&self) -> Result<Vec<StockItem>, StockError> {
        Ok(self.store.list_items().await?)
    }

    /// Stock items at one post, newest first
    pub async fn list_items_by_post(&self, post_id: PostId) -> Result<Vec<StockItem>, StockError> {
        Ok(self.store.list_items_by_post(post_id).await?)
    }

    /// All movements, newest first
    pub async fn movements(&self) -> Result<Vec<StockMovement>, StockError> {
        Ok(self.store.movements().await?)
    }

    /// Movements at one post, newest first
    pub async fn movements_by_post(
        &self,
        post_id: PostId,
    ) -> Result<Vec<StockMovement>, StockError> {
        Ok(self.store.movements_by_post(post_id).await?)
    }

    /// Movements for one vaccine, newest first
    pub async fn movements_by_vaccine(
        &self,
        vaccine_id: VaccineId,
    ) -> Result<Vec<StockMovement>, StockError> {
        Ok(self.store.movements_by_vaccine(vaccine_id).await?)
    }

    /// Movements of one kind, newest first
    pub async fn movements_by_kind(
        &self,
        kind: MovementKind,
    ) -> Result<Vec<StockMovement>, StockError> {
        Ok(self.store.movements_by_kind(kind).await?)
    }

    /// Movements within the closed range `[start, end]` on creation time
    pub async fn movements_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StockMovement>, StockError> {
        Ok(self.store.movements_between(start, end).await?)
    }

    /// The most recent movements, default window of 50
    pub async fn recent_movements(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<StockMovement>, StockError> {
        Ok(self
            .store
            .recent_movements(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
            .await?)
    }

    /// Movement counts grouped by kind over the whole log
    pub async fn summary_stats(&self) -> Result<SummaryStats, StockError> {
        let movements = self.store.movements().await?;
        Ok(reporting::summary_stats(&movements))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Drains an item to zero with one closing movement, then deletes it
    async fn drain_and_delete(
        &self,
        id: StockItemId,
        actor: Option<ActorId>,
        kind: MovementKind,
        reason: &str,
    ) -> Result<(), StockError> {
        let _gate = self.write_gate.lock().await;
        let item = self
            .store
            .get_item(id)
            .await?
            .ok_or_else(|| StockError::not_found(id))?;

        let now = self.clock.now();
        let movement = self.movement(
            &item,
            actor,
            kind,
            item.quantity,
            item.quantity,
            0,
            reason,
            "Stock item removed entirely",
            now,
        );
        self.store.delete_item_with_movement(id, movement).await?;
        info!(item = %id, ?kind, drained = item.quantity, "stock item deleted");
        Ok(())
    }

    /// Builds a movement snapshotting the item's batch and expiration
    #[allow(clippy::too_many_arguments)]
    fn movement(
        &self,
        item: &StockItem,
        actor: Option<ActorId>,
        kind: MovementKind,
        change: i64,
        before: i64,
        after: i64,
        reason: &str,
        notes: &str,
        now: DateTime<Utc>,
    ) -> StockMovement {
        let movement = StockMovement {
            id: MovementId::new_v7(),
            post_id: item.post_id,
            vaccine_id: item.vaccine_id,
            actor,
            kind,
            quantity_change: change,
            quantity_before: before,
            quantity_after: after,
            batch: Some(item.batch.clone()),
            expiration_date: Some(item.expiration_date),
            reason: Some(reason.to_string()),
            notes: Some(notes.to_string()),
            created_at: now,
        };
        debug_assert!(movement.is_arithmetically_consistent());
        movement
    }
}

/// First-to-expire-first-out selection
///
/// Earliest expiration date wins; ties fall back to the smallest item id
/// so the choice is deterministic per call.
pub fn select_first_to_expire(items: &[StockItem]) -> Option<&StockItem> {
    items.iter().min_by_key(|i| (i.expiration_date, i.id))
}
