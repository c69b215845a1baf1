//! Ledger behavior tests against the in-memory store

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};

use core_kernel::{ActorId, Clock, FixedClock, PostId, SystemClock, VaccineId};
use domain_stock::ports::mock::MockStockStore;
use domain_stock::{
    MovementKind, NewStockItem, StockError, StockLedger, StockStore, StockUpdate, SummaryStats,
};

fn new_item(post_id: PostId, vaccine_id: VaccineId, quantity: i64, batch: &str) -> NewStockItem {
    NewStockItem {
        post_id,
        vaccine_id,
        quantity,
        batch: batch.to_string(),
        expiration_date: (Utc::now() + Duration::days(365)).date_naive(),
    }
}

fn ledger_with_store() -> (Arc<MockStockStore>, StockLedger) {
    let store = Arc::new(MockStockStore::new());
    let ledger = StockLedger::new(Arc::clone(&store) as Arc<dyn StockStore>);
    (store, ledger)
}

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn test_create_stock_appends_single_entry_movement() {
    let (store, ledger) = ledger_with_store();
    let post = PostId::new();
    let vaccine = VaccineId::new();

    let item = ledger
        .create_stock(new_item(post, vaccine, 50, "L1"), Some(ActorId::new()))
        .await
        .unwrap();

    assert_eq!(item.quantity, 50);

    let log = store.log_in_append_order().await;
    assert_eq!(log.len(), 1);
    let entry = &log[0];
    assert_eq!(entry.kind, MovementKind::Entry);
    assert_eq!(entry.quantity_before, 0);
    assert_eq!(entry.quantity_after, 50);
    assert_eq!(entry.quantity_change, 50);
    assert_eq!(entry.batch.as_deref(), Some("L1"));
    assert!(entry.actor.is_some());
}

// ============================================================================
// The §8-style end-to-end scenario
// ============================================================================

#[tokio::test]
async fn test_create_update_apply_dose_scenario() {
    let (store, ledger) = ledger_with_store();
    let post = PostId::new();
    let vaccine = VaccineId::new();

    let item = ledger
        .create_stock(new_item(post, vaccine, 50, "L1"), None)
        .await
        .unwrap();
    assert_eq!(store.log_in_append_order().await.len(), 1);

    // 50 -> 40 records an exit of 10
    let updated = ledger
        .update_stock(item.id, StockUpdate::quantity(40), None)
        .await
        .unwrap();
    assert_eq!(updated.quantity, 40);
    let log = store.log_in_append_order().await;
    let exit = log.last().unwrap();
    assert_eq!(exit.kind, MovementKind::Exit);
    assert_eq!(exit.quantity_change, 10);
    assert_eq!(exit.quantity_after, 40);

    // A dose decrements by exactly one
    ledger.apply_dose(post, vaccine, None).await.unwrap();
    let refetched = ledger.get_item(item.id).await.unwrap();
    assert_eq!(refetched.quantity, 39);
    let log = store.log_in_append_order().await;
    let dose = log.last().unwrap();
    assert_eq!(dose.kind, MovementKind::Exit);
    assert_eq!(dose.quantity_change, 1);
    assert_eq!(dose.quantity_before, 40);
    assert_eq!(dose.quantity_after, 39);
}

// ============================================================================
// Chain invariant
// ============================================================================

#[tokio::test]
async fn test_movement_chain_is_consistent_per_item() {
    let (store, ledger) = ledger_with_store();
    let post = PostId::new();
    let vaccine = VaccineId::new();

    let item = ledger
        .create_stock(new_item(post, vaccine, 20, "L1"), None)
        .await
        .unwrap();
    ledger
        .update_stock(item.id, StockUpdate::quantity(35), None)
        .await
        .unwrap();
    ledger.apply_dose(post, vaccine, None).await.unwrap();
    ledger.adjust_stock(item.id, -4, "breakage", None).await.unwrap();
    ledger.remove_stock(item.id, None).await.unwrap();

    let log = store.log_in_append_order().await;
    assert_eq!(log.len(), 5);
    for window in log.windows(2) {
        assert_eq!(
            window[0].quantity_after, window[1].quantity_before,
            "chain broken between consecutive movements"
        );
    }
    for movement in &log {
        assert!(movement.is_arithmetically_consistent());
        assert!(movement.quantity_after >= 0);
    }
    assert_eq!(log.last().unwrap().quantity_after, 0);
}

// ============================================================================
// Removal and expiry
// ============================================================================

#[tokio::test]
async fn test_remove_stock_drains_and_deletes() {
    let (store, ledger) = ledger_with_store();
    let item = ledger
        .create_stock(new_item(PostId::new(), VaccineId::new(), 12, "L1"), None)
        .await
        .unwrap();

    ledger.remove_stock(item.id, None).await.unwrap();

    assert!(matches!(
        ledger.get_item(item.id).await.unwrap_err(),
        StockError::NotFound(_)
    ));
    // History survives deletion
    let log = store.log_in_append_order().await;
    assert_eq!(log.len(), 2);
    let closing = log.last().unwrap();
    assert_eq!(closing.kind, MovementKind::Exit);
    assert_eq!(closing.quantity_change, 12);
    assert_eq!(closing.quantity_after, 0);
}

#[tokio::test]
async fn test_record_expired_uses_expired_kind() {
    let (store, ledger) = ledger_with_store();
    let item = ledger
        .create_stock(new_item(PostId::new(), VaccineId::new(), 7, "L1"), None)
        .await
        .unwrap();

    ledger.record_expired(item.id, None).await.unwrap();

    let closing = store.log_in_append_order().await.pop().unwrap();
    assert_eq!(closing.kind, MovementKind::Expired);
    assert_eq!(closing.quantity_before, 7);
    assert_eq!(closing.quantity_after, 0);
}

#[tokio::test]
async fn test_operations_on_deleted_item_fail_not_found() {
    let (_store, ledger) = ledger_with_store();
    let item = ledger
        .create_stock(new_item(PostId::new(), VaccineId::new(), 5, "L1"), None)
        .await
        .unwrap();

    ledger.remove_stock(item.id, None).await.unwrap();

    assert!(matches!(
        ledger.record_expired(item.id, None).await.unwrap_err(),
        StockError::NotFound(_)
    ));
    assert!(matches!(
        ledger.remove_stock(item.id, None).await.unwrap_err(),
        StockError::NotFound(_)
    ));
    assert!(matches!(
        ledger
            .update_stock(item.id, StockUpdate::quantity(1), None)
            .await
            .unwrap_err(),
        StockError::NotFound(_)
    ));
}

// ============================================================================
// Dose application
// ============================================================================

#[tokio::test]
async fn test_apply_dose_selects_first_to_expire() {
    let (_store, ledger) = ledger_with_store();
    let post = PostId::new();
    let vaccine = VaccineId::new();

    let later = ledger
        .create_stock(
            NewStockItem {
                post_id: post,
                vaccine_id: vaccine,
                quantity: 10,
                batch: "LATER".to_string(),
                expiration_date: NaiveDate::from_ymd_opt(2027, 6, 1).unwrap(),
            },
            None,
        )
        .await
        .unwrap();
    let soon = ledger
        .create_stock(
            NewStockItem {
                post_id: post,
                vaccine_id: vaccine,
                quantity: 10,
                batch: "SOON".to_string(),
                expiration_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            },
            None,
        )
        .await
        .unwrap();

    ledger.apply_dose(post, vaccine, None).await.unwrap();

    assert_eq!(ledger.get_item(soon.id).await.unwrap().quantity, 9);
    assert_eq!(ledger.get_item(later.id).await.unwrap().quantity, 10);
}

#[tokio::test]
async fn test_apply_dose_without_stock_fails() {
    let (_store, ledger) = ledger_with_store();
    let err = ledger
        .apply_dose(PostId::new(), VaccineId::new(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, StockError::InsufficientStock { .. }));
}

#[tokio::test]
async fn test_apply_dose_on_drained_batch_fails() {
    let (_store, ledger) = ledger_with_store();
    let post = PostId::new();
    let vaccine = VaccineId::new();
    let item = ledger
        .create_stock(new_item(post, vaccine, 1, "L1"), None)
        .await
        .unwrap();

    ledger.apply_dose(post, vaccine, None).await.unwrap();
    assert_eq!(ledger.get_item(item.id).await.unwrap().quantity, 0);

    // The batch still exists but holds no doses
    let err = ledger.apply_dose(post, vaccine, None).await.unwrap_err();
    assert!(matches!(err, StockError::InsufficientStock { .. }));
}

// ============================================================================
// Transfers
// ============================================================================

#[tokio::test]
async fn test_transfer_records_both_legs() {
    let (store, ledger) = ledger_with_store();
    let from = PostId::new();
    let to = PostId::new();
    let vaccine = VaccineId::new();

    let source = ledger
        .create_stock(new_item(from, vaccine, 30, "L1"), None)
        .await
        .unwrap();

    ledger.transfer_stock(source.id, to, 10, None).await.unwrap();

    assert_eq!(ledger.get_item(source.id).await.unwrap().quantity, 20);
    let at_destination = store.list_items_for(to, vaccine).await.unwrap();
    assert_eq!(at_destination.len(), 1);
    assert_eq!(at_destination[0].quantity, 10);
    assert_eq!(at_destination[0].batch, "L1");

    let log = store.log_in_append_order().await;
    let legs: Vec<_> = log
        .iter()
        .filter(|m| m.kind == MovementKind::Transfer)
        .collect();
    assert_eq!(legs.len(), 2);
    let out = legs.iter().find(|m| m.post_id == from).unwrap();
    let inbound = legs.iter().find(|m| m.post_id == to).unwrap();
    assert_eq!(out.quantity_after, out.quantity_before - out.quantity_change);
    assert_eq!(
        inbound.quantity_after,
        inbound.quantity_before + inbound.quantity_change
    );
}

#[tokio::test]
async fn test_transfer_merges_into_matching_destination_batch() {
    let (store, ledger) = ledger_with_store();
    let from = PostId::new();
    let to = PostId::new();
    let vaccine = VaccineId::new();
    let expiration = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

    let source = ledger
        .create_stock(
            NewStockItem {
                post_id: from,
                vaccine_id: vaccine,
                quantity: 30,
                batch: "L7".to_string(),
                expiration_date: expiration,
            },
            None,
        )
        .await
        .unwrap();
    let existing_dest = ledger
        .create_stock(
            NewStockItem {
                post_id: to,
                vaccine_id: vaccine,
                quantity: 5,
                batch: "L7".to_string(),
                expiration_date: expiration,
            },
            None,
        )
        .await
        .unwrap();

    ledger.transfer_stock(source.id, to, 10, None).await.unwrap();

    assert_eq!(ledger.get_item(existing_dest.id).await.unwrap().quantity, 15);
    assert_eq!(store.list_items_for(to, vaccine).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_transfer_validation() {
    let (_store, ledger) = ledger_with_store();
    let from = PostId::new();
    let vaccine = VaccineId::new();
    let source = ledger
        .create_stock(new_item(from, vaccine, 5, "L1"), None)
        .await
        .unwrap();

    assert!(matches!(
        ledger
            .transfer_stock(source.id, PostId::new(), 0, None)
            .await
            .unwrap_err(),
        StockError::Validation(_)
    ));
    assert!(matches!(
        ledger
            .transfer_stock(source.id, from, 1, None)
            .await
            .unwrap_err(),
        StockError::Validation(_)
    ));
    assert!(matches!(
        ledger
            .transfer_stock(source.id, PostId::new(), 6, None)
            .await
            .unwrap_err(),
        StockError::Validation(_)
    ));
}

// ============================================================================
// Queries and reporting
// ============================================================================

#[tokio::test]
async fn test_movement_queries_filter_and_order() {
    let (_store, ledger) = ledger_with_store();
    let post_a = PostId::new();
    let post_b = PostId::new();
    let vaccine = VaccineId::new();

    let a = ledger
        .create_stock(new_item(post_a, vaccine, 10, "A"), None)
        .await
        .unwrap();
    ledger
        .create_stock(new_item(post_b, vaccine, 10, "B"), None)
        .await
        .unwrap();
    ledger
        .update_stock(a.id, StockUpdate::quantity(4), None)
        .await
        .unwrap();

    assert_eq!(ledger.movements().await.unwrap().len(), 3);
    assert_eq!(ledger.movements_by_post(post_a).await.unwrap().len(), 2);
    assert_eq!(ledger.movements_by_post(post_b).await.unwrap().len(), 1);
    assert_eq!(ledger.movements_by_vaccine(vaccine).await.unwrap().len(), 3);
    assert_eq!(
        ledger
            .movements_by_kind(MovementKind::Exit)
            .await
            .unwrap()
            .len(),
        1
    );

    // Newest first
    let all = ledger.movements().await.unwrap();
    for window in all.windows(2) {
        assert!(window[0].created_at >= window[1].created_at);
    }
}

#[tokio::test]
async fn test_date_range_is_inclusive() {
    let store = Arc::new(MockStockStore::new());
    let instant = Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap();
    let clock = Arc::new(FixedClock::at(instant)) as Arc<dyn Clock>;
    let ledger = StockLedger::with_clock(Arc::clone(&store) as Arc<dyn StockStore>, clock);

    ledger
        .create_stock(new_item(PostId::new(), VaccineId::new(), 10, "L1"), None)
        .await
        .unwrap();

    // Boundaries equal to the creation instant are included
    let hits = ledger.movements_between(instant, instant).await.unwrap();
    assert_eq!(hits.len(), 1);

    let misses = ledger
        .movements_between(instant + Duration::seconds(1), instant + Duration::days(1))
        .await
        .unwrap();
    assert!(misses.is_empty());
}

#[tokio::test]
async fn test_recent_movements_defaults_to_fifty() {
    let (_store, ledger) = ledger_with_store();
    let post = PostId::new();
    let vaccine = VaccineId::new();

    let item = ledger
        .create_stock(new_item(post, vaccine, 200, "L1"), None)
        .await
        .unwrap();
    for _ in 0..59 {
        ledger.apply_dose(post, vaccine, None).await.unwrap();
    }
    assert_eq!(ledger.get_item(item.id).await.unwrap().quantity, 141);

    assert_eq!(ledger.recent_movements(None).await.unwrap().len(), 50);
    assert_eq!(ledger.recent_movements(Some(10)).await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_summary_stats_scenario() {
    let (_store, ledger) = ledger_with_store();
    let post = PostId::new();
    let vaccine = VaccineId::new();

    // 3 entries
    let a = ledger
        .create_stock(new_item(post, vaccine, 10, "A"), None)
        .await
        .unwrap();
    let b = ledger
        .create_stock(new_item(post, vaccine, 10, "B"), None)
        .await
        .unwrap();
    ledger
        .update_stock(a.id, StockUpdate::quantity(15), None)
        .await
        .unwrap();
    // 2 exits
    ledger.apply_dose(post, vaccine, None).await.unwrap();
    ledger
        .update_stock(b.id, StockUpdate::quantity(5), None)
        .await
        .unwrap();
    // 1 adjustment
    ledger.adjust_stock(a.id, -1, "recount", None).await.unwrap();

    let stats = ledger.summary_stats().await.unwrap();
    assert_eq!(
        stats,
        SummaryStats {
            total_entries: 3,
            total_exits: 2,
            total_adjustments: 1,
            total_expired: 0,
            total_transfers: 0,
        }
    );
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_doses_keep_chain_consistent() {
    let store = Arc::new(MockStockStore::new());
    let ledger = Arc::new(StockLedger::with_clock(
        Arc::clone(&store) as Arc<dyn StockStore>,
        Arc::new(SystemClock),
    ));
    let post = PostId::new();
    let vaccine = VaccineId::new();

    let item = ledger
        .create_stock(new_item(post, vaccine, 40, "L1"), None)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..40 {
        let ledger = Arc::clone(&ledger);
        handles.push(tokio::spawn(async move {
            ledger.apply_dose(post, vaccine, None).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(ledger.get_item(item.id).await.unwrap().quantity, 0);

    let log = store.log_in_append_order().await;
    assert_eq!(log.len(), 41);
    for window in log.windows(2) {
        assert_eq!(window[0].quantity_after, window[1].quantity_before);
    }
}
