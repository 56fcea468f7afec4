//! Stock ledger tests
//!
//! Tests for the ledger engine running against the in-memory store:
//! - Adjustment overwrites the quantity on hand
//! - Receipt credits every line to the default warehouse exactly once
//! - A failed or timed out receipt leaves no trace
//! - Deleting an order never touches other orders
//! - Concurrent receipts lose no updates

use std::time::Duration;

use proptest::prelude::*;
use scm_backend::config::LedgerConfig;
use scm_backend::services::LedgerService;
use scm_backend::store::MemoryLedgerStore;
use scm_backend::AppError;
use shared::{AdjustStockInput, OrderStatus};

const WAREHOUSE: i64 = 1;

fn ledger(store: &MemoryLedgerStore) -> LedgerService<MemoryLedgerStore> {
    LedgerService::new(store.clone(), WAREHOUSE, Duration::from_secs(5))
}

fn adjust(product_id: i64, warehouse_id: i64, quantity: i32) -> AdjustStockInput {
    AdjustStockInput {
        product_id,
        warehouse_id,
        quantity,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[tokio::test]
    async fn test_adjust_overwrites_quantity() {
        let store = MemoryLedgerStore::new();
        store.add_product(10).await;
        store.add_warehouse(WAREHOUSE).await;
        let service = ledger(&store);

        service.adjust_stock(adjust(10, WAREHOUSE, 50)).await.unwrap();
        let stock = service.adjust_stock(adjust(10, WAREHOUSE, 5)).await.unwrap();

        assert_eq!(stock.quantity, 5);
        assert_eq!(store.stock_quantity(10, WAREHOUSE).await, Some(5));
        assert_eq!(store.stock_rows().await, 1);
    }

    #[tokio::test]
    async fn test_adjust_refreshes_updated_at() {
        let store = MemoryLedgerStore::new();
        store.add_product(10).await;
        store.add_warehouse(WAREHOUSE).await;
        let service = ledger(&store);

        let first = service.adjust_stock(adjust(10, WAREHOUSE, 50)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = service.adjust_stock(adjust(10, WAREHOUSE, 50)).await.unwrap();

        assert_eq!(first.stock_id, second.stock_id);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(
            service.get_stock(10, WAREHOUSE).await.unwrap().updated_at,
            second.updated_at
        );
    }

    #[tokio::test]
    async fn test_receipt_refreshes_updated_at_of_touched_rows_only() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(WAREHOUSE).await;
        let order_id = store.seed_order(1, &[(3, 2)]).await.unwrap();
        store.add_product(4).await;
        let service = ledger(&store);
        let credited = service.adjust_stock(adjust(3, WAREHOUSE, 1)).await.unwrap();
        let untouched = service.adjust_stock(adjust(4, WAREHOUSE, 1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        service.receive_purchase_order(order_id).await.unwrap();

        let after = service.get_stock(3, WAREHOUSE).await.unwrap();
        assert_eq!(after.quantity, 3);
        assert!(after.updated_at > credited.updated_at);
        assert_eq!(
            service.get_stock(4, WAREHOUSE).await.unwrap().updated_at,
            untouched.updated_at
        );
    }

    #[tokio::test]
    async fn test_adjust_accepts_negative_quantity() {
        let store = MemoryLedgerStore::new();
        store.add_product(10).await;
        store.add_warehouse(WAREHOUSE).await;

        let stock = ledger(&store)
            .adjust_stock(adjust(10, WAREHOUSE, -3))
            .await
            .unwrap();

        assert_eq!(stock.quantity, -3);
    }

    #[tokio::test]
    async fn test_adjust_unknown_product_is_referential_violation() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(WAREHOUSE).await;

        let err = ledger(&store)
            .adjust_stock(adjust(404, WAREHOUSE, 1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ReferentialViolation(_)));
        assert_eq!(store.stock_rows().await, 0);
    }

    #[tokio::test]
    async fn test_receive_credits_lines_and_marks_received() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(WAREHOUSE).await;
        let order_id = store.seed_order(1, &[(3, 2), (4, 1)]).await.unwrap();
        let service = ledger(&store);
        service.adjust_stock(adjust(4, WAREHOUSE, 10)).await.unwrap();

        let receipt = service.receive_purchase_order(order_id).await.unwrap();

        assert_eq!(store.stock_quantity(3, WAREHOUSE).await, Some(2));
        assert_eq!(store.stock_quantity(4, WAREHOUSE).await, Some(11));
        assert_eq!(store.order_status(order_id).await, Some(OrderStatus::Received));
        assert_eq!(receipt.warehouse_id, WAREHOUSE);
        assert_eq!(receipt.total_received(), 3);
        assert_eq!(receipt.lines[1].quantity_on_hand, 11);
    }

    #[tokio::test]
    async fn test_receive_adds_to_negative_stock() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(WAREHOUSE).await;
        let order_id = store.seed_order(1, &[(3, 5)]).await.unwrap();
        let service = ledger(&store);
        service.adjust_stock(adjust(3, WAREHOUSE, -3)).await.unwrap();

        service.receive_purchase_order(order_id).await.unwrap();

        assert_eq!(store.stock_quantity(3, WAREHOUSE).await, Some(2));
    }

    #[tokio::test]
    async fn test_receive_order_without_lines() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(WAREHOUSE).await;
        let order_id = store.seed_order(1, &[]).await.unwrap();

        let receipt = ledger(&store).receive_purchase_order(order_id).await.unwrap();

        assert!(receipt.lines.is_empty());
        assert_eq!(store.order_status(order_id).await, Some(OrderStatus::Received));
        assert_eq!(store.stock_rows().await, 0);
    }

    #[tokio::test]
    async fn test_failed_line_rolls_back_whole_receipt() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(WAREHOUSE).await;
        let order_id = store.seed_order(1, &[(1, 5), (2, 6), (3, 7)]).await.unwrap();
        let service = ledger(&store);
        service.adjust_stock(adjust(1, WAREHOUSE, 5)).await.unwrap();
        store.fail_stock_increment_for(2).await;

        let err = service.receive_purchase_order(order_id).await.unwrap_err();

        assert!(matches!(err, AppError::TransactionFailure(_)));
        assert_eq!(store.stock_quantity(1, WAREHOUSE).await, Some(5));
        assert_eq!(store.stock_quantity(2, WAREHOUSE).await, None);
        assert_eq!(store.stock_quantity(3, WAREHOUSE).await, None);
        assert_eq!(store.order_status(order_id).await, Some(OrderStatus::Ordered));

        // the order can still be received once the fault is gone
        store.clear_faults().await;
        service.receive_purchase_order(order_id).await.unwrap();
        assert_eq!(store.stock_quantity(1, WAREHOUSE).await, Some(10));
        assert_eq!(store.stock_quantity(2, WAREHOUSE).await, Some(6));
    }

    #[tokio::test]
    async fn test_receive_into_unknown_warehouse_rolls_back() {
        let store = MemoryLedgerStore::new();
        let order_id = store.seed_order(1, &[(3, 2)]).await.unwrap();

        let err = ledger(&store)
            .receive_purchase_order(order_id)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ReferentialViolation(_)));
        assert_eq!(store.order_status(order_id).await, Some(OrderStatus::Ordered));
    }

    #[tokio::test]
    async fn test_receive_twice_is_conflict() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(WAREHOUSE).await;
        let order_id = store.seed_order(1, &[(3, 2)]).await.unwrap();
        let service = ledger(&store);

        service.receive_purchase_order(order_id).await.unwrap();
        let err = service.receive_purchase_order(order_id).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(store.stock_quantity(3, WAREHOUSE).await, Some(2));
    }

    #[tokio::test]
    async fn test_receive_missing_order_is_not_found() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(WAREHOUSE).await;

        let err = ledger(&store).receive_purchase_order(99).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.stock_rows().await, 0);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_connectivity_failure() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(WAREHOUSE).await;
        let order_id = store.seed_order(1, &[(3, 2)]).await.unwrap();
        store.set_unreachable(true).await;

        let err = ledger(&store)
            .receive_purchase_order(order_id)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ConnectivityFailure(_)));
        store.set_unreachable(false).await;
        assert_eq!(store.stock_quantity(3, WAREHOUSE).await, None);
        assert_eq!(store.order_status(order_id).await, Some(OrderStatus::Ordered));
    }

    #[tokio::test]
    async fn test_receipt_past_deadline_rolls_back() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(WAREHOUSE).await;
        let order_id = store.seed_order(1, &[(3, 2)]).await.unwrap();
        store.stall_line_reads(Duration::from_secs(2)).await;
        let service = LedgerService::new(store.clone(), WAREHOUSE, Duration::from_millis(50));

        let err = service.receive_purchase_order(order_id).await.unwrap_err();

        assert!(matches!(err, AppError::TransactionFailure(_)));
        assert_eq!(store.order_status(order_id).await, Some(OrderStatus::Ordered));

        store.clear_faults().await;
        service.receive_purchase_order(order_id).await.unwrap();
        assert_eq!(store.stock_quantity(3, WAREHOUSE).await, Some(2));
    }

    #[tokio::test]
    async fn test_receipt_uses_configured_warehouse() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(1).await;
        store.add_warehouse(3).await;
        let order_id = store.seed_order(1, &[(5, 4)]).await.unwrap();
        let config = LedgerConfig {
            default_receiving_warehouse_id: 3,
            ..LedgerConfig::default()
        };
        let service = LedgerService::from_config(store.clone(), &config);

        let receipt = service.receive_purchase_order(order_id).await.unwrap();

        assert_eq!(receipt.warehouse_id, 3);
        assert_eq!(store.stock_quantity(5, 3).await, Some(4));
        assert_eq!(store.stock_quantity(5, 1).await, None);
    }

    #[tokio::test]
    async fn test_delete_removes_only_target_order() {
        let store = MemoryLedgerStore::new();
        let first = store.seed_order(1, &[(3, 2), (4, 1)]).await.unwrap();
        let second = store.seed_order(1, &[(3, 9)]).await.unwrap();

        ledger(&store).delete_purchase_order(first).await.unwrap();

        assert_eq!(store.order_status(first).await, None);
        assert_eq!(store.line_count(first).await, 0);
        assert_eq!(store.order_status(second).await, Some(OrderStatus::Ordered));
        assert_eq!(store.line_count(second).await, 1);
    }

    #[tokio::test]
    async fn test_delete_missing_order_changes_nothing() {
        let store = MemoryLedgerStore::new();
        let order_id = store.seed_order(1, &[(3, 2)]).await.unwrap();

        let err = ledger(&store).delete_purchase_order(order_id + 1).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.line_count(order_id).await, 1);
    }

    #[tokio::test]
    async fn test_delete_received_order_keeps_stock() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(WAREHOUSE).await;
        let order_id = store.seed_order(1, &[(3, 2)]).await.unwrap();
        let service = ledger(&store);
        service.receive_purchase_order(order_id).await.unwrap();

        service.delete_purchase_order(order_id).await.unwrap();

        assert_eq!(store.order_status(order_id).await, None);
        assert_eq!(store.stock_quantity(3, WAREHOUSE).await, Some(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_receipts_lose_no_updates() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(WAREHOUSE).await;
        let first = store.seed_order(1, &[(5, 3)]).await.unwrap();
        let second = store.seed_order(2, &[(5, 4)]).await.unwrap();
        let service = ledger(&store);

        let a = tokio::spawn({
            let service = service.clone();
            async move { service.receive_purchase_order(first).await }
        });
        let b = tokio::spawn({
            let service = service.clone();
            async move { service.receive_purchase_order(second).await }
        });

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        assert_eq!(store.stock_quantity(5, WAREHOUSE).await, Some(7));
    }

    #[tokio::test]
    async fn test_get_order_reports_status() {
        let store = MemoryLedgerStore::new();
        store.add_warehouse(WAREHOUSE).await;
        let order_id = store.seed_order(1, &[(3, 2)]).await.unwrap();
        let service = ledger(&store);

        assert_eq!(
            service.get_order(order_id).await.unwrap().status,
            OrderStatus::Ordered
        );
        service.receive_purchase_order(order_id).await.unwrap();
        assert_eq!(
            service.get_order(order_id).await.unwrap().status,
            OrderStatus::Received
        );
        assert!(matches!(
            service.get_order(order_id + 1).await,
            Err(AppError::NotFound(_))
        ));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;
    use std::collections::BTreeMap;

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The last adjustment wins, whatever came before it
        #[test]
        fn prop_adjust_is_overwrite(quantities in prop::collection::vec(-1000i32..1000, 1..10)) {
            let last = *quantities.last().unwrap();
            let stored = runtime().block_on(async {
                let store = MemoryLedgerStore::new();
                store.add_product(1).await;
                store.add_warehouse(WAREHOUSE).await;
                let service = ledger(&store);
                for quantity in &quantities {
                    service.adjust_stock(adjust(1, WAREHOUSE, *quantity)).await.unwrap();
                }
                store.stock_quantity(1, WAREHOUSE).await
            });

            prop_assert_eq!(stored, Some(last));
        }

        /// Receipt adds exactly the ordered quantities on top of existing stock
        #[test]
        fn prop_receipt_adds_line_quantities(
            initial in -500i32..500,
            lines in prop::collection::vec((1i64..5, 1i32..100), 0..8),
        ) {
            let mut expected: BTreeMap<i64, i32> = BTreeMap::new();
            for (product_id, quantity) in &lines {
                *expected.entry(*product_id).or_insert(0) += quantity;
            }

            let observed = runtime().block_on(async {
                let store = MemoryLedgerStore::new();
                store.add_warehouse(WAREHOUSE).await;
                let order_id = store.seed_order(1, &lines).await.unwrap();
                let service = ledger(&store);
                for product_id in 1..5 {
                    store.add_product(product_id).await;
                    service.adjust_stock(adjust(product_id, WAREHOUSE, initial)).await.unwrap();
                }
                service.receive_purchase_order(order_id).await.unwrap();

                let mut observed = BTreeMap::new();
                for product_id in 1..5 {
                    observed.insert(product_id, store.stock_quantity(product_id, WAREHOUSE).await);
                }
                observed
            });

            for product_id in 1..5 {
                let want = initial + expected.get(&product_id).copied().unwrap_or(0);
                prop_assert_eq!(observed[&product_id], Some(want));
            }
        }

        /// A failure on any line leaves every stock row and the status untouched
        #[test]
        fn prop_failed_receipt_changes_nothing(
            quantities in prop::collection::vec(1i32..50, 1..6),
            initial in -100i32..100,
            pick in any::<prop::sample::Index>(),
        ) {
            let lines: Vec<(i64, i32)> = quantities
                .iter()
                .enumerate()
                .map(|(idx, quantity)| (idx as i64 + 1, *quantity))
                .collect();
            let failing = lines[pick.index(lines.len())].0;

            let (before, after, status) = runtime().block_on(async {
                let store = MemoryLedgerStore::new();
                store.add_warehouse(WAREHOUSE).await;
                let order_id = store.seed_order(1, &lines).await.unwrap();
                let service = ledger(&store);
                for (product_id, _) in &lines {
                    service.adjust_stock(adjust(*product_id, WAREHOUSE, initial)).await.unwrap();
                }

                let mut before = Vec::new();
                for (product_id, _) in &lines {
                    before.push(store.stock_quantity(*product_id, WAREHOUSE).await);
                }

                store.fail_stock_increment_for(failing).await;
                let result = service.receive_purchase_order(order_id).await;
                assert!(matches!(result, Err(AppError::TransactionFailure(_))));

                let mut after = Vec::new();
                for (product_id, _) in &lines {
                    after.push(store.stock_quantity(*product_id, WAREHOUSE).await);
                }
                (before, after, store.order_status(order_id).await)
            });

            prop_assert_eq!(before, after);
            prop_assert_eq!(status, Some(OrderStatus::Ordered));
        }

        /// Deleting one order leaves every other order and its lines intact
        #[test]
        fn prop_delete_is_isolated(
            line_counts in prop::collection::vec(0usize..4, 2..6),
            pick in any::<prop::sample::Index>(),
        ) {
            let (target, survivors) = runtime().block_on(async {
                let store = MemoryLedgerStore::new();
                let mut orders = Vec::new();
                for count in &line_counts {
                    let lines: Vec<(i64, i32)> = (0..*count).map(|i| (i as i64 + 1, 1)).collect();
                    orders.push((store.seed_order(1, &lines).await.unwrap(), *count));
                }

                let target = orders[pick.index(orders.len())].0;
                ledger(&store).delete_purchase_order(target).await.unwrap();

                let mut survivors = Vec::new();
                for (order_id, count) in &orders {
                    survivors.push((
                        *order_id,
                        *count,
                        store.order_status(*order_id).await,
                        store.line_count(*order_id).await,
                    ));
                }
                (target, survivors)
            });

            for (order_id, count, status, lines) in survivors {
                if order_id == target {
                    prop_assert_eq!(status, None);
                    prop_assert_eq!(lines, 0);
                } else {
                    prop_assert_eq!(status, Some(OrderStatus::Ordered));
                    prop_assert_eq!(lines, count);
                }
            }
        }
    }
}
