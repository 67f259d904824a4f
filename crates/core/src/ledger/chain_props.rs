//! Property-based tests for version chain maintenance.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use tallix_shared::types::{SubjectId, UserId};
use uuid::Uuid;

use super::chain::{root_version, spawn_version, verify};
use super::types::{CreateEntryInput, EntryOrigin, LedgerEntry, LedgerKind, TransactionType};

/// Strategy for a create input with a varying amount.
fn input_strategy() -> impl Strategy<Value = CreateEntryInput> {
    (1i64..100_000_000i64).prop_map(|cents| CreateEntryInput {
        kind: LedgerKind::Expense,
        transaction_type: TransactionType::Debit,
        amount: Decimal::new(cents, 2),
        entry_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        category: "MISC".to_string(),
        payment_mode: "CASH".to_string(),
        description: None,
        odometer: None,
        subject_id: SubjectId::new(),
        origin: EntryOrigin::Manual,
        attachment_keys: vec![],
    })
}

/// Strategy for a deterministic user id.
fn user_id_strategy() -> impl Strategy<Value = UserId> {
    any::<u128>().prop_map(|n| UserId::from(Uuid::from_u128(n)))
}

/// Builds a chain by superseding the tip once per actor.
fn grow_chain(input: &CreateEntryInput, actors: &[UserId]) -> Vec<LedgerEntry> {
    let mut rows = vec![root_version(input, UserId::new(), Utc::now())];
    for actor in actors {
        let current = rows.last().cloned().unwrap();
        let pair = spawn_version(&current, *actor, Utc::now()).unwrap();
        *rows.last_mut().unwrap() = pair.retired;
        rows.push(pair.next);
    }
    rows
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any chain built through the manager passes the integrity check.
    #[test]
    fn prop_grown_chains_always_verify(
        input in input_strategy(),
        actors in prop::collection::vec(user_id_strategy(), 0..12),
    ) {
        let chain = grow_chain(&input, &actors);
        prop_assert!(verify(&chain).is_ok(), "chain should verify: {:?}", verify(&chain));
    }

    /// Version numbers run 1, 2, ..., N in creation order.
    #[test]
    fn prop_version_numbers_contiguous(
        input in input_strategy(),
        actors in prop::collection::vec(user_id_strategy(), 0..12),
    ) {
        let chain = grow_chain(&input, &actors);
        for (index, row) in chain.iter().enumerate() {
            prop_assert_eq!(row.version_number as usize, index + 1);
        }
    }

    /// Exactly one row is active and it is the highest version.
    #[test]
    fn prop_single_active_at_the_tip(
        input in input_strategy(),
        actors in prop::collection::vec(user_id_strategy(), 0..12),
    ) {
        let chain = grow_chain(&input, &actors);
        let active: Vec<&LedgerEntry> = chain.iter().filter(|row| row.is_active).collect();
        prop_assert_eq!(active.len(), 1);
        prop_assert_eq!(active[0].version_number, chain.last().unwrap().version_number);
    }

    /// The chain id and the creator never change across versions.
    #[test]
    fn prop_chain_identity_is_stable(
        input in input_strategy(),
        actors in prop::collection::vec(user_id_strategy(), 1..12),
    ) {
        let chain = grow_chain(&input, &actors);
        let root = &chain[0];
        prop_assert_eq!(root.id, root.original_entry_id);
        for row in &chain {
            prop_assert_eq!(row.original_entry_id, root.original_entry_id);
            prop_assert_eq!(row.created_by, root.created_by);
        }
    }

    /// Every version row has a distinct id.
    #[test]
    fn prop_version_ids_are_unique(
        input in input_strategy(),
        actors in prop::collection::vec(user_id_strategy(), 0..12),
    ) {
        let chain = grow_chain(&input, &actors);
        let mut ids: Vec<_> = chain.iter().map(|row| row.id).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), chain.len());
    }

    /// Supersession copies the content fields unchanged.
    #[test]
    fn prop_spawn_preserves_content(
        input in input_strategy(),
        actor in user_id_strategy(),
    ) {
        let root = root_version(&input, UserId::new(), Utc::now());
        let pair = spawn_version(&root, actor, Utc::now()).unwrap();

        prop_assert_eq!(pair.next.amount, root.amount);
        prop_assert_eq!(pair.next.transaction_type, root.transaction_type);
        prop_assert_eq!(&pair.next.category, &root.category);
        prop_assert_eq!(&pair.next.payment_mode, &root.payment_mode);
        prop_assert_eq!(pair.next.subject_id, root.subject_id);
        prop_assert_eq!(pair.next.entry_date, root.entry_date);
        prop_assert_eq!(pair.next.origin, root.origin);
    }

    /// The retired row keeps its identity, only flags and audit change.
    #[test]
    fn prop_retired_row_keeps_identity(
        input in input_strategy(),
        actor in user_id_strategy(),
    ) {
        let root = root_version(&input, UserId::new(), Utc::now());
        let pair = spawn_version(&root, actor, Utc::now()).unwrap();

        prop_assert_eq!(pair.retired.id, root.id);
        prop_assert_eq!(pair.retired.version_number, root.version_number);
        prop_assert!(!pair.retired.is_active);
        prop_assert_eq!(pair.retired.updated_by, Some(actor));
    }
}
