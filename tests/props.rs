mod common;

use common::store_with_n;
use hashlog::{Bound, Limit, QueryDescriptor, RangeQueryEngine};
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::HashSet;

fn arb_limit() -> impl Strategy<Value = Limit> {
    prop_oneof![
        Just(Limit::Default),
        Just(Limit::Unbounded),
        (0..50usize).prop_map(Limit::Count),
    ]
}

/// 0 = latest, 1 = gt, 2 = gte, 3 = lt, 4 = lte
fn arb_bound_kind() -> impl Strategy<Value = u8> {
    0..5u8
}

fn build_query(
    kind: u8,
    hash: String,
    limit: Limit,
    reverse: bool,
) -> QueryDescriptor {
    let bound = match kind {
        0 => Bound::Latest,
        1 => Bound::After { hash, inclusive: false },
        2 => Bound::After { hash, inclusive: true },
        3 => Bound::Before { hash, inclusive: false },
        _ => Bound::Before { hash, inclusive: true },
    };
    let q = QueryDescriptor::with_bound(bound);
    let q = match limit {
        Limit::Default => q,
        Limit::Unbounded => q.unbounded(),
        Limit::Count(n) => q.with_limit(n),
    };
    if reverse { q.reversed() } else { q }
}

/// Expected append positions computed directly from the cursor position.
fn expected_positions(n: usize, query: &QueryDescriptor, cursor: Option<usize>) -> Vec<usize> {
    let amount = query.limit().resolve(n);
    let mut positions: Vec<usize> = match (query.bound(), cursor) {
        (Bound::Latest, _) => (n.saturating_sub(amount)..n).collect(),
        (_, None) => Vec::new(),
        (Bound::After { inclusive, .. }, Some(pos)) => {
            let start = if *inclusive { pos } else { pos + 1 };
            (start..n.min(start.saturating_add(amount))).collect()
        }
        (Bound::Before { inclusive, .. }, Some(pos)) => {
            let end = if *inclusive { pos + 1 } else { pos };
            (end.saturating_sub(amount)..end).collect()
        }
    };
    if query.is_reversed() {
        positions.reverse();
    }
    positions
}

// The window matches a position-based model of every bound, limit and
// reverse combination, including cursors that are not in the log.
proptest! {
    #[test]
    fn prop_window_matches_model(
        n in 0..40usize,
        kind in arb_bound_kind(),
        at in any::<Index>(),
        missing in any::<bool>(),
        limit in arb_limit(),
        reverse in any::<bool>(),
    ) {
        let (store, hashes) = store_with_n(n);
        let cursor = if missing || n == 0 { None } else { Some(at.index(n)) };
        let hash = cursor.map_or_else(|| "missing".to_string(), |i| hashes[i].clone());
        let query = build_query(kind, hash, limit, reverse);

        let result = store.query(&query);
        let positions: Vec<usize> = result
            .iter()
            .map(|e| e.payload.as_u64().unwrap() as usize)
            .collect();

        prop_assert_eq!(positions, expected_positions(n, &query, cursor));
    }
}

// Results never exceed the resolved limit, never repeat an entry, and are
// always drawn from the snapshot in append order (or its exact reverse).
proptest! {
    #[test]
    fn prop_window_is_ordered_subsequence(
        n in 0..40usize,
        kind in arb_bound_kind(),
        at in any::<Index>(),
        limit in arb_limit(),
        reverse in any::<bool>(),
    ) {
        let (store, hashes) = store_with_n(n);
        let hash = if n == 0 { String::new() } else { hashes[at.index(n)].clone() };
        let query = build_query(kind, hash, limit, reverse);
        let snapshot = store.snapshot();

        let result = RangeQueryEngine::query(&snapshot, &query);
        prop_assert!(result.len() <= query.limit().resolve(n));

        let unique: HashSet<&str> = result.iter().map(|e| e.hash.as_str()).collect();
        prop_assert_eq!(unique.len(), result.len());

        let mut positions: Vec<usize> = result
            .iter()
            .map(|e| snapshot.position(&e.hash).unwrap())
            .collect();
        if reverse {
            positions.reverse();
        }
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}

// Querying twice yields the same window, and the cursor yields exactly what
// the eager query returns.
proptest! {
    #[test]
    fn prop_query_is_pure(
        n in 0..40usize,
        kind in arb_bound_kind(),
        at in any::<Index>(),
        limit in arb_limit(),
        reverse in any::<bool>(),
    ) {
        let (store, hashes) = store_with_n(n);
        let hash = if n == 0 { String::new() } else { hashes[at.index(n)].clone() };
        let query = build_query(kind, hash, limit, reverse);

        let first = store.query(&query);
        let second = store.query(&query);
        let iterated: Vec<_> = store.iterate(&query).collect();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &iterated);
    }
}
