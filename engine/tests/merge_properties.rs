//! Property tests for the stats merge.
//!
//! The whole sync design rests on the field-wise merge being a monotonic,
//! commutative, idempotent combine. These tests pin that down over
//! arbitrary inputs.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use treetype_engine::{SnippetStat, StatsCollection};

fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    // 2000-01-01 through ~2033
    (946_684_800i64..2_000_000_000i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn arb_stat() -> impl Strategy<Value = SnippetStat> {
    (0u32..400, 0u32..=100, 1u64..10_000, arb_timestamp()).prop_map(
        |(wpm, accuracy, count, last)| SnippetStat {
            best_wpm: wpm,
            best_accuracy: accuracy,
            practice_count: count,
            last_practiced: last,
        },
    )
}

fn arb_collection() -> impl Strategy<Value = StatsCollection> {
    proptest::collection::btree_map("[a-d]{1,2}", arb_stat(), 0..6)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn merge_dominates_both_inputs(a in arb_stat(), b in arb_stat()) {
        let merged = a.merged_with(&b);
        prop_assert!(merged.dominates(&a));
        prop_assert!(merged.dominates(&b));
    }

    #[test]
    fn merge_is_commutative_up_to_timestamp_ties(a in arb_stat(), b in arb_stat()) {
        let ab = a.merged_with(&b);
        let ba = b.merged_with(&a);
        prop_assert_eq!(ab.best_wpm, ba.best_wpm);
        prop_assert_eq!(ab.best_accuracy, ba.best_accuracy);
        prop_assert_eq!(ab.practice_count, ba.practice_count);
        prop_assert_eq!(ab.last_practiced, ba.last_practiced);
    }

    #[test]
    fn merge_is_associative(a in arb_stat(), b in arb_stat(), c in arb_stat()) {
        let left = a.merged_with(&b).merged_with(&c);
        let right = a.merged_with(&b.merged_with(&c));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn record_attempt_is_monotonic(
        mut stat in arb_stat(),
        wpm in 0u32..400,
        accuracy in 0u32..=100,
        now in arb_timestamp(),
    ) {
        let before = stat.clone();
        stat.record_attempt(wpm, accuracy, now);

        prop_assert!(stat.best_wpm >= before.best_wpm);
        prop_assert!(stat.best_accuracy >= before.best_accuracy);
        prop_assert_eq!(stat.practice_count, before.practice_count + 1);
    }

    #[test]
    fn collection_merge_is_idempotent(
        mut local in arb_collection(),
        remote in arb_collection(),
    ) {
        local.merge_remote(&remote);
        let after_first = local.clone();

        let report = local.merge_remote(&remote);
        prop_assert!(!report.local_changed());
        prop_assert_eq!(local, after_first);
    }

    #[test]
    fn collection_merge_never_drops_entries(
        mut local in arb_collection(),
        remote in arb_collection(),
    ) {
        let local_ids: Vec<_> = local.iter().map(|(id, _)| id.clone()).collect();
        local.merge_remote(&remote);

        for id in &local_ids {
            prop_assert!(local.contains(id));
        }
        for (id, _) in remote.iter() {
            prop_assert!(local.contains(id));
        }
    }

    #[test]
    fn json_roundtrip(stats in arb_collection()) {
        let json = stats.to_json().unwrap();
        let restored = StatsCollection::from_json(&json).unwrap();
        prop_assert_eq!(stats, restored);
    }
}
