use std::collections::HashSet;

use chrono::{Local, TimeZone};

use crate::db_types::OrderId;

/// Merges the two order-ID sources for a run into one work set.
///
/// The result is the union of both inputs, order-preserving by first occurrence: remote-reported identifiers come
/// first, followed by local-only additions in their query order. Exact duplicates are removed.
pub fn merge_work_set<R, L>(remote: R, local: L) -> Vec<OrderId>
where
    R: IntoIterator<Item = OrderId>,
    L: IntoIterator<Item = OrderId>,
{
    let mut seen = HashSet::new();
    let mut work_set = Vec::new();
    for order_id in remote.into_iter().chain(local) {
        if seen.insert(order_id.clone()) {
            work_set.push(order_id);
        }
    }
    work_set
}

/// Converts a Unix-epoch string from the remote API into a local calendar string (`%Y-%m-%d %H:%M:%S`).
///
/// Missing input yields an empty string. An unparseable value is passed through unchanged rather than converted;
/// the remote schema is not contractually fixed and a raw value beats a lost one.
pub fn epoch_string_to_local(timestamp: &str) -> String {
    if timestamp.is_empty() {
        return String::new();
    }
    let Ok(secs) = timestamp.parse::<i64>() else {
        return timestamp.to_string();
    };
    match Local.timestamp_opt(secs, 0).single() {
        Some(paid_at) => paid_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<OrderId> {
        raw.iter().map(|s| OrderId::from(*s)).collect()
    }

    #[test]
    fn merge_preserves_first_occurrence_order() {
        let remote = ids(&["a", "b", "c"]);
        let local = ids(&["d", "b", "e"]);
        assert_eq!(merge_work_set(remote, local), ids(&["a", "b", "c", "d", "e"]));
    }

    #[test]
    fn merge_removes_duplicates_within_one_source() {
        let remote = ids(&["a", "a", "b"]);
        assert_eq!(merge_work_set(remote, vec![]), ids(&["a", "b"]));
    }

    #[test]
    fn merge_of_empty_sources_is_empty() {
        assert!(merge_work_set(vec![], vec![]).is_empty());
    }

    #[test]
    fn each_identifier_appears_exactly_once() {
        let remote = ids(&["1", "2", "3", "2"]);
        let local = ids(&["3", "4", "1", "5"]);
        let merged = merge_work_set(remote, local);
        let unique: std::collections::HashSet<_> = merged.iter().cloned().collect();
        assert_eq!(merged.len(), unique.len());
        assert_eq!(merged, ids(&["1", "2", "3", "4", "5"]));
    }

    #[test]
    fn empty_epoch_yields_empty_string() {
        assert_eq!(epoch_string_to_local(""), "");
    }

    #[test]
    fn garbage_epoch_passes_through_unchanged() {
        assert_eq!(epoch_string_to_local("yesterday"), "yesterday");
    }

    #[test]
    fn valid_epoch_is_formatted_in_local_time() {
        let expected = Local.timestamp_opt(1_700_000_000, 0).unwrap().format("%Y-%m-%d %H:%M:%S").to_string();
        assert_eq!(epoch_string_to_local("1700000000"), expected);
    }
}
