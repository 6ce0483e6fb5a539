use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::model::{group_key, is_raw_group, GroupMap, SeriesKind, Snapshot, VariableSeries};

/// Consecutive differences of an aligned series.
///
/// The first point is always `Some(0)`. Later points are `None` when either
/// the current or the previous sample lacks a value.
pub fn deltas(values: &[Option<i64>]) -> Vec<Option<i64>> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(values.len());
    out.push(Some(0));
    for pair in values.windows(2) {
        out.push(match (pair[0], pair[1]) {
            (Some(prev), Some(cur)) => Some(cur.saturating_sub(prev)),
            _ => None,
        });
    }
    out
}

/// Build the group → variable → series map for one source.
///
/// `snapshots` must already be in chronological order. Every series gets
/// one point per snapshot. Thread groups keep raw values unconditionally;
/// every other variable is kept only if one of its deltas is non-zero.
pub fn aggregate(snapshots: &[Snapshot]) -> GroupMap {
    let names: BTreeSet<&str> = snapshots
        .iter()
        .flat_map(|s| s.readings.iter().map(|r| r.name.as_str()))
        .collect();

    let lookups: Vec<HashMap<&str, i64>> = snapshots
        .iter()
        .map(|s| s.readings.iter().map(|r| (r.name.as_str(), r.value)).collect())
        .collect();

    let mut groups: GroupMap = BTreeMap::new();

    for name in names {
        let values: Vec<Option<i64>> = lookups.iter().map(|m| m.get(name).copied()).collect();
        let group = group_key(name);

        let series = if is_raw_group(group) {
            VariableSeries::new(name, SeriesKind::Raw, values)
        } else {
            let series = VariableSeries::new(name, SeriesKind::Delta, deltas(&values));
            if !series.has_nonzero() {
                continue;
            }
            series
        };

        groups
            .entry(group.to_string())
            .or_default()
            .insert(name.to_string(), series);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Reading;

    fn snapshot(pairs: &[(&str, i64)]) -> Snapshot {
        Snapshot {
            readings: pairs.iter().map(|&(n, v)| Reading::new(n, v)).collect(),
        }
    }

    #[test]
    fn deltas_start_at_zero() {
        assert_eq!(
            deltas(&[Some(100), Some(150), Some(140)]),
            vec![Some(0), Some(50), Some(-10)]
        );
        assert!(deltas(&[]).is_empty());
    }

    #[test]
    fn deltas_mark_gaps_on_both_sides() {
        assert_eq!(
            deltas(&[Some(1), None, Some(4), Some(6)]),
            vec![Some(0), None, None, Some(2)]
        );
    }

    #[test]
    fn questions_and_threads_example() {
        let snaps = vec![
            snapshot(&[("Questions", 100), ("Threads_running", 4)]),
            snapshot(&[("Questions", 150), ("Threads_running", 4)]),
        ];
        let groups = aggregate(&snaps);

        assert_eq!(groups.len(), 2);
        let questions = &groups["Questions"]["Questions"];
        assert_eq!(questions.kind, SeriesKind::Delta);
        assert_eq!(questions.points, vec![Some(0), Some(50)]);

        let threads = &groups["Threads"]["Threads_running"];
        assert_eq!(threads.kind, SeriesKind::Raw);
        assert_eq!(threads.points, vec![Some(4), Some(4)]);
    }

    #[test]
    fn constant_counters_are_dropped_with_their_group() {
        let snaps = vec![
            snapshot(&[("Uptime", 10), ("Slow_queries", 3), ("Com_select", 1)]),
            snapshot(&[("Uptime", 20), ("Slow_queries", 3), ("Com_select", 1)]),
        ];
        let groups = aggregate(&snaps);
        assert!(groups.contains_key("Uptime"));
        assert!(!groups.contains_key("Slow"));
        assert!(!groups.contains_key("Com"));
    }

    #[test]
    fn shared_prefix_shares_group() {
        let snaps = vec![
            snapshot(&[("Com_select", 1), ("Com_insert", 1)]),
            snapshot(&[("Com_select", 2), ("Com_insert", 5)]),
        ];
        let groups = aggregate(&snaps);
        let com = &groups["Com"];
        assert_eq!(com.len(), 2);
        assert!(com.values().all(|s| s.group == "Com"));
    }

    #[test]
    fn missing_variable_leaves_gap_and_keeps_alignment() {
        let snaps = vec![
            snapshot(&[("Questions", 10), ("Threads_connected", 2)]),
            snapshot(&[("Threads_connected", 3)]),
            snapshot(&[("Questions", 30), ("Threads_connected", 5)]),
        ];
        let groups = aggregate(&snaps);
        assert_eq!(
            groups["Threads"]["Threads_connected"].points,
            vec![Some(2), Some(3), Some(5)]
        );
        // No present non-zero delta: 10 → gap → 30 never pairs up.
        assert!(!groups.contains_key("Questions"));
    }

    #[test]
    fn single_snapshot_keeps_only_thread_groups() {
        let groups = aggregate(&[snapshot(&[("Questions", 100), ("Threads_cached", 0)])]);
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["Threads"]);
        assert_eq!(groups["Threads"]["Threads_cached"].points, vec![Some(0)]);
    }

    #[test]
    fn series_length_matches_snapshot_count() {
        let snaps = vec![
            snapshot(&[("Bytes_sent", 1)]),
            snapshot(&[("Bytes_sent", 2)]),
            snapshot(&[]),
            snapshot(&[("Bytes_sent", 9)]),
        ];
        let groups = aggregate(&snaps);
        assert_eq!(groups["Bytes"]["Bytes_sent"].points.len(), 4);
    }
}
