use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Reading / Snapshot – raw parser output
// ---------------------------------------------------------------------------

/// One `| name | value |` row of a status dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub name: String,
    pub value: i64,
}

impl Reading {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A single sample of status variables, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub readings: Vec<Reading>,
}

impl Snapshot {
    /// Value of `name` in this sample, if it was reported.
    pub fn get(&self, name: &str) -> Option<i64> {
        self.readings
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.value)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Display group of a variable: everything before the first `_`, or the
/// whole name when there is no underscore.
pub fn group_key(name: &str) -> &str {
    name.split('_').next().unwrap_or(name)
}

/// Groups whose series are shown as raw values instead of deltas.
pub fn is_raw_group(group: &str) -> bool {
    group.starts_with("Thread")
}

// ---------------------------------------------------------------------------
// VariableSeries – one aggregated line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Values exactly as reported (gauges such as `Threads_running`).
    Raw,
    /// Differences between consecutive samples.
    Delta,
}

/// Summary numbers shown next to each chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStats {
    pub min: i64,
    pub max: i64,
    pub avg: f64,
}

impl SeriesStats {
    /// Stats over the present points; `None` when every point is a gap.
    pub fn from_points(points: &[Option<i64>]) -> Option<Self> {
        let present: Vec<i64> = points.iter().flatten().copied().collect();
        let min = *present.iter().min()?;
        let max = *present.iter().max()?;
        let sum: f64 = present.iter().map(|&v| v as f64).sum();
        Some(SeriesStats {
            min,
            max,
            avg: sum / present.len() as f64,
        })
    }
}

/// Format an average with fewer decimals the larger it gets.
pub fn format_avg(avg: f64) -> String {
    let magnitude = avg.abs();
    if magnitude >= 1000.0 {
        format!("{avg:.0}")
    } else if magnitude >= 100.0 {
        format!("{avg:.1}")
    } else if magnitude >= 10.0 {
        format!("{avg:.2}")
    } else {
        format!("{avg:.3}")
    }
}

/// The aligned series of one variable across all samples of a source.
///
/// `points` has exactly one entry per snapshot; `None` marks a sample in
/// which the variable was not reported (or, for deltas, where either side
/// of the subtraction is missing).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSeries {
    #[serde(skip)]
    pub name: String,
    #[serde(skip)]
    pub group: String,
    pub kind: SeriesKind,
    pub points: Vec<Option<i64>>,
    pub stats: Option<SeriesStats>,
}

impl VariableSeries {
    pub fn new(name: &str, kind: SeriesKind, points: Vec<Option<i64>>) -> Self {
        let stats = SeriesStats::from_points(&points);
        Self {
            name: name.to_string(),
            group: group_key(name).to_string(),
            kind,
            points,
            stats,
        }
    }

    /// Whether any present point differs from zero.
    pub fn has_nonzero(&self) -> bool {
        self.points.iter().flatten().any(|&v| v != 0)
    }
}

// ---------------------------------------------------------------------------
// Result structure
// ---------------------------------------------------------------------------

/// group name → variable name → series.
pub type GroupMap = BTreeMap<String, BTreeMap<String, VariableSeries>>;

/// Everything computed for one input path (one server).
#[derive(Debug, Clone)]
pub struct SourceReport {
    /// Display name: hostname from the summary file, or the path's own name.
    pub name: String,
    /// File or directory the report was built from.
    pub origin: PathBuf,
    /// Number of samples the series are aligned to.
    pub snapshot_count: usize,
    pub groups: GroupMap,
}

impl SourceReport {
    /// Total number of retained variables across all groups.
    pub fn variable_count(&self) -> usize {
        self.groups.values().map(|vars| vars.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_key_takes_prefix_before_first_underscore() {
        assert_eq!(group_key("Innodb_buffer_pool_reads"), "Innodb");
        assert_eq!(group_key("Innodb_rows_read"), "Innodb");
        assert_eq!(group_key("Questions"), "Questions");
        assert_eq!(group_key("_leading"), "");
    }

    #[test]
    fn raw_groups_are_thread_prefixed() {
        assert!(is_raw_group("Threads"));
        assert!(is_raw_group("Thread"));
        assert!(!is_raw_group("Com"));
        assert!(!is_raw_group("threads"));
    }

    #[test]
    fn stats_ignore_gaps() {
        let stats = SeriesStats::from_points(&[Some(0), None, Some(10), Some(-2)]).unwrap();
        assert_eq!(stats.min, -2);
        assert_eq!(stats.max, 10);
        assert!((stats.avg - 8.0 / 3.0).abs() < 1e-9);
        assert!(SeriesStats::from_points(&[None, None]).is_none());
    }

    #[test]
    fn format_avg_scales_precision() {
        assert_eq!(format_avg(1234.56), "1235");
        assert_eq!(format_avg(123.456), "123.5");
        assert_eq!(format_avg(12.3456), "12.35");
        assert_eq!(format_avg(1.23456), "1.235");
    }

    #[test]
    fn snapshot_lookup_by_name() {
        let snap = Snapshot {
            readings: vec![Reading::new("Uptime", 10), Reading::new("Questions", 5)],
        };
        assert_eq!(snap.get("Questions"), Some(5));
        assert_eq!(snap.get("Slow_queries"), None);
    }
}
