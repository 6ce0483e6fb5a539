use std::collections::BTreeSet;

use crate::data::model::{SeriesStats, SourceReport};

// ---------------------------------------------------------------------------
// Dashboard context – computed once at startup, read-only afterwards
// ---------------------------------------------------------------------------

/// All computed reports, handed by reference to the presentation layer.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub reports: Vec<SourceReport>,
}

impl DashboardContext {
    pub fn new(reports: Vec<SourceReport>) -> Self {
        Self { reports }
    }

    /// Source names in load order.
    pub fn source_names(&self) -> Vec<String> {
        self.reports.iter().map(|r| r.name.clone()).collect()
    }

    /// Union of group names over all sources, sorted.
    pub fn group_names(&self) -> BTreeSet<&str> {
        self.reports
            .iter()
            .flat_map(|r| r.groups.keys().map(String::as_str))
            .collect()
    }

    pub fn is_multi_source(&self) -> bool {
        self.reports.len() > 1
    }
}

// ---------------------------------------------------------------------------
// Render tree
// ---------------------------------------------------------------------------

/// One line of a chart. A line is split into segments wherever the series
/// has a gap; x is the snapshot position.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub name: String,
    pub segments: Vec<Vec<[f64; 2]>>,
    pub stats: Option<SeriesStats>,
}

/// One chart card: a group of variables for one source.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub source: String,
    pub group: String,
    pub lines: Vec<ChartLine>,
}

impl ChartPanel {
    pub fn title(&self, multi_source: bool) -> String {
        if multi_source {
            format!("{} Variables – {}", self.group, self.source)
        } else {
            format!("{} Variables", self.group)
        }
    }
}

/// Panels to draw for the selected sources.
///
/// Ordered by group, then by source load order, so the same group from
/// different servers sits side by side.
pub fn chart_panels(ctx: &DashboardContext, selected: &BTreeSet<String>) -> Vec<ChartPanel> {
    let mut panels = Vec::new();
    for group in ctx.group_names() {
        for report in ctx.reports.iter().filter(|r| selected.contains(&r.name)) {
            let Some(variables) = report.groups.get(group) else {
                continue;
            };
            let lines = variables
                .values()
                .map(|series| ChartLine {
                    name: series.name.clone(),
                    segments: segments(&series.points),
                    stats: series.stats,
                })
                .collect();
            panels.push(ChartPanel {
                source: report.name.clone(),
                group: group.to_string(),
                lines,
            });
        }
    }
    panels
}

/// Split an aligned series into runs of present points.
fn segments(points: &[Option<i64>]) -> Vec<Vec<[f64; 2]>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, point) in points.iter().enumerate() {
        match point {
            Some(v) => current.push([i as f64, *v as f64]),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{GroupMap, SeriesKind, VariableSeries};
    use std::path::PathBuf;

    fn report(name: &str, vars: &[(&str, Vec<Option<i64>>)]) -> SourceReport {
        let mut groups = GroupMap::new();
        for (var, points) in vars {
            let series = VariableSeries::new(var, SeriesKind::Delta, points.clone());
            groups
                .entry(series.group.clone())
                .or_default()
                .insert(var.to_string(), series);
        }
        SourceReport {
            name: name.to_string(),
            origin: PathBuf::from(name),
            snapshot_count: vars.first().map_or(0, |(_, p)| p.len()),
            groups,
        }
    }

    fn context() -> DashboardContext {
        DashboardContext::new(vec![
            report("db1", &[("Questions", vec![Some(0), Some(5)]), ("Com_select", vec![Some(0), Some(1)])]),
            report("db2", &[("Questions", vec![Some(0), Some(7)])]),
        ])
    }

    fn select(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn panels_follow_group_then_source_order() {
        let panels = chart_panels(&context(), &select(&["db1", "db2"]));
        let keys: Vec<(&str, &str)> = panels
            .iter()
            .map(|p| (p.group.as_str(), p.source.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("Com", "db1"), ("Questions", "db1"), ("Questions", "db2")]
        );
    }

    #[test]
    fn deselected_sources_are_hidden() {
        let panels = chart_panels(&context(), &select(&["db2"]));
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].source, "db2");
        assert!(chart_panels(&context(), &BTreeSet::new()).is_empty());
    }

    #[test]
    fn gaps_split_lines_into_segments() {
        assert_eq!(
            segments(&[Some(0), Some(2), None, None, Some(4)]),
            vec![vec![[0.0, 0.0], [1.0, 2.0]], vec![[4.0, 4.0]]]
        );
        assert!(segments(&[None, None]).is_empty());
    }

    #[test]
    fn title_mentions_source_only_when_comparing() {
        let panel = &chart_panels(&context(), &select(&["db1"]))[0];
        assert_eq!(panel.title(false), "Com Variables");
        assert_eq!(panel.title(true), "Com Variables – db1");
    }
}
