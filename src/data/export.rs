use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::model::{GroupMap, SeriesKind, SourceReport};
use crate::error::LoadError;

/// Write the computed result structure to a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `{ source: { group: { variable: { kind, points, stats } } } }`
/// * `.csv`  – one row per point: `source,group,variable,kind,position,value`
pub fn export(reports: &[SourceReport], path: &Path) -> Result<(), LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => export_json(reports, path),
        "csv" => export_csv(reports, path),
        _ => Err(LoadError::UnsupportedExport {
            path: path.to_path_buf(),
        }),
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

fn export_json(reports: &[SourceReport], path: &Path) -> Result<(), LoadError> {
    let nested: BTreeMap<&str, &GroupMap> = reports
        .iter()
        .map(|r| (r.name.as_str(), &r.groups))
        .collect();
    let file = std::fs::File::create(path).map_err(|source| LoadError::ExportIo {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &nested).map_err(|source| LoadError::ExportJson {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|source| LoadError::ExportIo {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct PointRow<'a> {
    source: &'a str,
    group: &'a str,
    variable: &'a str,
    kind: SeriesKind,
    position: usize,
    value: Option<i64>,
}

fn export_csv(reports: &[SourceReport], path: &Path) -> Result<(), LoadError> {
    let csv_error = |source: csv::Error| LoadError::ExportCsv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for report in reports {
        for (group, variables) in &report.groups {
            for (variable, series) in variables {
                for (position, value) in series.points.iter().enumerate() {
                    writer.serialize(PointRow {
                        source: &report.name,
                        group,
                        variable,
                        kind: series.kind,
                        position,
                        value: *value,
                    })
                    .map_err(csv_error)?;
                }
            }
        }
    }
    writer.flush().map_err(|source| LoadError::ExportIo {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::aggregate;
    use crate::data::model::{Reading, Snapshot};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn report() -> SourceReport {
        let snaps = vec![
            Snapshot {
                readings: vec![Reading::new("Questions", 100), Reading::new("Threads_running", 4)],
            },
            Snapshot {
                readings: vec![Reading::new("Threads_running", 6)],
            },
            Snapshot {
                readings: vec![Reading::new("Questions", 130), Reading::new("Threads_running", 5)],
            },
            Snapshot {
                readings: vec![Reading::new("Questions", 180), Reading::new("Threads_running", 5)],
            },
        ];
        SourceReport {
            name: "db1".to_string(),
            origin: PathBuf::from("/tmp/db1"),
            snapshot_count: snaps.len(),
            groups: aggregate(&snaps),
        }
    }

    #[test]
    fn json_nests_source_group_variable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        export(&[report()], &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let questions = &value["db1"]["Questions"]["Questions"];
        assert_eq!(questions["kind"], "delta");
        assert_eq!(questions["points"], serde_json::json!([0, null, null, 50]));
        assert_eq!(value["db1"]["Threads"]["Threads_running"]["points"][1], 6);
        assert_eq!(value["db1"]["Threads"]["Threads_running"]["stats"]["max"], 6);
    }

    #[test]
    fn csv_has_one_row_per_point() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.csv");
        export(&[report()], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "source,group,variable,kind,position,value");
        // Questions: 4 points, Threads_running: 4 points.
        assert_eq!(lines.len(), 1 + 8);
        assert!(lines.contains(&"db1,Questions,Questions,delta,1,"));
        assert!(lines.contains(&"db1,Threads,Threads_running,raw,0,4"));
    }

    #[test]
    fn write_failures_keep_the_underlying_error() {
        use std::error::Error;

        let tmp = TempDir::new().unwrap();
        let missing_dir = tmp.path().join("missing");

        let err = export(&[report()], &missing_dir.join("out.json")).unwrap_err();
        assert!(matches!(err, LoadError::ExportIo { .. }));
        assert!(err.source().is_some());
        assert_eq!(err.path(), missing_dir.join("out.json").as_path());

        let err = export(&[report()], &missing_dir.join("out.csv")).unwrap_err();
        assert!(matches!(err, LoadError::ExportCsv { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = export(&[report()], &tmp.path().join("out.parquet")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExport { .. }));
    }
}
