use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use walkdir::WalkDir;

use super::aggregate::aggregate;
use super::model::{Snapshot, SourceReport};
use super::parser::parse_file_samples;
use crate::error::LoadError;

/// Leading segment of a snapshot file name, e.g. `2024_03_01_12_00_05`.
const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How snapshot directories are scanned.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// File-name suffix identifying snapshot files.
    pub suffix: String,
    /// Companion file holding the `Hostname | ...` line.
    pub summary_file: String,
    /// Descend into sub-directories.
    pub recursive: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            suffix: "-mysqladmin".to_string(),
            summary_file: "pt-mysql-summary.out".to_string(),
            recursive: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every path as an independent source.
///
/// Results are never merged across sources. Display names that collide get
/// a numeric suffix so each source stays addressable by name.
pub fn load_sources(paths: &[PathBuf], opts: &LoadOptions) -> Result<Vec<SourceReport>, LoadError> {
    let mut reports = Vec::with_capacity(paths.len());
    let mut taken: BTreeSet<String> = BTreeSet::new();

    for path in paths {
        let mut report = load_source(path, opts)?;
        if taken.contains(&report.name) {
            let renamed = (2..)
                .map(|n| format!("{} ({n})", report.name))
                .find(|candidate| !taken.contains(candidate))
                .unwrap_or_else(|| report.origin.display().to_string());
            log::warn!(
                "source name '{}' used more than once; showing {} as '{renamed}'",
                report.name,
                path.display()
            );
            report.name = renamed;
        }
        taken.insert(report.name.clone());
        reports.push(report);
    }
    Ok(reports)
}

/// Load one path: a single snapshot file, or a directory of snapshot files.
pub fn load_source(path: &Path, opts: &LoadOptions) -> Result<SourceReport, LoadError> {
    if path.is_file() {
        load_single_file(path)
    } else if path.is_dir() {
        load_directory(path, opts)
    } else {
        Err(LoadError::InvalidPath {
            path: path.to_path_buf(),
        })
    }
}

fn load_single_file(path: &Path) -> Result<SourceReport, LoadError> {
    let snapshots = parse_file_samples(path)?;
    log::info!("{}: {} sample(s)", path.display(), snapshots.len());

    Ok(SourceReport {
        name: file_name(path),
        origin: path.to_path_buf(),
        snapshot_count: snapshots.len(),
        groups: aggregate(&snapshots),
    })
}

fn load_directory(dir: &Path, opts: &LoadOptions) -> Result<SourceReport, LoadError> {
    let files = find_snapshot_files(dir, opts)?;

    let mut snapshots: Vec<Snapshot> = Vec::new();
    for (index, file) in files.iter().enumerate() {
        log::info!("processing file {}/{}: {}", index + 1, files.len(), file.display());
        let samples = parse_file_samples(file)?;
        if samples.is_empty() {
            // Keep the slot so series show a gap instead of joining neighbours.
            log::warn!("{}: no status rows, recorded as an empty sample", file.display());
            snapshots.push(Snapshot::default());
        } else {
            snapshots.extend(samples);
        }
    }

    let name = source_name(dir, opts);
    log::info!(
        "source '{name}': {} file(s), {} sample(s)",
        files.len(),
        snapshots.len()
    );

    Ok(SourceReport {
        name,
        origin: dir.to_path_buf(),
        snapshot_count: snapshots.len(),
        groups: aggregate(&snapshots),
    })
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Parse the timestamp at the front of a snapshot file name.
pub fn snapshot_timestamp(path: &Path) -> Result<NaiveDateTime, LoadError> {
    let malformed = || LoadError::MalformedTimestamp {
        path: path.to_path_buf(),
    };
    let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(malformed)?;
    let stamp = name.split('-').next().unwrap_or(name);
    NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).map_err(|_| malformed())
}

/// Snapshot files of `dir`, oldest first.
///
/// Files sharing a timestamp are ordered by name so the result is total.
pub fn find_snapshot_files(dir: &Path, opts: &LoadOptions) -> Result<Vec<PathBuf>, LoadError> {
    let max_depth = if opts.recursive { usize::MAX } else { 1 };

    let mut stamped: Vec<(NaiveDateTime, PathBuf)> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(max_depth) {
        let entry = entry.map_err(|e| LoadError::UnreadableFile {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|n| n.ends_with(&opts.suffix));
        if !matches {
            continue;
        }
        let path = entry.into_path();
        stamped.push((snapshot_timestamp(&path)?, path));
    }

    if stamped.is_empty() {
        return Err(LoadError::NoMatchingFiles {
            path: dir.to_path_buf(),
            suffix: opts.suffix.clone(),
        });
    }

    stamped.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.file_name().cmp(&b.1.file_name())));
    for pair in stamped.windows(2) {
        if pair[0].0 == pair[1].0 {
            log::warn!(
                "{} and {} share timestamp {}; ordering by file name",
                pair[0].1.display(),
                pair[1].1.display(),
                pair[0].0
            );
        }
    }

    Ok(stamped.into_iter().map(|(_, p)| p).collect())
}

// ---------------------------------------------------------------------------
// Source naming
// ---------------------------------------------------------------------------

/// Hostname from the directory's summary file, if it has one.
pub fn read_hostname(dir: &Path, opts: &LoadOptions) -> Option<String> {
    let text = std::fs::read_to_string(dir.join(&opts.summary_file)).ok()?;
    text.lines().find_map(|line| {
        let (label, value) = line.split_once('|')?;
        if label.trim() != "Hostname" {
            return None;
        }
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Display name of a directory source: hostname, else the directory name.
pub fn source_name(dir: &Path, opts: &LoadOptions) -> String {
    read_hostname(dir, opts).unwrap_or_else(|| file_name(dir))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
