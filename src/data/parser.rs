use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::model::{Reading, Snapshot};
use crate::error::LoadError;

/// `| name | value |`, anchored at the start of the line.
static ROW_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|\s*(\w+)\s*\|\s*(\S+)\s*\|").unwrap());

// ---------------------------------------------------------------------------
// Line / text parsing
// ---------------------------------------------------------------------------

/// One recognised line of a status dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// `| Variable_name | Value |`, printed at the top of every iteration.
    Header,
    Reading(Reading),
}

/// Classify one table line. Borders and non-numeric values
/// (`Version | 8.0.31`, `ON`, `-1`) yield `None`.
pub fn parse_row(line: &str) -> Option<Row> {
    let caps = ROW_REGEX.captures(line)?;
    let name = caps.get(1)?.as_str();
    let raw = caps.get(2)?.as_str();

    if name == "Variable_name" && raw == "Value" {
        return Some(Row::Header);
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match raw.parse::<i64>() {
        Ok(value) => Some(Row::Reading(Reading::new(name, value))),
        Err(_) => {
            log::debug!("skipping {name}: value {raw} does not fit in i64");
            None
        }
    }
}

/// Parse one table row into a reading; header rows yield `None`.
pub fn parse_line(line: &str) -> Option<Reading> {
    match parse_row(line)? {
        Row::Reading(reading) => Some(reading),
        Row::Header => None,
    }
}

/// All accepted readings of a status dump, in file order.
pub fn parse_text(text: &str) -> Vec<Reading> {
    text.lines().filter_map(parse_line).collect()
}

/// Readings and iteration headers of a status dump, in file order.
pub fn parse_rows(text: &str) -> Vec<Row> {
    text.lines().filter_map(parse_row).collect()
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and parse one snapshot file.
pub fn parse_file(path: &Path) -> Result<Vec<Reading>, LoadError> {
    let readings = parse_text(&read_text(path)?);
    log::debug!("{}: {} readings", path.display(), readings.len());
    Ok(readings)
}

/// Read one snapshot file and split it into its iterations.
pub fn parse_file_samples(path: &Path) -> Result<Vec<Snapshot>, LoadError> {
    let samples = split_rows(parse_rows(&read_text(path)?));
    log::debug!("{}: {} sample(s)", path.display(), samples.len());
    Ok(samples)
}

// ---------------------------------------------------------------------------
// Sample splitting
// ---------------------------------------------------------------------------

/// Accumulates readings into samples, cutting on request or when a name
/// repeats inside the current sample.
#[derive(Default)]
struct SampleBuilder {
    samples: Vec<Snapshot>,
    current: Snapshot,
    seen: HashSet<String>,
}

impl SampleBuilder {
    fn cut(&mut self) {
        if !self.current.is_empty() {
            self.samples.push(std::mem::take(&mut self.current));
        }
        self.seen.clear();
    }

    fn push(&mut self, reading: Reading) {
        if self.seen.contains(&reading.name) {
            self.cut();
        }
        self.seen.insert(reading.name.clone());
        self.current.readings.push(reading);
    }

    fn finish(mut self) -> Vec<Snapshot> {
        self.cut();
        self.samples
    }
}

/// Split a file's rows into samples.
///
/// `mysqladmin extended-status -i N` prints a header row per iteration, and
/// each header starts a new sample. Without headers a repeated variable
/// name marks the boundary instead.
pub fn split_rows(rows: Vec<Row>) -> Vec<Snapshot> {
    let mut builder = SampleBuilder::default();
    for row in rows {
        match row {
            Row::Header => builder.cut(),
            Row::Reading(reading) => builder.push(reading),
        }
    }
    builder.finish()
}

/// Split headerless readings into samples on repeated variable names.
pub fn split_samples(readings: Vec<Reading>) -> Vec<Snapshot> {
    let mut builder = SampleBuilder::default();
    for reading in readings {
        builder.push(reading);
    }
    builder.finish()
}
