use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use eframe::egui;

use mysqladmin_viewer::app::MysqladminViewerApp;
use mysqladmin_viewer::context::DashboardContext;
use mysqladmin_viewer::data::export::export;
use mysqladmin_viewer::data::loader::{load_sources, LoadOptions};
use mysqladmin_viewer::data::model::format_avg;

#[derive(Parser, Debug)]
#[command(name = "mysqladmin-viewer")]
#[command(about = "Chart per-variable deltas of mysqladmin status snapshots")]
struct Args {
    /// Snapshot files or directories holding `*-mysqladmin` files (one source each)
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// File-name suffix of snapshot files inside a directory
    #[arg(long, default_value = "-mysqladmin")]
    suffix: String,

    /// Companion file carrying the `Hostname | ...` line
    #[arg(long, default_value = "pt-mysql-summary.out")]
    summary_file: String,

    /// Also scan sub-directories for snapshot files
    #[arg(short, long)]
    recursive: bool,

    /// Write the computed series to a .json or .csv file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Print a per-source summary instead of opening the viewer
    #[arg(long)]
    headless: bool,
}

impl Args {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            suffix: self.suffix.clone(),
            summary_file: self.summary_file.clone(),
            recursive: self.recursive,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match failure_message(&run(args)) {
        None => ExitCode::SUCCESS,
        Some(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// Line printed to stderr when a run fails.
fn failure_message(result: &Result<()>) -> Option<String> {
    result.as_ref().err().map(|e| format!("error: {e:#}"))
}

fn run(args: Args) -> Result<()> {
    let reports = load_sources(&args.paths, &args.load_options())?;
    let context = DashboardContext::new(reports);

    if let Some(path) = &args.export {
        export(&context.reports, path)?;
        log::info!("Exported {} source(s) to {}", context.reports.len(), path.display());
        return Ok(());
    }

    if args.headless {
        print_summary(&context);
        return Ok(());
    }

    run_viewer(context)
}

fn print_summary(context: &DashboardContext) {
    for report in &context.reports {
        println!(
            "== {} ({} samples from {})",
            report.name,
            report.snapshot_count,
            report.origin.display()
        );
        for (group, variables) in &report.groups {
            println!("  [{group}]");
            for (name, series) in variables {
                match series.stats {
                    Some(s) => println!(
                        "    {name:<40} max {:>12}  min {:>12}  avg {:>12}",
                        s.max,
                        s.min,
                        format_avg(s.avg)
                    ),
                    None => println!("    {name:<40} (no readings)"),
                }
            }
        }
    }
}

fn run_viewer(context: DashboardContext) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "mysqladmin output",
        options,
        Box::new(|_cc| Ok(Box::new(MysqladminViewerApp::new(context)))),
    )
    .map_err(|e| anyhow!("viewer failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use std::ffi::OsStr;
    use tempfile::TempDir;

    #[test]
    fn missing_paths_is_a_usage_error() {
        let err = Args::try_parse_from(["mysqladmin-viewer"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
        assert!(err.render().to_string().contains("Usage:"));
    }

    #[test]
    fn options_map_onto_load_options() {
        let args = Args::try_parse_from([
            "mysqladmin-viewer",
            "--suffix",
            "-status",
            "-r",
            "--headless",
            "a",
            "b",
        ])
        .unwrap();
        assert_eq!(args.paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert!(args.headless);

        let opts = args.load_options();
        assert_eq!(opts.suffix, "-status");
        assert_eq!(opts.summary_file, "pt-mysql-summary.out");
        assert!(opts.recursive);
    }

    #[test]
    fn load_failure_is_reported_with_path() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("no-such-dir");
        let args = Args::try_parse_from([
            OsStr::new("mysqladmin-viewer"),
            OsStr::new("--headless"),
            missing.as_os_str(),
        ])
        .unwrap();

        let message = failure_message(&run(args)).unwrap();
        assert!(message.starts_with("error: invalid path: "));
        assert!(message.contains("no-such-dir"));
        assert_eq!(failure_message(&Ok(())), None);
    }

    #[test]
    fn export_mode_writes_file_and_succeeds() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("2024_01_01_00_00_00-mysqladmin"),
            "| Threads_running | 3 |\n",
        )
        .unwrap();
        let out = tmp.path().join("series.json");
        let args = Args::try_parse_from([
            OsStr::new("mysqladmin-viewer"),
            OsStr::new("--export"),
            out.as_os_str(),
            tmp.path().as_os_str(),
        ])
        .unwrap();

        assert_eq!(failure_message(&run(args)), None);
        assert!(out.exists());
    }
}
