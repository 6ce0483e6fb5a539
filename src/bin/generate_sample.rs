use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Parser;

/// Write fake pt-stalk style `*-mysqladmin` captures for trying the viewer.
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Output directory; one sub-directory per server is created inside
    #[arg(default_value = "sample_data")]
    out_dir: PathBuf,

    /// Number of servers
    #[arg(long, default_value = "3")]
    servers: usize,

    /// Snapshot files per server
    #[arg(long, default_value = "30")]
    snapshots: usize,

    /// Seconds between snapshot files
    #[arg(long, default_value = "10")]
    interval: i64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `0..bound`.
    fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            0
        } else {
            self.next_u64() % bound
        }
    }
}

/// How a variable moves between snapshots.
enum Shape {
    /// Monotonic counter growing by up to `rate` per snapshot.
    Counter { rate: u64 },
    /// Gauge wandering in `0..=max`.
    Gauge { max: u64 },
    /// Never changes (filtered out by the viewer unless Thread-prefixed).
    Constant,
}

const VARIABLES: &[(&str, Shape)] = &[
    ("Aborted_clients", Shape::Counter { rate: 2 }),
    ("Bytes_received", Shape::Counter { rate: 400_000 }),
    ("Bytes_sent", Shape::Counter { rate: 2_500_000 }),
    ("Com_commit", Shape::Counter { rate: 300 }),
    ("Com_delete", Shape::Counter { rate: 40 }),
    ("Com_insert", Shape::Counter { rate: 250 }),
    ("Com_select", Shape::Counter { rate: 1_800 }),
    ("Com_update", Shape::Counter { rate: 120 }),
    ("Created_tmp_disk_tables", Shape::Counter { rate: 3 }),
    ("Created_tmp_tables", Shape::Counter { rate: 60 }),
    ("Handler_read_key", Shape::Counter { rate: 9_000 }),
    ("Handler_read_rnd_next", Shape::Counter { rate: 40_000 }),
    ("Innodb_buffer_pool_reads", Shape::Counter { rate: 50 }),
    ("Innodb_buffer_pool_read_requests", Shape::Counter { rate: 120_000 }),
    ("Innodb_rows_read", Shape::Counter { rate: 60_000 }),
    ("Innodb_row_lock_waits", Shape::Constant),
    ("Questions", Shape::Counter { rate: 2_500 }),
    ("Select_full_join", Shape::Constant),
    ("Slow_queries", Shape::Counter { rate: 1 }),
    ("Threads_cached", Shape::Gauge { max: 8 }),
    ("Threads_connected", Shape::Gauge { max: 120 }),
    ("Threads_running", Shape::Gauge { max: 16 }),
    ("Uptime", Shape::Counter { rate: 10 }),
];

fn render_table(values: &[u64]) -> String {
    let mut out = String::new();
    let border = "+-----------------------------------+----------------+\n";
    out.push_str(border);
    out.push_str("| Variable_name                     | Value          |\n");
    out.push_str(border);
    for ((name, _), value) in VARIABLES.iter().zip(values) {
        let _ = writeln!(out, "| {name:<33} | {value:<14} |");
    }
    out.push_str("| Version                           | 8.0.31         |\n");
    out.push_str(border);
    out
}

fn write_server(dir: &Path, hostname: &str, start: NaiveDateTime, args: &Args, rng: &mut SimpleRng) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    std::fs::write(
        dir.join("pt-mysql-summary.out"),
        format!(
            "# Percona Toolkit MySQL Summary Report #######################\n              System time | {start}\n                 Hostname | {hostname}\n"
        ),
    )
    .context("writing summary file")?;

    let mut values: Vec<u64> = VARIABLES.iter().map(|_| rng.below(1_000_000)).collect();

    for i in 0..args.snapshots {
        for ((_, shape), value) in VARIABLES.iter().zip(values.iter_mut()) {
            match shape {
                Shape::Counter { rate } => *value += rng.below(*rate + 1),
                Shape::Gauge { max } => *value = rng.below(*max + 1),
                Shape::Constant => {}
            }
        }
        let taken_at = start + Duration::seconds(args.interval * i as i64);
        let name = format!("{}-mysqladmin", taken_at.format("%Y_%m_%d_%H_%M_%S"));
        std::fs::write(dir.join(&name), render_table(&values))
            .with_context(|| format!("writing {name}"))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(42);

    let start = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .context("building start timestamp")?;

    for server in 1..=args.servers {
        let hostname = format!("db-{server:02}.example.com");
        let dir = args.out_dir.join(format!("server{server}"));
        write_server(&dir, &hostname, start, &args, &mut rng)?;
    }

    println!(
        "Wrote {} server(s) × {} snapshot(s) to {}",
        args.servers,
        args.snapshots,
        args.out_dir.display()
    );
    Ok(())
}
