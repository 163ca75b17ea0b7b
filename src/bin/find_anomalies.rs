//! Flag days (or other buckets) where one user's page activity leaves its
//! exponentially weighted volatility band.
//!
//! Reads newline-delimited JSON log records:
//!
//! ```text
//! {"date":"2018-01-26 09:55:03","endpoint":"/","user_id":1,"cohort_id":8,"source_ip":"97.105.19.61"}
//! ```
//!
//! Set `RUST_LOG=debug` to see per-stage sizes.

use std::io;

use anyhow::Context;
use clap::Parser;

use activity_bands::detection::BandRow;
use activity_bands::pipeline::{AnomalyDetector, DetectorConfig};
use activity_bands::plot::TextPlotter;
use activity_bands::source::{JsonLinesSource, LogSource};
use activity_bands::transform::parse_frequency;

#[derive(Parser, Debug)]
#[clap(name = "find_anomalies")]
struct Opts {
    /// Newline-delimited JSON log file.
    #[clap(short, long)]
    input: String,

    /// User to analyse (required unless --list-users).
    #[clap(short, long)]
    user: Option<i64>,

    /// Smoothing window length in buckets.
    #[clap(short, long, default_value = "30")]
    span: f64,

    /// Band half-width in standard deviations.
    #[clap(short, long, default_value = "3")]
    k: f64,

    /// Bucket width, e.g. d, 12h, 30min, W.
    #[clap(short, long, default_value = "d")]
    bucket: String,

    /// Draw the bands as a text chart.
    #[clap(long)]
    plot: bool,

    /// Print the full report as JSON.
    #[clap(long)]
    json: bool,

    /// List the user ids present in the input and exit.
    #[clap(long)]
    list_users: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts: Opts = Opts::parse();

    let table = JsonLinesSource::new(&opts.input)
        .fetch()
        .with_context(|| format!("reading {}", opts.input))?;

    if opts.list_users {
        for user in table.user_ids() {
            println!("{}", user);
        }
        return Ok(());
    }

    let user = opts
        .user
        .context("--user is required unless --list-users is given")?;
    let bucket_width = parse_frequency(&opts.bucket)?;
    let config = DetectorConfig::new(opts.span, opts.k)
        .with_bucket_width(bucket_width)
        .with_plot(opts.plot);

    let mut detector =
        AnomalyDetector::new(config).with_plotter(Box::new(TextPlotter::new(io::stdout())));
    let report = detector.detect(&table, user)?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "user {}: {} buckets, {} above band, {} below band",
        user,
        report.table.len(),
        report.anomalies.above.len(),
        report.anomalies.below.len()
    );
    print_rows("above", &report.anomalies.above);
    print_rows("below", &report.anomalies.below);

    Ok(())
}

fn print_rows(label: &str, rows: &[BandRow]) {
    for row in rows {
        println!(
            "  {} {}  count {:>6}  midband {:>8.2}  %b {:>6.2}",
            label,
            row.timestamp.format("%Y-%m-%d %H:%M"),
            row.count,
            row.midband,
            row.pct_b.unwrap_or(f64::NAN)
        );
    }
}
