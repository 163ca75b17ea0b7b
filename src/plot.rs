//! Visualization sinks for scored tables.
//!
//! Plotting is a terminal side effect: nothing in the pipeline consumes what
//! a plotter produces.

use crate::detection::{BandRow, BandTable};
use crate::error::{BandError, Result};
use std::io::Write;

/// Something that can render a scored table.
pub trait BandPlotter {
    fn plot(&mut self, table: &BandTable) -> Result<()>;
}

const COUNT_MARK: char = '*';
const MIDBAND_MARK: char = 'o';
const UPPER_MARK: char = '^';
const LOWER_MARK: char = 'v';

/// Plain-text chart, one line per bucket with time running downwards.
///
/// All four series share one horizontal scale spanning the smallest and the
/// largest defined value in the table.
#[derive(Debug)]
pub struct TextPlotter<W: Write> {
    out: W,
    width: usize,
}

impl<W: Write> TextPlotter<W> {
    pub fn new(out: W) -> Self {
        Self { out, width: 60 }
    }

    /// Set the number of columns used for the value axis (at least 10).
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(10);
        self
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn render(&mut self, table: &BandTable) -> std::io::Result<()> {
        writeln!(
            self.out,
            "Activity bands for user {} (span {}, k {})",
            table.user_id, table.config.span, table.config.k
        )?;
        writeln!(
            self.out,
            "  {} events   {} midband   {} upper band   {} lower band",
            COUNT_MARK, MIDBAND_MARK, UPPER_MARK, LOWER_MARK
        )?;

        if table.is_empty() {
            return writeln!(self.out, "  (no buckets)");
        }

        let (lo, hi) = value_range(table.rows());
        writeln!(self.out, "  axis: {:.2} .. {:.2}", lo, hi)?;

        let width = self.width;
        for row in table.iter() {
            let mut line = vec![' '; width];
            let mut mark = |value: Option<f64>, c: char| {
                if let Some(v) = value {
                    line[column(v, lo, hi, width)] = c;
                }
            };
            mark(row.lower, LOWER_MARK);
            mark(row.upper, UPPER_MARK);
            mark(Some(row.midband), MIDBAND_MARK);
            mark(Some(row.count), COUNT_MARK);

            let line: String = line.into_iter().collect();
            writeln!(
                self.out,
                "{} |{}| {}",
                row.timestamp.format("%Y-%m-%d %H:%M"),
                line,
                row.count
            )?;
        }

        self.out.flush()
    }
}

impl<W: Write> BandPlotter for TextPlotter<W> {
    fn plot(&mut self, table: &BandTable) -> Result<()> {
        self.render(table)
            .map_err(|e| BandError::Plot(e.to_string()))
    }
}

fn value_range(rows: &[BandRow]) -> (f64, f64) {
    rows.iter()
        .flat_map(|r| [Some(r.count), Some(r.midband), r.upper, r.lower])
        .flatten()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}

fn column(value: f64, lo: f64, hi: f64, width: usize) -> usize {
    if !value.is_finite() || hi <= lo {
        return 0;
    }
    let t = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    (t * (width - 1) as f64).round() as usize
}
