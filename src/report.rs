//! Comparison report over a run's [`BenchmarkRecord`]s.
//!
//! [`render`] computes every table once; [`Report::to_markdown`] and
//! [`Report::console_summary`] are two views over the same rows. Ratios are
//! `codec / baseline`, so values above `1.0x` mean the baseline is faster or
//! smaller.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

use crate::codec::CodecKind;
use crate::error::ReportError;
use crate::schema::{BenchmarkRecord, CodecOutcome, RunMeta, TrialResult};

/// Default file name of the persisted report.
pub const REPORT_FILE: &str = "codec_matrix_report.md";

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;

pub fn format_ratio(ratio: f64) -> String {
    format!("{ratio:.1}x")
}

/// Decimal units: GB/s, MB/s, else KB/s.
pub fn format_throughput(bytes_per_sec: f64) -> String {
    if bytes_per_sec >= 1e9 {
        format!("{:.2} GB/s", bytes_per_sec / 1e9)
    } else if bytes_per_sec >= 1e6 {
        format!("{:.2} MB/s", bytes_per_sec / 1e6)
    } else {
        format!("{:.2} KB/s", bytes_per_sec / 1e3)
    }
}

/// Binary units: B, KB, MB.
pub fn format_size(bytes: u64) -> String {
    let b = bytes as f64;
    if b >= MIB {
        format!("{:.2} MB", b / MIB)
    } else if b >= KIB {
        format!("{:.2} KB", b / KIB)
    } else {
        format!("{bytes} B")
    }
}

pub fn format_time(seconds: f64) -> String {
    if seconds < 0.001 {
        format!("{:.2} µs", seconds * 1e6)
    } else if seconds < 1.0 {
        format!("{:.2} ms", seconds * 1e3)
    } else {
        format!("{seconds:.3} s")
    }
}

/// `codec / baseline`, or `None` when the baseline time is not positive.
pub fn speedup_ratio(codec_seconds: f64, baseline_seconds: f64) -> Option<f64> {
    (baseline_seconds > 0.0).then(|| codec_seconds / baseline_seconds)
}

/// Bytes moved per second over a whole phase.
pub fn throughput(encoded_size: u64, iterations: u64, seconds: f64) -> Option<f64> {
    (seconds > 0.0).then(|| encoded_size as f64 * iterations as f64 / seconds)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let cell = |s: &str| s.replace('|', "\\|");

        let _ = writeln!(md, "| {} |", self.headers.join(" | "));
        let _ = writeln!(
            md,
            "|{}|",
            self.headers
                .iter()
                .map(|h| "-".repeat(h.chars().count() + 2))
                .collect::<Vec<_>>()
                .join("|")
        );
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|c| cell(c.as_str())).collect();
            let _ = writeln!(md, "| {} |", cells.join(" | "));
        }
        md
    }

    /// Fixed-width text rendering, first column left aligned.
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, c) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(c.chars().count());
                }
            }
        }

        let line = |cells: &[String]| {
            let mut out = String::new();
            for (i, c) in cells.iter().enumerate() {
                let w = widths.get(i).copied().unwrap_or(0);
                let pad = w.saturating_sub(c.chars().count());
                if i == 0 {
                    out.push_str(c);
                    out.push_str(&" ".repeat(pad));
                } else {
                    out.push_str("  ");
                    out.push_str(&" ".repeat(pad));
                    out.push_str(c);
                }
            }
            out
        };

        let mut text = String::new();
        let header = line(self.headers.as_slice());
        let _ = writeln!(text, "{header}");
        let _ = writeln!(text, "{}", "-".repeat(header.chars().count()));
        for row in &self.rows {
            let _ = writeln!(text, "{}", line(row.as_slice()));
        }
        text
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub baseline: CodecKind,
    pub environment: Table,
    pub speedup: Table,
    pub sizes: Table,
    pub details: Vec<Table>,
}

fn outcome_for<'a>(
    record: &'a BenchmarkRecord,
    codec: CodecKind,
) -> Result<&'a CodecOutcome, ReportError> {
    record.get(codec).ok_or_else(|| ReportError::MissingCodec {
        record: record.name.clone(),
        codec,
    })
}

fn ratio_cell(codec: Option<f64>, baseline: Option<f64>) -> String {
    match (codec, baseline) {
        (None, _) => "error".to_string(),
        (Some(_), None) => "n/a".to_string(),
        (Some(c), Some(b)) => speedup_ratio(c, b)
            .map(format_ratio)
            .unwrap_or_else(|| "n/a".to_string()),
    }
}

fn throughput_cell(size: u64, iterations: u64, seconds: f64) -> String {
    throughput(size, iterations, seconds)
        .map(format_throughput)
        .unwrap_or_else(|| "n/a".to_string())
}

fn environment_table(meta: &RunMeta) -> Table {
    let mut t = Table::new("Environment", &["Key", "Value"]);
    let rows: [(&str, String); 13] = [
        ("bench version", meta.bench_version.clone()),
        ("profile", meta.profile.clone()),
        ("build", meta.build.clone()),
        ("seed", meta.seed.to_string()),
        ("record iterations", meta.record_iters.to_string()),
        ("vector iterations", meta.vector_iters.to_string()),
        ("vector length", meta.vector_len.to_string()),
        ("baseline", meta.baseline.to_string()),
        ("os", meta.os.clone()),
        ("arch", meta.arch.clone()),
        (
            "parallelism",
            meta.parallelism
                .map(|p| p.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        ),
        ("timestamp", meta.timestamp_utc.clone()),
        (
            "git sha",
            meta.git_sha.clone().unwrap_or_else(|| "unknown".to_string()),
        ),
    ];
    for (k, v) in rows {
        t.push(vec![k.to_string(), v]);
    }
    t
}

fn detail_table(
    record: &BenchmarkRecord,
    codecs: &[CodecKind],
) -> Result<Table, ReportError> {
    let mut t = Table::new(
        format!("{} ({} iterations)", record.name, record.iterations),
        &[
            "Codec",
            "Write",
            "Read",
            "Write throughput",
            "Read throughput",
            "Size",
        ],
    );
    for &codec in codecs {
        let row = match outcome_for(record, codec)? {
            CodecOutcome::Completed(r) => vec![
                codec.to_string(),
                format_time(r.write_seconds),
                format_time(r.read_seconds),
                throughput_cell(r.encoded_size, record.iterations, r.write_seconds),
                throughput_cell(r.encoded_size, record.iterations, r.read_seconds),
                format_size(r.encoded_size),
            ],
            CodecOutcome::Failed(f) => vec![
                codec.to_string(),
                f.write_seconds
                    .map(format_time)
                    .unwrap_or_else(|| "error".to_string()),
                format!("error: {}", f.reason),
                match (f.write_seconds, f.encoded_size) {
                    (Some(s), Some(size)) => throughput_cell(size, record.iterations, s),
                    _ => "error".to_string(),
                },
                "error".to_string(),
                f.encoded_size
                    .map(format_size)
                    .unwrap_or_else(|| "error".to_string()),
            ],
        };
        t.push(row);
    }
    Ok(t)
}

/// Build every table for `records`, normalized against `baseline`.
///
/// All records must carry the codec set of the first record: a hole is
/// reported as [`ReportError::MissingCodec`] instead of rendering a blank cell,
/// and an extra codec as [`ReportError::UnexpectedCodec`]. Failed trials are
/// flagged in place.
pub fn render(
    records: &[BenchmarkRecord],
    baseline: CodecKind,
    meta: &RunMeta,
) -> Result<Report, ReportError> {
    let codecs: Vec<CodecKind> = records
        .first()
        .map(|r| r.codecs().collect())
        .unwrap_or_default();
    if !records.is_empty() && !codecs.contains(&baseline) {
        return Err(ReportError::UnknownBaseline(baseline));
    }

    let mut speedup = Table::new(
        format!("Speedup vs {baseline}"),
        &["Fixture", "Codec", "Write ratio", "Read ratio"],
    );
    let mut sizes = Table::new(
        format!("Encoded size vs {baseline}"),
        &["Fixture", "Codec", "Size", "Size ratio"],
    );
    let mut details = Vec::with_capacity(records.len());

    for record in records {
        if let Some(extra) = record.codecs().find(|c| !codecs.contains(c)) {
            return Err(ReportError::UnexpectedCodec {
                record: record.name.clone(),
                codec: extra,
            });
        }
        let base = outcome_for(record, baseline)?.completed();

        for &codec in &codecs {
            let outcome = outcome_for(record, codec)?;
            let result: Option<&TrialResult> = outcome.completed();

            if codec != baseline {
                speedup.push(vec![
                    record.name.clone(),
                    codec.to_string(),
                    ratio_cell(result.map(|r| r.write_seconds), base.map(|b| b.write_seconds)),
                    ratio_cell(result.map(|r| r.read_seconds), base.map(|b| b.read_seconds)),
                ]);
            }

            let size = match outcome {
                CodecOutcome::Completed(r) => Some(r.encoded_size),
                CodecOutcome::Failed(f) => f.encoded_size,
            };
            sizes.push(vec![
                record.name.clone(),
                codec.to_string(),
                size.map(format_size).unwrap_or_else(|| "error".to_string()),
                ratio_cell(
                    size.map(|s| s as f64),
                    base.map(|b| b.encoded_size as f64),
                ),
            ]);
        }

        details.push(detail_table(record, &codecs)?);
    }

    Ok(Report {
        title: "Codec Matrix Benchmark".to_string(),
        baseline,
        environment: environment_table(meta),
        speedup,
        sizes,
        details,
    })
}

impl Report {
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let _ = writeln!(md, "# {}\n", self.title);
        let _ = writeln!(md, "## {}\n", self.environment.title);
        md.push_str(&self.environment.to_markdown());

        let _ = writeln!(md, "\n## {}\n", self.speedup.title);
        let _ = writeln!(
            md,
            "Ratios are codec time / {} time; above 1.0x the baseline is faster.\n",
            self.baseline
        );
        md.push_str(&self.speedup.to_markdown());

        let _ = writeln!(md, "\n## {}\n", self.sizes.title);
        md.push_str(&self.sizes.to_markdown());

        md.push_str("\n## Detailed results\n");
        for table in &self.details {
            let _ = writeln!(md, "\n### {}\n", table.title);
            md.push_str(&table.to_markdown());
        }
        md
    }

    /// Console summary: speedup and size tables.
    pub fn console_summary(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "\n{}", "=".repeat(72));
        let _ = writeln!(text, "{} (baseline: {})", self.title.to_uppercase(), self.baseline);
        let _ = writeln!(text, "{}", "=".repeat(72));
        for table in [&self.speedup, &self.sizes] {
            let _ = writeln!(text, "\n{}:", table.title);
            text.push_str(&table.to_text());
        }
        text
    }

    pub fn write_markdown(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_markdown())
    }
}
