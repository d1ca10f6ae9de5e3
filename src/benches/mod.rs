//! Benchmark families. Each family builds its fixtures once, runs every
//! selected codec over them in sequence, and returns one record per fixture.

use tracing::info;

use crate::codec::{CodecKind, Payload};
use crate::error::{ReportError, Result};
use crate::harness::{run_trial, BenchConfig};
use crate::report::{format_size, format_time};
use crate::schema::{aggregate, BenchmarkRecord, CodecOutcome};
use crate::FixtureSelection;

pub mod record;

/// Trial `value` through every codec, strictly one after another.
pub fn run_matrix<T: Payload>(
    name: &str,
    value: &T,
    iters: u64,
    codecs: &[CodecKind],
) -> Result<BenchmarkRecord, ReportError> {
    info!(fixture = name, iters, codecs = codecs.len(), "running fixture");
    println!("{name} ({iters} iterations)");

    let mut outcomes = Vec::with_capacity(codecs.len());
    for &codec in codecs {
        let outcome = run_trial(codec, value, iters);
        match &outcome {
            CodecOutcome::Completed(r) => println!(
                "  {:<9} size {:>10}  write {:>11}  read {:>11}",
                codec.as_str(),
                format_size(r.encoded_size),
                format_time(r.write_seconds),
                format_time(r.read_seconds),
            ),
            CodecOutcome::Failed(f) => println!("  {:<9} FAILED: {}", codec.as_str(), f.reason),
        }
        outcomes.push((codec, outcome));
    }

    aggregate(name, iters, codecs, outcomes)
}

/// Run the selected fixture families.
pub fn run_suite(
    cfg: &BenchConfig,
    selection: FixtureSelection,
    codecs: &[CodecKind],
) -> Result<Vec<BenchmarkRecord>> {
    let mut records = Vec::new();
    if matches!(selection, FixtureSelection::All | FixtureSelection::Record) {
        records.extend(record::run(cfg, codecs)?);
    }
    if matches!(selection, FixtureSelection::All | FixtureSelection::Vectors) {
        records.extend(vectors::run(cfg, codecs)?);
    }
    Ok(records)
}
