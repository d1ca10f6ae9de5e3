use crate::codec::CodecKind;
use crate::error::Result;
use crate::fixture::build_record_fixture;
use crate::harness::BenchConfig;
use crate::schema::BenchmarkRecord;

use super::run_matrix;

pub const RECORD_FIXTURE_NAME: &str = "record";

/// Nested record fixture. A parse failure of the canonical text aborts the
/// run; codec failures only flag their own entry.
pub fn run(cfg: &BenchConfig, codecs: &[CodecKind]) -> Result<Vec<BenchmarkRecord>> {
    let value = build_record_fixture()?;
    let record = run_matrix(RECORD_FIXTURE_NAME, &value, cfg.record_iters(), codecs)?;
    Ok(vec![record])
}
