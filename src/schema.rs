use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::codec::CodecKind;
use crate::error::ReportError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub bench_version: String,
    pub profile: String,
    pub build: String,
    pub seed: u64,
    pub record_iters: u64,
    pub vector_iters: u64,
    pub vector_len: usize,
    pub baseline: CodecKind,
    pub os: String,
    pub arch: String,
    pub parallelism: Option<usize>,
    pub timestamp_utc: String,
    pub git_sha: Option<String>,
}

/// Timing and size of one completed (codec, fixture) trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub write_seconds: f64,
    pub read_seconds: f64,
    pub encoded_size: u64,
    /// SHA-256 of the last encoded buffer, hex.
    pub digest: String,
}

/// A trial that could not produce a comparable measurement. Read timing is
/// never kept; write timing survives a read-phase failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialFailure {
    pub reason: String,
    pub write_seconds: Option<f64>,
    pub encoded_size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CodecOutcome {
    Completed(TrialResult),
    Failed(TrialFailure),
}

impl CodecOutcome {
    pub fn completed(&self) -> Option<&TrialResult> {
        match self {
            CodecOutcome::Completed(r) => Some(r),
            CodecOutcome::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodecResult {
    pub codec: CodecKind,
    pub outcome: CodecOutcome,
}

/// One fixture's results across the codec set, in matrix order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub name: String,
    pub iterations: u64,
    pub results: Vec<CodecResult>,
}

impl BenchmarkRecord {
    pub fn get(&self, codec: CodecKind) -> Option<&CodecOutcome> {
        self.results
            .iter()
            .find(|r| r.codec == codec)
            .map(|r| &r.outcome)
    }

    pub fn codecs(&self) -> impl Iterator<Item = CodecKind> + '_ {
        self.results.iter().map(|r| r.codec)
    }
}

/// Group per-codec outcomes into a record. Fails unless `outcomes` covers
/// exactly `codecs`, in that order.
pub fn aggregate(
    name: impl Into<String>,
    iterations: u64,
    codecs: &[CodecKind],
    outcomes: Vec<(CodecKind, CodecOutcome)>,
) -> Result<BenchmarkRecord, ReportError> {
    let name = name.into();
    for (i, expected) in codecs.iter().enumerate() {
        match outcomes.get(i) {
            Some((codec, _)) if codec == expected => {}
            _ => {
                return Err(ReportError::MissingCodec {
                    record: name,
                    codec: *expected,
                })
            }
        }
    }
    if outcomes.len() > codecs.len() {
        let (extra, _) = &outcomes[codecs.len()];
        return Err(ReportError::UnexpectedCodec {
            record: name,
            codec: *extra,
        });
    }

    Ok(BenchmarkRecord {
        name,
        iterations,
        results: outcomes
            .into_iter()
            .map(|(codec, outcome)| CodecResult { codec, outcome })
            .collect(),
    })
}

/// Machine-readable export of a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixReport {
    pub run: RunMeta,
    pub records: Vec<BenchmarkRecord>,
}

pub fn digest_hex(bytes: &[u8]) -> String {
    let d: [u8; 32] = Sha256::digest(bytes).into();
    let mut s = String::with_capacity(64);
    for b in d {
        s.push_str(&format!("{:02x}", b));
    }
    s
}
