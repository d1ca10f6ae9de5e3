use std::hint::black_box;
use std::time::Instant;

use tracing::{debug, error};

use crate::codec::{CodecKind, Payload};
use crate::error::CodecError;
use crate::fixture::DEFAULT_VECTOR_LEN;
use crate::schema::{CodecOutcome, TrialFailure, TrialResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    Quick,
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Quick => "quick",
            Profile::Full => "full",
        }
    }

    /// Full for optimized builds, Quick for debug builds.
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Profile::Quick
        } else {
            Profile::Full
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub profile: Profile,
    pub seed: u64,
    /// Overrides the profile's record iteration count.
    pub record_iters: Option<u64>,
    /// Overrides the derived vector iteration count.
    pub vector_iters: Option<u64>,
    pub vector_len: usize,
}

impl BenchConfig {
    pub fn new(profile: Profile, seed: u64) -> Self {
        Self {
            profile,
            seed,
            record_iters: None,
            vector_iters: None,
            vector_len: DEFAULT_VECTOR_LEN,
        }
    }

    pub fn record_iters(&self) -> u64 {
        self.record_iters.unwrap_or(match self.profile {
            Profile::Quick => 100_000,
            Profile::Full => 1_000_000,
        })
    }

    /// One-tenth of the record count unless overridden, never zero.
    pub fn vector_iters(&self) -> u64 {
        self.vector_iters
            .unwrap_or_else(|| (self.record_iters() / 10).max(1))
    }

    pub fn vector_len(&self) -> usize {
        self.vector_len
    }
}

#[derive(Clone, Debug)]
pub struct Measured {
    pub total_ns: u128,
}

impl Measured {
    pub fn seconds(&self) -> f64 {
        self.total_ns as f64 / 1e9
    }
}

/// Time `iters` back-to-back calls of `f`. The first error stops the loop and
/// is returned; no partial measurement escapes.
pub fn measure_fn<E>(iters: u64, mut f: impl FnMut() -> Result<(), E>) -> Result<Measured, E> {
    let start = Instant::now();
    for _ in 0..iters {
        black_box(f()?);
    }
    let elapsed = start.elapsed();

    Ok(Measured {
        total_ns: elapsed.as_nanos(),
    })
}

/// Write phase: reset the reusable buffer and encode, `iters` times. The
/// reset is part of the measured loop. `buf` holds the last encoding after.
pub fn write_phase<T: Payload>(
    codec: CodecKind,
    value: &T,
    buf: &mut Vec<u8>,
    iters: u64,
) -> Result<Measured, CodecError> {
    measure_fn(iters, || codec.encode_into(black_box(value), buf))
}

/// Read phase: decode `bytes` into a reused destination, `iters` times.
pub fn read_phase<T: Payload>(
    codec: CodecKind,
    bytes: &[u8],
    iters: u64,
) -> Result<Measured, CodecError> {
    let mut out = T::default();
    let m = measure_fn(iters, || codec.decode_into(black_box(bytes), &mut out))?;
    black_box(&out);
    Ok(m)
}

/// Run one write-then-read trial of `codec` over `value`.
///
/// A failure in either phase is logged and turned into a
/// [`CodecOutcome::Failed`]; the caller moves on to the next codec. Zero
/// iterations never produce a write, so they fail too.
pub fn run_trial<T: Payload>(codec: CodecKind, value: &T, iters: u64) -> CodecOutcome {
    if iters == 0 {
        error!(%codec, "trial requested with zero iterations");
        return CodecOutcome::Failed(TrialFailure {
            reason: "no iterations".to_string(),
            write_seconds: None,
            encoded_size: None,
        });
    }

    let mut buf = Vec::new();

    let write = match write_phase(codec, value, &mut buf, iters) {
        Ok(m) => m,
        Err(e) => {
            error!(%codec, error = %e, "write phase aborted");
            return CodecOutcome::Failed(TrialFailure {
                reason: e.to_string(),
                write_seconds: None,
                encoded_size: None,
            });
        }
    };
    let encoded_size = buf.len() as u64;
    debug!(%codec, encoded_size, seconds = write.seconds(), "write phase done");

    let read = match read_phase::<T>(codec, &buf, iters) {
        Ok(m) => m,
        Err(e) => {
            error!(%codec, error = %e, "read phase aborted");
            return CodecOutcome::Failed(TrialFailure {
                reason: e.to_string(),
                write_seconds: Some(write.seconds()),
                encoded_size: Some(encoded_size),
            });
        }
    };
    debug!(%codec, seconds = read.seconds(), "read phase done");

    CodecOutcome::Completed(TrialResult {
        write_seconds: write.seconds(),
        read_seconds: read.seconds(),
        encoded_size,
        digest: crate::schema::digest_hex(&buf),
    })
}
