use clap::ValueEnum;

pub mod benches;
pub mod codec;
pub mod error;
pub mod fixture;
pub mod harness;
pub mod report;
pub mod schema;

pub use codec::CodecKind;
pub use error::{BenchError, CodecError, ReportError, Result};

/// Fixture families to run.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum FixtureSelection {
    /// The nested record and every numeric vector.
    #[default]
    All,
    /// Nested heterogeneous record only.
    Record,
    /// Homogeneous numeric vectors only (f64, f32, u16, u32, u64, i64).
    Vectors,
}
