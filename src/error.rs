//! Error types for fixtures, codecs and reporting.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

use crate::codec::CodecKind;

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure of a single adapter call. Local to one (codec, fixture) trial.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{codec} encode failed: {source}")]
    Encode {
        codec: CodecKind,
        #[source]
        source: BoxError,
    },

    #[error("{codec} decode failed: {source}")]
    Decode {
        codec: CodecKind,
        #[source]
        source: BoxError,
    },
}

impl CodecError {
    pub fn encode(codec: CodecKind, source: impl Into<BoxError>) -> Self {
        CodecError::Encode {
            codec,
            source: source.into(),
        }
    }

    pub fn decode(codec: CodecKind, source: impl Into<BoxError>) -> Self {
        CodecError::Decode {
            codec,
            source: source.into(),
        }
    }

    pub fn codec(&self) -> CodecKind {
        match self {
            CodecError::Encode { codec, .. } | CodecError::Decode { codec, .. } => *codec,
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("record `{record}` has no result for codec {codec}")]
    MissingCodec { record: String, codec: CodecKind },

    #[error("record `{record}` carries unexpected codec {codec}")]
    UnexpectedCodec { record: String, codec: CodecKind },

    #[error("baseline codec {0} is not part of the benchmarked set")]
    UnknownBaseline(CodecKind),
}

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("canonical record fixture failed to parse: {0}")]
    FixtureParse(#[source] serde_json::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("JSON export failed: {0}")]
    Export(#[source] serde_json::Error),
}

pub type Result<T, E = BenchError> = std::result::Result<T, E>;
