//! Codec adapters.
//!
//! Every format is reached through [`CodecKind::encode_into`] and
//! [`CodecKind::decode_into`], so the trial runner never branches on the format
//! itself. Encoding always clears the caller's buffer first; the buffer is
//! reused across iterations.

use std::fmt;

use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

mod cbor;
mod compact;
mod json;
mod msgpack;
pub mod proto;

/// Fixture value that every codec in the matrix can carry.
///
/// The serde bounds cover the self-describing formats; `Wire` is the
/// schema-shaped substitute used by the protobuf codec, reached through an
/// explicit mapping pair. The mapping runs inside the timed region.
pub trait Payload: Serialize + DeserializeOwned + Default + Clone + PartialEq + fmt::Debug {
    type Wire: prost::Message + Default;

    fn to_wire(&self) -> Self::Wire;

    /// Overwrite `out` from a decoded wire value. Fails when a substitute field
    /// does not fit the native type.
    fn from_wire(wire: Self::Wire, out: &mut Self) -> Result<(), String>;
}

/// Serialization format under test.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CodecKind {
    /// Text-structured format (serde_json).
    Json,
    /// Compact schema-less binary (rmp-serde, named-field maps).
    #[value(name = "msgpack")]
    #[serde(rename = "msgpack")]
    MessagePack,
    /// Tagged binary (ciborium).
    Cbor,
    /// Compact fixed-width binary (bincode). Not self-describing: it fills the
    /// BEVE-like slot, but sizes and times are not a like-for-like comparison
    /// with a tagged format.
    Bincode,
    /// Schema-based varint format (prost).
    Protobuf,
}

impl CodecKind {
    /// Canonical matrix order. Records always list codecs in this order.
    pub const ALL: [CodecKind; 5] = [
        CodecKind::Json,
        CodecKind::MessagePack,
        CodecKind::Cbor,
        CodecKind::Bincode,
        CodecKind::Protobuf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CodecKind::Json => "json",
            CodecKind::MessagePack => "msgpack",
            CodecKind::Cbor => "cbor",
            CodecKind::Bincode => "bincode",
            CodecKind::Protobuf => "protobuf",
        }
    }

    /// Clear `buf` and write the encoding of `value` into it.
    pub fn encode_into<T: Payload>(self, value: &T, buf: &mut Vec<u8>) -> Result<(), CodecError> {
        buf.clear();
        match self {
            CodecKind::Json => json::encode(value, buf),
            CodecKind::MessagePack => msgpack::encode(value, buf),
            CodecKind::Cbor => cbor::encode(value, buf),
            CodecKind::Bincode => compact::encode(value, buf),
            CodecKind::Protobuf => proto::encode(value, buf),
        }
    }

    /// Decode `bytes` into `out`, replacing its contents.
    pub fn decode_into<T: Payload>(self, bytes: &[u8], out: &mut T) -> Result<(), CodecError> {
        match self {
            CodecKind::Json => json::decode(bytes, out),
            CodecKind::MessagePack => msgpack::decode(bytes, out),
            CodecKind::Cbor => cbor::decode(bytes, out),
            CodecKind::Bincode => compact::decode(bytes, out),
            CodecKind::Protobuf => proto::decode(bytes, out),
        }
    }

    /// One-shot helper for callers that don't keep a buffer around.
    pub fn encode_to_vec<T: Payload>(self, value: &T) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        self.encode_into(value, &mut buf)?;
        Ok(buf)
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{build_record_fixture, build_vector_fixture, VectorElement};

    fn roundtrip<T: Payload>(codec: CodecKind, value: &T) -> T {
        let bytes = codec.encode_to_vec(value).unwrap();
        let mut out = T::default();
        codec.decode_into(&bytes, &mut out).unwrap();
        out
    }

    fn vector_roundtrip_all<T>()
    where
        T: VectorElement,
        Vec<T>: Payload,
    {
        let mut values = build_vector_fixture::<T>(257, 0);
        values.push(T::ZERO);
        values.push(T::MAX);
        for codec in CodecKind::ALL {
            assert_eq!(roundtrip(codec, &values), values, "{codec} {}", T::LABEL);
        }
    }

    #[test]
    fn record_roundtrips_through_every_codec() {
        let rec = build_record_fixture().unwrap();
        for codec in CodecKind::ALL {
            let back = roundtrip(codec, &rec);
            assert_eq!(back, rec, "{codec}");
            assert_eq!(back.number, 3.14, "{codec}");
            assert!(back.boolean, "{codec}");
        }
    }

    #[test]
    fn numeric_vectors_roundtrip_with_boundaries() {
        vector_roundtrip_all::<f64>();
        vector_roundtrip_all::<f32>();
        vector_roundtrip_all::<u16>();
        vector_roundtrip_all::<u32>();
        vector_roundtrip_all::<u64>();
        vector_roundtrip_all::<i64>();
    }

    #[test]
    fn signed_minimum_roundtrips() {
        let values = vec![i64::MIN, -1, 0, 1, i64::MAX];
        for codec in CodecKind::ALL {
            assert_eq!(roundtrip(codec, &values), values, "{codec}");
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let rec = build_record_fixture().unwrap();
        let doubles = build_vector_fixture::<f64>(10_000, 0);
        for codec in CodecKind::ALL {
            assert_eq!(
                codec.encode_to_vec(&rec).unwrap(),
                codec.encode_to_vec(&rec).unwrap(),
                "{codec}"
            );
            assert_eq!(
                codec.encode_to_vec(&doubles).unwrap(),
                codec.encode_to_vec(&doubles).unwrap(),
                "{codec}"
            );
        }
    }

    #[test]
    fn encode_into_resets_buffer() {
        let rec = build_record_fixture().unwrap();
        for codec in CodecKind::ALL {
            let mut buf = Vec::new();
            codec.encode_into(&rec, &mut buf).unwrap();
            let first = buf.len();
            codec.encode_into(&rec, &mut buf).unwrap();
            assert_eq!(buf.len(), first, "{codec} appended instead of resetting");
        }
    }

    #[test]
    fn garbage_input_is_a_decode_error() {
        let garbage = [0xffu8; 8];
        for codec in CodecKind::ALL {
            let mut rec = crate::fixture::Record::default();
            let err = codec.decode_into(&garbage, &mut rec).unwrap_err();
            assert!(matches!(err, CodecError::Decode { .. }), "{codec}");
            assert_eq!(err.codec(), codec);
        }
    }

    #[test]
    fn value_names_match_display() {
        for codec in CodecKind::ALL {
            let parsed = CodecKind::from_str(codec.as_str(), true).unwrap();
            assert_eq!(parsed, codec);
        }
    }

    #[test]
    fn serialized_names_match_cli_names() {
        for codec in CodecKind::ALL {
            let json = serde_json::to_value(codec).unwrap();
            assert_eq!(json, serde_json::Value::from(codec.as_str()));
            let back: CodecKind = serde_json::from_value(json).unwrap();
            assert_eq!(back, codec);
        }
        assert_eq!(serde_json::to_string(&CodecKind::MessagePack).unwrap(), "\"msgpack\"");
    }
}
