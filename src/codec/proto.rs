//! Protobuf codec and the wire-shape types it needs.
//!
//! Protobuf has no native notion of the fixture types, so each one maps onto
//! a message type with codec-specific substitutes:
//!
//! | native          | wire                              |
//! |-----------------|-----------------------------------|
//! | `[f64; 3]`      | `V3 { x, y, z }` message          |
//! | `Vec<u16>`      | `repeated uint32` (widened)       |
//! | `Vec<u64>`      | `repeated fixed64`                |
//! | `Vec<i64>`      | `repeated sint64` (zig-zag)       |
//!
//! The `to_wire`/`from_wire` pair is part of the measured cost of the codec.

use prost::Message;

use super::{CodecKind, Payload};
use crate::error::CodecError;
use crate::fixture::{AnotherObject, FixedNameObject, FixedObject, NestedObject, Record};

pub(super) fn encode<T: Payload>(value: &T, buf: &mut Vec<u8>) -> Result<(), CodecError> {
    value
        .to_wire()
        .encode(buf)
        .map_err(|e| CodecError::encode(CodecKind::Protobuf, e))
}

pub(super) fn decode<T: Payload>(bytes: &[u8], out: &mut T) -> Result<(), CodecError> {
    let wire = T::Wire::decode(bytes).map_err(|e| CodecError::decode(CodecKind::Protobuf, e))?;
    T::from_wire(wire, out).map_err(|e| CodecError::decode(CodecKind::Protobuf, e))
}

#[derive(Clone, PartialEq, Message)]
pub struct WireFixedObject {
    #[prost(int32, repeated, tag = "1")]
    pub int_array: Vec<i32>,
    #[prost(float, repeated, tag = "2")]
    pub float_array: Vec<f32>,
    #[prost(double, repeated, tag = "3")]
    pub double_array: Vec<f64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct WireFixedNameObject {
    #[prost(string, tag = "1")]
    pub name0: String,
    #[prost(string, tag = "2")]
    pub name1: String,
    #[prost(string, tag = "3")]
    pub name2: String,
    #[prost(string, tag = "4")]
    pub name3: String,
    #[prost(string, tag = "5")]
    pub name4: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct V3 {
    #[prost(double, tag = "1")]
    pub x: f64,
    #[prost(double, tag = "2")]
    pub y: f64,
    #[prost(double, tag = "3")]
    pub z: f64,
}

#[derive(Clone, PartialEq, Message)]
pub struct WireNestedObject {
    #[prost(message, repeated, tag = "1")]
    pub v3s: Vec<V3>,
    #[prost(string, tag = "2")]
    pub id: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct WireAnotherObject {
    #[prost(string, tag = "1")]
    pub string: String,
    #[prost(string, tag = "2")]
    pub another_string: String,
    #[prost(bool, tag = "3")]
    pub boolean: bool,
    #[prost(message, optional, tag = "4")]
    pub nested_object: Option<WireNestedObject>,
}

#[derive(Clone, PartialEq, Message)]
pub struct WireRecord {
    #[prost(message, optional, tag = "1")]
    pub fixed_object: Option<WireFixedObject>,
    #[prost(message, optional, tag = "2")]
    pub fixed_name_object: Option<WireFixedNameObject>,
    #[prost(message, optional, tag = "3")]
    pub another_object: Option<WireAnotherObject>,
    #[prost(string, repeated, tag = "4")]
    pub string_array: Vec<String>,
    #[prost(string, tag = "5")]
    pub string: String,
    #[prost(double, tag = "6")]
    pub number: f64,
    #[prost(bool, tag = "7")]
    pub boolean: bool,
    #[prost(bool, tag = "8")]
    pub another_bool: bool,
}

impl Payload for Record {
    type Wire = WireRecord;

    fn to_wire(&self) -> WireRecord {
        let fixed = &self.fixed_object;
        let names = &self.fixed_name_object;
        let another = &self.another_object;
        let nested = &another.nested_object;

        WireRecord {
            fixed_object: Some(WireFixedObject {
                int_array: fixed.int_array.clone(),
                float_array: fixed.float_array.clone(),
                double_array: fixed.double_array.clone(),
            }),
            fixed_name_object: Some(WireFixedNameObject {
                name0: names.name0.clone(),
                name1: names.name1.clone(),
                name2: names.name2.clone(),
                name3: names.name3.clone(),
                name4: names.name4.clone(),
            }),
            another_object: Some(WireAnotherObject {
                string: another.string.clone(),
                another_string: another.another_string.clone(),
                boolean: another.boolean,
                nested_object: Some(WireNestedObject {
                    v3s: nested
                        .v3s
                        .iter()
                        .map(|&[x, y, z]| V3 { x, y, z })
                        .collect(),
                    id: nested.id.clone(),
                }),
            }),
            string_array: self.string_array.clone(),
            string: self.string.clone(),
            number: self.number,
            boolean: self.boolean,
            another_bool: self.another_bool,
        }
    }

    fn from_wire(wire: WireRecord, out: &mut Record) -> Result<(), String> {
        // Absent sub-messages decode as their defaults, as in proto3.
        let fixed = wire.fixed_object.unwrap_or_default();
        let names = wire.fixed_name_object.unwrap_or_default();
        let another = wire.another_object.unwrap_or_default();
        let nested = another.nested_object.unwrap_or_default();

        *out = Record {
            fixed_object: FixedObject {
                int_array: fixed.int_array,
                float_array: fixed.float_array,
                double_array: fixed.double_array,
            },
            fixed_name_object: FixedNameObject {
                name0: names.name0,
                name1: names.name1,
                name2: names.name2,
                name3: names.name3,
                name4: names.name4,
            },
            another_object: AnotherObject {
                string: another.string,
                another_string: another.another_string,
                boolean: another.boolean,
                nested_object: NestedObject {
                    v3s: nested.v3s.into_iter().map(|v| [v.x, v.y, v.z]).collect(),
                    id: nested.id,
                },
            },
            string_array: wire.string_array,
            string: wire.string,
            number: wire.number,
            boolean: wire.boolean,
            another_bool: wire.another_bool,
        };
        Ok(())
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct DoubleVector {
    #[prost(double, repeated, tag = "1")]
    pub values: Vec<f64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct FloatVector {
    #[prost(float, repeated, tag = "1")]
    pub values: Vec<f32>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Uint32Vector {
    #[prost(uint32, repeated, tag = "1")]
    pub values: Vec<u32>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Fixed64Vector {
    #[prost(fixed64, repeated, tag = "1")]
    pub values: Vec<u64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Sint64Vector {
    #[prost(sint64, repeated, tag = "1")]
    pub values: Vec<i64>,
}

/// Vectors whose element type is carried by the wire type as-is.
macro_rules! direct_vector_payload {
    ($elem:ty, $wire:ident) => {
        impl Payload for Vec<$elem> {
            type Wire = $wire;

            fn to_wire(&self) -> $wire {
                $wire {
                    values: self.clone(),
                }
            }

            fn from_wire(wire: $wire, out: &mut Vec<$elem>) -> Result<(), String> {
                *out = wire.values;
                Ok(())
            }
        }
    };
}

direct_vector_payload!(f64, DoubleVector);
direct_vector_payload!(f32, FloatVector);
direct_vector_payload!(u32, Uint32Vector);
direct_vector_payload!(u64, Fixed64Vector);
direct_vector_payload!(i64, Sint64Vector);

impl Payload for Vec<u16> {
    type Wire = Uint32Vector;

    fn to_wire(&self) -> Uint32Vector {
        Uint32Vector {
            values: self.iter().map(|&v| u32::from(v)).collect(),
        }
    }

    fn from_wire(wire: Uint32Vector, out: &mut Vec<u16>) -> Result<(), String> {
        out.clear();
        out.reserve(wire.values.len());
        for v in wire.values {
            let narrowed = u16::try_from(v).map_err(|_| format!("value {v} does not fit in u16"))?;
            out.push(narrowed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::build_record_fixture;

    #[test]
    fn wire_mapping_preserves_record() {
        let rec = build_record_fixture().unwrap();
        let wire = rec.to_wire();
        let nested = wire
            .another_object
            .as_ref()
            .and_then(|a| a.nested_object.as_ref())
            .unwrap();
        assert_eq!(nested.v3s.len(), 3);
        assert_eq!(nested.v3s[1].y, 97.39827);

        let mut back = Record::default();
        Record::from_wire(wire, &mut back).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn empty_message_decodes_to_default_record() {
        let mut out = build_record_fixture().unwrap();
        decode(&[], &mut out).unwrap();
        assert_eq!(out, Record::default());
    }

    #[test]
    fn widened_u16_rejects_out_of_range_values() {
        let wire = Uint32Vector {
            values: vec![1, 70_000],
        };
        let bytes = wire.encode_to_vec();
        let mut out: Vec<u16> = Vec::new();
        let err = decode(&bytes, &mut out).unwrap_err();
        assert!(matches!(err, CodecError::Decode { codec: CodecKind::Protobuf, .. }));
    }

    #[test]
    fn fixed64_is_eight_bytes_per_element() {
        let values: Vec<u64> = vec![u64::MAX; 8];
        let mut buf = Vec::new();
        encode(&values, &mut buf).unwrap();
        // tag + one-byte length prefix + 8 * 8 payload bytes
        assert_eq!(buf.len(), 1 + 1 + 8 * 8);
    }
}
