//! MessagePack codec. Structs are written as maps keyed by field name, so the
//! encoding stays self-describing like the other schema-less formats.

use super::{CodecKind, Payload};
use crate::error::CodecError;

pub(super) fn encode<T: Payload>(value: &T, buf: &mut Vec<u8>) -> Result<(), CodecError> {
    rmp_serde::encode::write_named(buf, value)
        .map_err(|e| CodecError::encode(CodecKind::MessagePack, e))
}

pub(super) fn decode<T: Payload>(bytes: &[u8], out: &mut T) -> Result<(), CodecError> {
    *out = rmp_serde::from_slice(bytes)
        .map_err(|e| CodecError::decode(CodecKind::MessagePack, e))?;
    Ok(())
}
