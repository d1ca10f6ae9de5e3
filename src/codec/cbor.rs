//! CBOR codec.

use super::{CodecKind, Payload};
use crate::error::CodecError;

pub(super) fn encode<T: Payload>(value: &T, buf: &mut Vec<u8>) -> Result<(), CodecError> {
    ciborium::into_writer(value, buf).map_err(|e| CodecError::encode(CodecKind::Cbor, e))
}

pub(super) fn decode<T: Payload>(bytes: &[u8], out: &mut T) -> Result<(), CodecError> {
    *out = ciborium::from_reader(bytes).map_err(|e| CodecError::decode(CodecKind::Cbor, e))?;
    Ok(())
}
