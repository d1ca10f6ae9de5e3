//! Compact binary codec (bincode, fixed-width integers, little endian).

use super::{CodecKind, Payload};
use crate::error::CodecError;

pub(super) fn encode<T: Payload>(value: &T, buf: &mut Vec<u8>) -> Result<(), CodecError> {
    ::bincode::serialize_into(buf, value).map_err(|e| CodecError::encode(CodecKind::Bincode, e))
}

pub(super) fn decode<T: Payload>(bytes: &[u8], out: &mut T) -> Result<(), CodecError> {
    *out = ::bincode::deserialize(bytes).map_err(|e| CodecError::decode(CodecKind::Bincode, e))?;
    Ok(())
}
