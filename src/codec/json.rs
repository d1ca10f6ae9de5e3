//! Text-structured codec.

use super::{CodecKind, Payload};
use crate::error::CodecError;

pub(super) fn encode<T: Payload>(value: &T, buf: &mut Vec<u8>) -> Result<(), CodecError> {
    serde_json::to_writer(buf, value).map_err(|e| CodecError::encode(CodecKind::Json, e))
}

pub(super) fn decode<T: Payload>(bytes: &[u8], out: &mut T) -> Result<(), CodecError> {
    *out = serde_json::from_slice(bytes).map_err(|e| CodecError::decode(CodecKind::Json, e))?;
    Ok(())
}
