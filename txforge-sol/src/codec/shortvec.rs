//! Compact-u16 length prefix: 7 bits per byte, high bit set when another byte follows.

use super::{read_u8, CodecError};

pub fn encode_len(len: u16, buf: &mut Vec<u8>) {
    if len < 0x80 {
        buf.push(len as u8);
    } else if len < 0x4000 {
        buf.push((len & 0x7f) as u8 | 0x80);
        buf.push((len >> 7) as u8);
    } else {
        buf.push((len & 0x7f) as u8 | 0x80);
        buf.push(((len >> 7) & 0x7f) as u8 | 0x80);
        buf.push((len >> 14) as u8);
    }
}

/// Reads a compact-u16, rejecting aliases (non-minimal encodings) and values above `u16::MAX`.
pub fn decode_len(input: &mut &[u8]) -> Result<u16, CodecError> {
    let mut value: u32 = 0;
    for i in 0..3 {
        let byte = read_u8(input)?;
        value |= ((byte & 0x7f) as u32) << (i * 7);
        if byte & 0x80 == 0 {
            if byte == 0 && i > 0 {
                return Err(CodecError::InvalidLength);
            }
            return u16::try_from(value).map_err(|_| CodecError::InvalidLength);
        }
        if i == 2 {
            return Err(CodecError::InvalidLength);
        }
    }
    Err(CodecError::InvalidLength)
}

/// Writes `items` as a shortvec of raw bytes.
pub fn encode_bytes(items: &[u8], buf: &mut Vec<u8>) -> Result<(), CodecError> {
    let len = u16::try_from(items.len()).map_err(|_| CodecError::InvalidLength)?;
    encode_len(len, buf);
    buf.extend_from_slice(items);
    Ok(())
}

pub fn decode_bytes(input: &mut &[u8]) -> Result<Vec<u8>, CodecError> {
    let len = decode_len(input)? as usize;
    Ok(super::read_bytes(input, len)?.to_vec())
}
