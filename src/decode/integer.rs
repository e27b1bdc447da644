//! Unsigned LEB128, the integer encoding used throughout the "name" and "linking" sections.
//!
//! <https://en.wikipedia.org/wiki/LEB128>
use super::read_byte;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeU32Error {
    #[error("varuint32 does not fit in 32 bits")]
    TooLarge,

    #[error("varuint32 representation longer than 5 bytes")]
    RepresentationTooLong,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Reads a `varuint32`.
///
/// Non-minimal encodings are accepted as long as they fit in five bytes and the unused high bits
/// of the fifth byte are zero.
pub fn decode_u32<R: io::Read + ?Sized>(reader: &mut R) -> Result<u32, DecodeU32Error> {
    let mut result: u32 = 0;

    // 5 == ceil(32/7)
    for group in 0..5u32 {
        let byte = read_byte(reader)?;
        result |= u32::from(byte & 0x7F) << (group * 7);

        if byte & 0x80 == 0 {
            // the fifth group only has room for the top 4 payload bits
            if group == 4 && byte & 0xF0 != 0 {
                return Err(DecodeU32Error::TooLarge);
            }
            return Ok(result);
        }
    }

    Err(DecodeU32Error::RepresentationTooLong)
}

/// Appends the minimal LEB128 encoding of `value` to `out`.
#[cfg(test)]
pub(crate) fn encode_u32(mut value: u32, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Result<u32, DecodeU32Error> {
        let mut reader = bytes;
        decode_u32(&mut reader)
    }

    #[test]
    fn decodes_minimal_encodings() {
        for value in [0, 1, 127, 128, 624_485, u32::MAX] {
            let mut bytes = vec![];
            encode_u32(value, &mut bytes);
            assert_eq!(decode(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn accepts_padded_zero() {
        assert_eq!(decode(&[0x80, 0x80, 0x00]).unwrap(), 0);
    }

    #[test]
    fn rejects_bits_beyond_32() {
        let err = decode(&[0xFF, 0xFF, 0xFF, 0xFF, 0x1F]).unwrap_err();
        assert!(matches!(err, DecodeU32Error::TooLarge));
    }

    #[test]
    fn rejects_sixth_byte() {
        let err = decode(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x00]).unwrap_err();
        assert!(matches!(err, DecodeU32Error::RepresentationTooLong));
    }

    #[test]
    fn truncated_input_is_io_error() {
        let err = decode(&[0x80]).unwrap_err();
        assert!(matches!(err, DecodeU32Error::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }
}
