use super::integer::{DecodeU32Error, decode_u32};
use std::io::{self, Read};
use thiserror::Error;

pub(crate) fn read_byte<R: Read + ?Sized>(reader: &mut R) -> Result<u8, io::Error> {
    let mut buf = [0u8];
    reader.read_exact(&mut buf)?;
    Ok(buf[0])
}

#[derive(Debug, Error)]
pub enum DecodeByteVectorError {
    #[error("failed decoding vector length")]
    DecodeLength(#[from] DecodeU32Error),

    #[error("byte vector declares {declared} bytes; only {available} remain")]
    Truncated { declared: u32, available: usize },

    #[error("failed reading vector elements")]
    ReadElements(#[from] io::Error),
}

/// Reads a length-prefixed byte vector without trusting the length for the allocation.
pub(crate) fn decode_byte_vector<R: Read + ?Sized>(
    reader: &mut R,
) -> Result<Vec<u8>, DecodeByteVectorError> {
    let len = decode_u32(reader)?;
    let mut bytes = Vec::new();
    Read::take(&mut *reader, u64::from(len)).read_to_end(&mut bytes)?;
    if bytes.len() != len as usize {
        return Err(DecodeByteVectorError::Truncated {
            declared: len,
            available: bytes.len(),
        });
    }
    Ok(bytes)
}

#[derive(Debug, Error)]
pub enum DecodeNameError {
    #[error(transparent)]
    DecodeByteVector(#[from] DecodeByteVectorError),

    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub(crate) fn decode_name<R: Read + ?Sized>(reader: &mut R) -> Result<String, DecodeNameError> {
    Ok(String::from_utf8(decode_byte_vector(reader)?)?)
}

#[derive(Debug, Error)]
pub enum SplitSubsectionError {
    #[error("failed decoding subsection size")]
    DecodeSize(#[from] DecodeU32Error),

    #[error("subsection declares {declared} bytes; only {available} remain")]
    Truncated { declared: u32, available: usize },
}

/// Reads a size prefix and splits that many bytes off the front of `reader`.
pub(crate) fn split_subsection<'a>(
    reader: &mut &'a [u8],
) -> Result<&'a [u8], SplitSubsectionError> {
    let declared = decode_u32(reader)?;
    let available = reader.len();
    if declared as usize > available {
        return Err(SplitSubsectionError::Truncated {
            declared,
            available,
        });
    }
    let (payload, rest) = reader.split_at(declared as usize);
    *reader = rest;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_utf8_checked() {
        let mut reader: &[u8] = &[3, b'f', b'o', b'o', 2, 0xC3, 0x28];
        assert_eq!(decode_name(&mut reader).unwrap(), "foo");
        assert!(matches!(decode_name(&mut reader), Err(DecodeNameError::Utf8(_))));
    }

    #[test]
    fn oversized_vector_length_is_truncation() {
        let mut reader: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F, 1, 2];
        assert!(matches!(
            decode_byte_vector(&mut reader),
            Err(DecodeByteVectorError::Truncated {
                declared: u32::MAX,
                available: 2
            })
        ));
    }

    #[test]
    fn subsection_split_advances_past_payload() {
        let mut reader: &[u8] = &[2, 0xAA, 0xBB, 0xCC];
        assert_eq!(split_subsection(&mut reader).unwrap(), &[0xAA, 0xBB]);
        assert_eq!(reader, &[0xCC]);

        let mut short: &[u8] = &[5, 0xAA];
        assert!(matches!(
            split_subsection(&mut short),
            Err(SplitSubsectionError::Truncated {
                declared: 5,
                available: 1
            })
        ));
    }
}
