//! The "name" custom section: debug names for functions, their locals, and their labels.
//!
//! <https://www.w3.org/TR/wasm-core-2/#name-section>
use super::FromMarkerByte;
use super::helpers::{
    DecodeNameError, SplitSubsectionError, decode_name, read_byte, split_subsection,
};
use super::integer::{DecodeU32Error, decode_u32};
use phf::phf_ordered_map;
use rustc_hash::FxHashMap;
use std::io;
use thiserror::Error;

/// Index to name, as stored in a name map.
pub type NameMap = FxHashMap<u32, String>;

/// Function index to the name map of that function's locals or labels.
pub type IndirectNameMap = FxHashMap<u32, NameMap>;

#[derive(Debug, PartialEq, Default, Clone)]
pub struct NameSection {
    pub module: Option<String>,
    pub functions: NameMap,
    pub locals: IndirectNameMap,
    pub labels: IndirectNameMap,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum NameSubsection {
    Module,
    Function,
    Local,
    Label,
}

#[expect(non_upper_case_globals)]
static NameSubsection_MARKERS: phf::OrderedMap<u8, NameSubsection> = phf_ordered_map! {
    0u8 => NameSubsection::Module,
    1u8 => NameSubsection::Function,
    2u8 => NameSubsection::Local,
    3u8 => NameSubsection::Label,
};

impl FromMarkerByte for NameSubsection {
    type Error = UnknownNameSubsection;

    fn markers() -> &'static phf::OrderedMap<u8, Self> {
        &NameSubsection_MARKERS
    }
}

/// Subsections outside the known set are skipped rather than rejected.
#[derive(Debug)]
struct UnknownNameSubsection(u8);

impl From<u8> for UnknownNameSubsection {
    fn from(b: u8) -> Self {
        Self(b)
    }
}

#[derive(Debug, Error)]
pub enum DecodeNameSectionError {
    #[error("failed reading subsection id")]
    ReadSubsectionId(#[from] io::Error),

    #[error(transparent)]
    Subsection(#[from] SplitSubsectionError),

    #[error("failed decoding index")]
    DecodeIndex(#[from] DecodeU32Error),

    #[error("failed decoding name")]
    DecodeName(#[from] DecodeNameError),

    #[error("{count} unread bytes at the end of name subsection {id}")]
    TrailingBytes { id: u8, count: usize },
}

/// Decodes the contents of a "name" custom section.
pub fn decode_name_section(mut bytes: &[u8]) -> Result<NameSection, DecodeNameSectionError> {
    let mut section = NameSection::default();

    while !bytes.is_empty() {
        let id = read_byte(&mut bytes)?;
        let mut payload = split_subsection(&mut bytes)?;

        match NameSubsection::from_marker(id) {
            Ok(NameSubsection::Module) => section.module = Some(decode_name(&mut payload)?),
            Ok(NameSubsection::Function) => section.functions = decode_name_map(&mut payload)?,
            Ok(NameSubsection::Local) => section.locals = decode_indirect_name_map(&mut payload)?,
            Ok(NameSubsection::Label) => section.labels = decode_indirect_name_map(&mut payload)?,
            Err(UnknownNameSubsection(id)) => {
                tracing::debug!(id, len = payload.len(), "skipping unknown name subsection");
                continue;
            }
        }

        if !payload.is_empty() {
            return Err(DecodeNameSectionError::TrailingBytes {
                id,
                count: payload.len(),
            });
        }
    }

    Ok(section)
}

fn decode_name_map(reader: &mut &[u8]) -> Result<NameMap, DecodeNameSectionError> {
    let count = decode_u32(reader)?;
    let mut map = NameMap::default();
    for _ in 0..count {
        let index = decode_u32(reader)?;
        let name = decode_name(reader)?;
        map.insert(index, name);
    }
    Ok(map)
}

fn decode_indirect_name_map(
    reader: &mut &[u8],
) -> Result<IndirectNameMap, DecodeNameSectionError> {
    let count = decode_u32(reader)?;
    let mut map = IndirectNameMap::default();
    for _ in 0..count {
        let index = decode_u32(reader)?;
        map.insert(index, decode_name_map(reader)?);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::integer::encode_u32;

    fn name(out: &mut Vec<u8>, s: &str) {
        encode_u32(s.len() as u32, out);
        out.extend_from_slice(s.as_bytes());
    }

    fn subsection(out: &mut Vec<u8>, id: u8, payload: &[u8]) {
        out.push(id);
        encode_u32(payload.len() as u32, out);
        out.extend_from_slice(payload);
    }

    #[test]
    fn decodes_function_and_local_names() {
        let mut functions = vec![];
        encode_u32(2, &mut functions);
        encode_u32(0, &mut functions);
        name(&mut functions, "main");
        encode_u32(3, &mut functions);
        name(&mut functions, "helper");

        let mut locals = vec![];
        encode_u32(1, &mut locals);
        encode_u32(0, &mut locals);
        encode_u32(1, &mut locals);
        encode_u32(1, &mut locals);
        name(&mut locals, "count");

        let mut bytes = vec![];
        subsection(&mut bytes, 1, &functions);
        subsection(&mut bytes, 9, &[0xDE, 0xAD]);
        subsection(&mut bytes, 2, &locals);

        let section = decode_name_section(&bytes).unwrap();
        assert_eq!(section.functions[&0], "main");
        assert_eq!(section.functions[&3], "helper");
        assert_eq!(section.locals[&0][&1], "count");
        assert!(section.labels.is_empty());
    }

    #[test]
    fn leftover_subsection_bytes_are_rejected() {
        let mut functions = vec![];
        encode_u32(0, &mut functions);
        functions.push(0x00);

        let mut bytes = vec![];
        subsection(&mut bytes, 1, &functions);

        assert!(matches!(
            decode_name_section(&bytes),
            Err(DecodeNameSectionError::TrailingBytes { id: 1, count: 1 })
        ));
    }
}
