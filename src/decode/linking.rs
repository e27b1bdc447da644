//! Record kinds of the "linking" custom section emitted by object-file producing toolchains.
//!
//! The section is a `varuint32` version followed by subsections, each a one-byte tag and a
//! size-prefixed payload. Rendering happens in [`crate::print`]; this module only knows the
//! vocabulary and what can go wrong while reading it.
use super::FromMarkerByte;
use super::helpers::{DecodeNameError, SplitSubsectionError};
use super::integer::DecodeU32Error;
use bitflags::bitflags;
use phf::phf_ordered_map;
use std::io;
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LinkingSubsection {
    SegmentInfo,
    InitFuncs,
    ComdatInfo,
    SymbolTable,
}

#[expect(non_upper_case_globals)]
static LinkingSubsection_MARKERS: phf::OrderedMap<u8, LinkingSubsection> = phf_ordered_map! {
    5u8 => LinkingSubsection::SegmentInfo,
    6u8 => LinkingSubsection::InitFuncs,
    7u8 => LinkingSubsection::ComdatInfo,
    8u8 => LinkingSubsection::SymbolTable,
};

impl FromMarkerByte for LinkingSubsection {
    type Error = UnknownSubsectionError;

    fn markers() -> &'static phf::OrderedMap<u8, Self> {
        &LinkingSubsection_MARKERS
    }
}

#[derive(Debug, Error)]
#[error(
    "unknown linking subsection type {0}; expected one of {markers}",
    markers = LinkingSubsection::markers_formatted()
)]
pub struct UnknownSubsectionError(pub u8);

impl From<u8> for UnknownSubsectionError {
    fn from(b: u8) -> Self {
        Self(b)
    }
}

/// What a COMDAT group member refers to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ComdatKind {
    Data,
    Function,
    Global,
}

#[expect(non_upper_case_globals)]
static ComdatKind_MARKERS: phf::OrderedMap<u8, ComdatKind> = phf_ordered_map! {
    0u8 => ComdatKind::Data,
    1u8 => ComdatKind::Function,
    2u8 => ComdatKind::Global,
};

impl FromMarkerByte for ComdatKind {
    type Error = UnknownComdatKindError;

    fn markers() -> &'static phf::OrderedMap<u8, Self> {
        &ComdatKind_MARKERS
    }
}

#[derive(Debug, Error)]
#[error("unknown comdat kind {0}")]
pub struct UnknownComdatKindError(pub u32);

impl From<u8> for UnknownComdatKindError {
    fn from(b: u8) -> Self {
        Self(b.into())
    }
}

impl ComdatKind {
    /// COMDAT kinds are stored as `varuint32`, wider than a marker byte.
    pub fn from_u32(kind: u32) -> Result<Self, UnknownComdatKindError> {
        u8::try_from(kind)
            .map_err(|_| UnknownComdatKindError(kind))
            .and_then(Self::from_marker)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SymbolKind {
    Function,
    Data,
    Global,
    Section,
}

#[expect(non_upper_case_globals)]
static SymbolKind_MARKERS: phf::OrderedMap<u8, SymbolKind> = phf_ordered_map! {
    0u8 => SymbolKind::Function,
    1u8 => SymbolKind::Data,
    2u8 => SymbolKind::Global,
    3u8 => SymbolKind::Section,
};

impl FromMarkerByte for SymbolKind {
    type Error = UnknownSymbolKindError;

    fn markers() -> &'static phf::OrderedMap<u8, Self> {
        &SymbolKind_MARKERS
    }
}

#[derive(Debug, Error)]
#[error(
    "unknown symbol kind {0}; expected one of {markers}",
    markers = SymbolKind::markers_formatted()
)]
pub struct UnknownSymbolKindError(pub u8);

impl From<u8> for UnknownSymbolKindError {
    fn from(b: u8) -> Self {
        Self(b)
    }
}

bitflags! {
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct SymbolFlags: u32 {
        const WEAK = 1;
        const LOCAL = 2;
        const HIDDEN = 4;
        const UNDEFINED = 16;
    }
}

impl SymbolFlags {
    /// Names of the known flags in bit order, plus the bits no name covers.
    pub fn describe(bits: u32) -> (Vec<&'static str>, u32) {
        let flags = SymbolFlags::from_bits_truncate(bits);
        let names = flags.iter_names().map(|(name, _)| name).collect();
        (names, bits & !SymbolFlags::all().bits())
    }
}

/// Why decoding a linking section stopped early.
///
/// Never escapes the linking printer: the render substitutes a failure marker and carries on
/// with the rest of the module.
#[derive(Debug, Error)]
pub enum DecodeLinkingError {
    #[error("failed reading record byte")]
    ReadByte(#[from] io::Error),

    #[error("failed decoding integer")]
    DecodeInteger(#[from] DecodeU32Error),

    #[error("failed decoding name")]
    DecodeName(#[from] DecodeNameError),

    #[error(transparent)]
    Subsection(#[from] SplitSubsectionError),

    #[error(transparent)]
    UnknownSubsection(#[from] UnknownSubsectionError),

    #[error(transparent)]
    UnknownComdatKind(#[from] UnknownComdatKindError),

    #[error(transparent)]
    UnknownSymbolKind(#[from] UnknownSymbolKindError),

    #[error("invalid COMDAT function index {0}")]
    ComdatFunctionIndex(u32),

    #[error("invalid COMDAT global index {0}")]
    ComdatGlobalIndex(u32),

    #[error("invalid {kind} symbol index {index}")]
    SymbolIndex { kind: &'static str, index: u32 },

    #[error("segment alignment 2^{0} overflows")]
    AlignmentOverflow(u32),

    #[error("{count} unread bytes at the end of a {subsection:?} subsection")]
    TrailingBytes {
        subsection: LinkingSubsection,
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residual_flag_bits_are_reported() {
        let (names, rest) = SymbolFlags::describe(1 | 4 | 16 | 64);
        assert_eq!(names, ["WEAK", "HIDDEN", "UNDEFINED"]);
        assert_eq!(rest, 64);
    }

    #[test]
    fn comdat_kinds_reject_wide_values() {
        assert_eq!(ComdatKind::from_u32(2).unwrap(), ComdatKind::Global);
        assert!(matches!(
            ComdatKind::from_u32(300),
            Err(UnknownComdatKindError(300))
        ));
        assert!(matches!(
            ComdatKind::from_u32(3),
            Err(UnknownComdatKindError(3))
        ));
    }
}
