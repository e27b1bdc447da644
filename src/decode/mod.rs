//! Byte-level readers for the custom sections the disassembler interprets.
pub(crate) mod helpers;
pub mod integer;
pub mod linking;
pub mod names;

pub(crate) use helpers::read_byte;
pub use helpers::{DecodeByteVectorError, DecodeNameError, SplitSubsectionError};
pub use names::{DecodeNameSectionError, NameSection, decode_name_section};

pub(crate) trait FromMarkerByte
where
    Self: Sized + Copy + std::fmt::Debug + 'static,
{
    type Error: From<u8>;

    // defines the mapping between expected bytes and the corresponding variant
    fn markers() -> &'static phf::OrderedMap<u8, Self>;

    fn markers_formatted() -> String {
        Self::markers()
            .entries()
            .map(|(marker, variant)| format!("{marker} ({variant:?})"))
            .collect::<Vec<String>>()
            .join(", ")
    }

    fn from_marker(b: u8) -> Result<Self, Self::Error> {
        match Self::markers().get(&b) {
            Some(n) => Ok(*n),
            None => Err(b.into()),
        }
    }
}
