//! Custom sections carried through from the binary module.

/// Custom sections are intended to be used for debugging information or third-party
/// extensions, and are ignored by the WebAssembly semantics.
///
/// Their contents consist of a name further identifying the custom section, followed by an
/// uninterpreted sequence of bytes. The disassembler understands two of them: "name" seeds the
/// display names and "linking" is rendered as a structured comment.
///
/// <https://www.w3.org/TR/wasm-core-2/#custom-section>
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct CustomSection {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub contents: Vec<u8>,
}
