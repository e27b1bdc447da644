//! A disassembler for in-memory WebAssembly modules.
//!
//! Modules are described by [`Module`]; value-type tuples and function signatures inside it are
//! interned by [`TypeInterner`] so equal types share one canonical handle that compares by
//! identity. [`print_module()`] renders a module as text, one declaration per line, with function
//! bodies re-nested from the flat operator stream and unique `$`-prefixed names for every
//! entity.
//!
//! Two custom sections are understood: "name" seeds the display names and "linking" is decoded
//! into a readable comment. Every other custom section is dumped as quoted bytes.
#![forbid(unsafe_code)]

pub mod core;
pub mod decode;
pub mod print;

pub use crate::core::interner::TypeInterner;
pub use crate::core::types;
pub use crate::core::{CustomSection, Module};
pub use crate::print::{DisassemblyNames, PrintError, print_module, print_module_with_names};
