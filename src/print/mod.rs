//! Renders a [`Module`] as text.
//!
//! Rendering happens in two passes. The first assigns a unique display name to every type,
//! table, memory, global, exception type, function and local ([`DisassemblyNames`]). The second
//! walks the module in a fixed order and writes declarations into an [`IndentedText`], whose
//! indentation markers are resolved into spaces at the end.
use crate::core::Module;
use std::fmt;
use thiserror::Error;

pub mod escape;
pub mod indent;
pub mod names;
pub mod scope;

mod function;
mod linking;
mod module;

pub use indent::{INDENT_WIDTH, IndentUnderflow, IndentedText};
pub use names::{DisassemblyNames, FunctionNames};
pub use scope::NameScope;

/// Function indices per line in an element segment.
pub const ELEMS_PER_LINE: usize = 8;

/// Bytes per quoted line in data segments and opaque custom sections.
pub const DATA_BYTES_PER_LINE: usize = 64;

/// Targets per line in a `br_table`.
pub const BR_TABLE_TARGETS_PER_LINE: usize = 16;

/// Conditions that abort a render.
#[derive(Debug, Error)]
pub enum PrintError {
    #[error("{space} index {index} is out of range")]
    IndexOutOfRange { space: &'static str, index: u32 },

    #[error("malformed body in function {function}")]
    Body {
        function: String,
        #[source]
        source: BodyError,
    },

    #[error(transparent)]
    IndentUnderflow(#[from] IndentUnderflow),

    #[error("failed formatting output")]
    Format(#[from] fmt::Error),
}

/// A function body whose operators do not nest.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BodyError {
    #[error("`else` without an enclosing `if`")]
    MisplacedElse,

    #[error("`{0}` without an enclosing `try`")]
    MisplacedCatch(&'static str),

    #[error("branch depth {depth} exceeds the {open} open constructs")]
    BranchDepth { depth: u32, open: usize },

    #[error("operators ran out with {open} constructs still open")]
    Unterminated { open: usize },
}

/// Renders `module`, deriving display names from its "name" section or synthesizing them.
pub fn print_module(module: &Module) -> Result<String, PrintError> {
    render(module, DisassemblyNames::from_module(module))
}

/// Renders `module` using `names` as the name candidates.
///
/// `names` may be partial: entries that are missing or empty fall back to the names
/// [`print_module`] would use. Candidates are made unique and given their sigil before use, so
/// `names` may also contain duplicates.
pub fn print_module_with_names(
    module: &Module,
    names: DisassemblyNames,
) -> Result<String, PrintError> {
    render(module, DisassemblyNames::from_module(module).overlay(names))
}

fn render(module: &Module, names: DisassemblyNames) -> Result<String, PrintError> {
    let names = names.resolve();
    let mut out = IndentedText::new();
    module::ModulePrinter::new(module, &names, &mut out).print()?;
    Ok(out.finish(INDENT_WIDTH)?)
}
