//! Type definitions for the WebAssembly types a module is built from.
//!
//! <https://www.w3.org/TR/wasm-core-2/#types>
pub mod exceptiontype;
pub use exceptiontype::ExceptionType;

pub mod functype;
pub use functype::FunctionType;

pub mod globaltype;
pub use globaltype::GlobalType;

pub mod limits;
pub use limits::SizeConstraints;

pub mod memtype;
pub use memtype::MemoryType;

pub mod objecttype;
pub use objecttype::{ObjectKind, ObjectKindMismatch, ObjectType};

pub mod tabletype;
pub use tabletype::{TableElementType, TableType};

pub mod tuple;
pub use tuple::TypeTuple;

pub mod valtype;
pub use valtype::ValueType;
