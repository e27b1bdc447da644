//! The in-memory module model the disassembler renders.
pub mod indices;
pub mod interner;
pub mod operators;
pub mod types;

mod custom_section;
pub use custom_section::CustomSection;

mod module;
pub use module::{
    DataSegment, Definition, ElemSegment, Export, FunctionDef, GlobalDef, Import, IndexSpace,
    InitializerExpression, Module,
};
