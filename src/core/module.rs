use crate::core::CustomSection;
use crate::core::indices::*;
use crate::core::operators::Operator;
use crate::core::types::{
    ExceptionType, FunctionType, GlobalType, MemoryType, ObjectKind, ObjectType, TableType,
    ValueType,
};

/// A definition supplied by the host at instantiation, named by a two-level name.
///
/// <https://www.w3.org/TR/wasm-core-2/#imports>
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Import<T> {
    pub module_name: String,
    pub export_name: String,
    pub r#type: T,
}

/// One index space of a module. Imports take the lowest indices, definitions follow.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct IndexSpace<Def, Type> {
    pub imports: Vec<Import<Type>>,
    pub defs: Vec<Def>,
}

impl<Def, Type> Default for IndexSpace<Def, Type> {
    fn default() -> Self {
        Self {
            imports: vec![],
            defs: vec![],
        }
    }
}

/// What an index in an [`IndexSpace`] refers to.
#[derive(Debug, PartialEq)]
pub enum Definition<'a, Def, Type> {
    Imported(&'a Import<Type>),
    Defined(&'a Def),
}

impl<Def, Type> IndexSpace<Def, Type> {
    pub fn len(&self) -> usize {
        self.imports.len() + self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.defs.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<Definition<'_, Def, Type>> {
        let index = index as usize;
        match self.imports.get(index) {
            Some(import) => Some(Definition::Imported(import)),
            None => self
                .defs
                .get(index - self.imports.len())
                .map(Definition::Defined),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct FunctionDef {
    pub r#type: TypeIdx,
    /// Locals declared in the body, after the parameters in the local index space.
    pub non_parameter_local_types: Vec<ValueType>,
    /// The body, ending with the [`Operator::End`] that closes the function itself.
    pub code: Vec<Operator>,
}

/// A constant expression evaluated at instantiation.
#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum InitializerExpression {
    I32Const(i32),
    I64Const(i64),
    F32Const(f32),
    F64Const(f64),
    GlobalGet(GlobalIdx),
}

#[derive(Debug, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct GlobalDef {
    pub r#type: GlobalType,
    pub initializer: InitializerExpression,
}

#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Export {
    pub name: String,
    pub kind: ObjectKind,
    pub index: u32,
}

/// Active element segment writing function references into a table.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ElemSegment {
    #[cfg_attr(feature = "serde", serde(default))]
    pub table_index: TableIdx,
    pub base_offset: InitializerExpression,
    pub indices: Vec<FuncIdx>,
}

/// Active data segment writing bytes into a memory.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct DataSegment {
    #[cfg_attr(feature = "serde", serde(default))]
    pub memory_index: MemIdx,
    pub base_offset: InitializerExpression,
    pub data: Vec<u8>,
}

/// A fully decoded WebAssembly module.
///
/// Every index space lists its imports ahead of its definitions, so an index below
/// `imports.len()` names an import.
///
/// <https://www.w3.org/TR/wasm-core-2/#modules>
#[derive(Debug, PartialEq, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct Module {
    /// Function signatures referenced by [`TypeIdx`].
    pub types: Vec<FunctionType>,

    /// Function imports carry the index of their signature in [`Self::types`].
    pub functions: IndexSpace<FunctionDef, TypeIdx>,
    pub tables: IndexSpace<TableType, TableType>,
    pub memories: IndexSpace<MemoryType, MemoryType>,
    pub globals: IndexSpace<GlobalDef, GlobalType>,
    pub exception_types: IndexSpace<ExceptionType, ExceptionType>,

    pub exports: Vec<Export>,
    pub elem_segments: Vec<ElemSegment>,
    pub data_segments: Vec<DataSegment>,

    /// Function invoked once instantiation has initialized tables and memories.
    pub start_function: Option<FuncIdx>,

    /// Custom sections in the order they appeared, including "name" and "linking".
    pub custom_sections: Vec<CustomSection>,
}

impl Module {
    /// The signature of the function at `index`, whether imported or defined.
    pub fn function_type(&self, index: FuncIdx) -> Option<FunctionType> {
        let type_index = match self.functions.get(index.0)? {
            Definition::Imported(import) => import.r#type,
            Definition::Defined(def) => def.r#type,
        };
        self.types.get(type_index.index()).copied()
    }

    /// Resolves `export` to the type of the definition it names, or `None` when its index is out
    /// of range.
    pub fn export_type(&self, export: &Export) -> Option<ObjectType> {
        let object_type = match export.kind {
            ObjectKind::Function => {
                ObjectType::Function(self.function_type(FuncIdx(export.index))?)
            }
            ObjectKind::Table => ObjectType::Table(match self.tables.get(export.index)? {
                Definition::Imported(import) => import.r#type,
                Definition::Defined(def) => *def,
            }),
            ObjectKind::Memory => ObjectType::Memory(match self.memories.get(export.index)? {
                Definition::Imported(import) => import.r#type,
                Definition::Defined(def) => *def,
            }),
            ObjectKind::Global => ObjectType::Global(match self.globals.get(export.index)? {
                Definition::Imported(import) => import.r#type,
                Definition::Defined(def) => def.r#type,
            }),
            ObjectKind::ExceptionType => {
                ObjectType::ExceptionType(match self.exception_types.get(export.index)? {
                    Definition::Imported(import) => import.r#type,
                    Definition::Defined(def) => *def,
                })
            }
        };
        Some(object_type)
    }

    pub fn custom_section(&self, name: &str) -> Option<&CustomSection> {
        self.custom_sections.iter().find(|section| section.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{SizeConstraints, TypeTuple};
    use ValueType::*;

    fn module() -> Module {
        Module {
            types: vec![
                FunctionType::new(TypeTuple::empty(), [I32]),
                FunctionType::new(I64, TypeTuple::empty()),
            ],
            functions: IndexSpace {
                imports: vec![Import {
                    module_name: "env".into(),
                    export_name: "log".into(),
                    r#type: TypeIdx(0),
                }],
                defs: vec![FunctionDef {
                    r#type: TypeIdx(1),
                    ..Default::default()
                }],
            },
            memories: IndexSpace {
                imports: vec![],
                defs: vec![MemoryType {
                    is_shared: false,
                    size: SizeConstraints::new(1, Some(2)),
                }],
            },
            ..Default::default()
        }
    }

    #[test]
    fn function_indices_count_imports_first() {
        let module = module();
        assert_eq!(
            module.function_type(FuncIdx(0)),
            Some(FunctionType::new(TypeTuple::empty(), [I32]))
        );
        assert_eq!(
            module.function_type(FuncIdx(1)),
            Some(FunctionType::new(I64, TypeTuple::empty()))
        );
        assert_eq!(module.function_type(FuncIdx(2)), None);
    }

    #[test]
    fn export_type_resolves_through_index_spaces() {
        let module = module();
        let export = Export {
            name: "mem".into(),
            kind: ObjectKind::Memory,
            index: 0,
        };
        let object_type = module.export_type(&export);
        assert_eq!(
            object_type.and_then(|t| t.as_memory().ok()),
            Some(module.memories.defs[0])
        );

        let dangling = Export {
            name: "nope".into(),
            kind: ObjectKind::Global,
            index: 3,
        };
        assert_eq!(module.export_type(&dangling), None);
    }
}
