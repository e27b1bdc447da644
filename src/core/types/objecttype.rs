use super::{ExceptionType, FunctionType, GlobalType, MemoryType, TableType};
use std::fmt;
use thiserror::Error;

/// The kinds of definitions a module can import or export.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ObjectKind {
    Function,
    Table,
    Memory,
    Global,
    ExceptionType,
}

impl ObjectKind {
    /// Keyword used for this kind in the text format.
    pub fn keyword(self) -> &'static str {
        match self {
            ObjectKind::Function => "func",
            ObjectKind::Table => "table",
            ObjectKind::Memory => "memory",
            ObjectKind::Global => "global",
            ObjectKind::ExceptionType => "exception_type",
        }
    }
}

/// The type of an importable or exportable definition.
///
/// Each variant carries exactly the payload of its kind; the `as_*` accessors check the kind
/// instead of trusting the caller.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ObjectType {
    Function(FunctionType),
    Table(TableType),
    Memory(MemoryType),
    Global(GlobalType),
    ExceptionType(ExceptionType),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected a {expected:?} object type; got {actual:?}")]
pub struct ObjectKindMismatch {
    pub expected: ObjectKind,
    pub actual: ObjectKind,
}

macro_rules! object_type_accessor {
    ($name:ident, $variant:ident, $payload:ty) => {
        pub fn $name(&self) -> Result<$payload, ObjectKindMismatch> {
            match self {
                ObjectType::$variant(payload) => Ok(*payload),
                other => Err(ObjectKindMismatch {
                    expected: ObjectKind::$variant,
                    actual: other.kind(),
                }),
            }
        }
    };
}

impl ObjectType {
    pub fn kind(&self) -> ObjectKind {
        match self {
            ObjectType::Function(_) => ObjectKind::Function,
            ObjectType::Table(_) => ObjectKind::Table,
            ObjectType::Memory(_) => ObjectKind::Memory,
            ObjectType::Global(_) => ObjectKind::Global,
            ObjectType::ExceptionType(_) => ObjectKind::ExceptionType,
        }
    }

    object_type_accessor!(as_function, Function, FunctionType);
    object_type_accessor!(as_table, Table, TableType);
    object_type_accessor!(as_memory, Memory, MemoryType);
    object_type_accessor!(as_global, Global, GlobalType);
    object_type_accessor!(as_exception_type, ExceptionType, ExceptionType);
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectType::Function(t) => write!(f, "func {t}"),
            ObjectType::Table(t) => write!(f, "table {t}"),
            ObjectType::Memory(t) => write!(f, "memory {t}"),
            ObjectType::Global(t) => write!(f, "{t}"),
            ObjectType::ExceptionType(t) => write!(f, "exception_type {t}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{SizeConstraints, ValueType};

    #[test]
    fn accessor_rejects_wrong_kind() {
        let memory = ObjectType::Memory(MemoryType {
            is_shared: false,
            size: SizeConstraints::new(1, None),
        });

        assert!(memory.as_memory().is_ok());
        assert_eq!(
            memory.as_global(),
            Err(ObjectKindMismatch {
                expected: ObjectKind::Global,
                actual: ObjectKind::Memory,
            })
        );
    }

    #[test]
    fn displays_like_the_type_grammar() {
        let sig = FunctionType::new(ValueType::I32, [ValueType::I32, ValueType::F64]);
        assert_eq!(ObjectType::Function(sig).to_string(), "func (i32, f64)->i32");

        let global = GlobalType {
            value_type: ValueType::I64,
            is_mutable: false,
        };
        assert_eq!(ObjectType::Global(global).to_string(), "immutable i64");

        let table = TableType {
            is_shared: true,
            size: SizeConstraints::new(0, Some(4)),
            ..Default::default()
        };
        assert_eq!(ObjectType::Table(table).to_string(), "table 0..4 shared anyfunc");
    }
}
