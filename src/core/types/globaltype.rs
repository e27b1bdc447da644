use crate::core::types::valtype::ValueType;
use std::fmt;

/// Global types classify global variables, which hold a value and can either be mutable or
/// immutable.
///
/// <https://www.w3.org/TR/wasm-core-2/#global-types>
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct GlobalType {
    pub value_type: ValueType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_mutable: bool,
}

impl Default for GlobalType {
    fn default() -> Self {
        Self {
            value_type: ValueType::Any,
            is_mutable: false,
        }
    }
}

impl fmt::Display for GlobalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mutability = if self.is_mutable { "global" } else { "immutable" };
        write!(f, "{mutability} {}", self.value_type)
    }
}
