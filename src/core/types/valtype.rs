use std::fmt;

/// Value types classify the individual operands that WebAssembly code computes with.
///
/// `Any` is the bottom of the operand stack while type checking polymorphic code; it has no
/// storage representation.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Copy, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum ValueType {
    Any,
    I32,
    I64,
    F32,
    F64,
    V128,
}

impl ValueType {
    /// Number of bytes a value of this type occupies, or `None` for [`ValueType::Any`].
    pub fn byte_width(self) -> Option<u8> {
        match self {
            ValueType::Any => None,
            ValueType::I32 | ValueType::F32 => Some(4),
            ValueType::I64 | ValueType::F64 => Some(8),
            ValueType::V128 => Some(16),
        }
    }

    pub fn bit_width(self) -> Option<u16> {
        self.byte_width().map(|bytes| u16::from(bytes) * 8)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Any => "any",
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
            ValueType::V128 => "v128",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_match_storage_size() {
        assert_eq!(ValueType::I32.byte_width(), Some(4));
        assert_eq!(ValueType::I64.byte_width(), Some(8));
        assert_eq!(ValueType::F32.byte_width(), Some(4));
        assert_eq!(ValueType::F64.byte_width(), Some(8));
        assert_eq!(ValueType::V128.byte_width(), Some(16));
        assert_eq!(ValueType::V128.bit_width(), Some(128));
        assert_eq!(ValueType::Any.byte_width(), None);
    }
}
