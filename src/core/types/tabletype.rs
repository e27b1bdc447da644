use crate::core::types::limits::SizeConstraints;
use std::fmt;

/// The only element type tables hold: a reference to a function of any signature.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TableElementType {
    #[default]
    AnyFunc,
}

impl TableElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            TableElementType::AnyFunc => "anyfunc",
        }
    }
}

/// Table types classify tables over elements of a given type within a size range.
///
/// <https://www.w3.org/TR/wasm-core-2/#table-types>
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct TableType {
    pub element_type: TableElementType,
    pub is_shared: bool,
    pub size: SizeConstraints,
}

impl TableType {
    pub fn is_subset_of(&self, super_: &TableType) -> bool {
        self.element_type == super_.element_type
            && self.is_shared == super_.is_shared
            && self.size.is_subset_of(&super_.size)
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.size)?;
        if self.is_shared {
            f.write_str(" shared")?;
        }
        write!(f, " {}", self.element_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(is_shared: bool, min: u64, max: Option<u64>) -> TableType {
        TableType {
            is_shared,
            size: SizeConstraints::new(min, max),
            ..Default::default()
        }
    }

    #[test]
    fn subset_requires_same_sharing_and_narrower_size() {
        let outer = table(true, 4, Some(16));

        assert!(table(true, 4, Some(16)).is_subset_of(&outer));
        assert!(table(true, 8, Some(12)).is_subset_of(&outer));
        assert!(!table(false, 8, Some(12)).is_subset_of(&outer));
        assert!(!table(true, 2, Some(12)).is_subset_of(&outer));
        assert!(!table(true, 8, Some(32)).is_subset_of(&outer));
    }
}
