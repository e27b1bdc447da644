use crate::core::types::limits::SizeConstraints;
use std::fmt;

/// Memory types classify linear memories and their size range, given in units of page size.
///
/// <https://www.w3.org/TR/wasm-core-2/#memory-types>
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct MemoryType {
    pub is_shared: bool,
    pub size: SizeConstraints,
}

impl MemoryType {
    pub fn is_subset_of(&self, super_: &MemoryType) -> bool {
        self.is_shared == super_.is_shared && self.size.is_subset_of(&super_.size)
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.size)?;
        if self.is_shared {
            f.write_str(" shared")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory(is_shared: bool, min: u64, max: Option<u64>) -> MemoryType {
        MemoryType {
            is_shared,
            size: SizeConstraints::new(min, max),
        }
    }

    #[test]
    fn subset_requires_same_sharing_and_narrower_size() {
        let outer = memory(false, 1, Some(10));

        assert!(memory(false, 2, Some(8)).is_subset_of(&outer));
        assert!(!memory(true, 2, Some(8)).is_subset_of(&outer));
        assert!(!memory(false, 0, Some(8)).is_subset_of(&outer));
        assert!(!memory(false, 2, None).is_subset_of(&outer));
        assert!(memory(true, 2, None).is_subset_of(&memory(true, 0, None)));
    }
}
