use std::fmt;

/// A range of admissible sizes for resizeable storage such as tables and memories.
///
/// A `max` of [`SizeConstraints::UNBOUNDED`] means the storage may grow without limit.
///
/// <https://www.w3.org/TR/wasm-core-2/#limits>
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct SizeConstraints {
    pub min: u64,
    #[cfg_attr(feature = "serde", serde(default = "unbounded"))]
    pub max: u64,
}

impl SizeConstraints {
    pub const UNBOUNDED: u64 = u64::MAX;

    pub fn new(min: u64, max: Option<u64>) -> Self {
        Self {
            min,
            max: max.unwrap_or(Self::UNBOUNDED),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.max != Self::UNBOUNDED
    }

    /// Whether every size admitted by `self` is also admitted by `super_`.
    pub fn is_subset_of(&self, super_: &SizeConstraints) -> bool {
        self.min >= super_.min && self.max <= super_.max
    }
}

impl Default for SizeConstraints {
    fn default() -> Self {
        Self::new(0, None)
    }
}

impl fmt::Display for SizeConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_bounded() {
            write!(f, "{}..{}", self.min, self.max)
        } else {
            write!(f, "{}..", self.min)
        }
    }
}

#[cfg(feature = "serde")]
fn unbounded() -> u64 {
    SizeConstraints::UNBOUNDED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_requires_narrower_range() {
        let outer = SizeConstraints::new(1, Some(10));
        assert!(SizeConstraints::new(2, Some(9)).is_subset_of(&outer));
        assert!(outer.is_subset_of(&outer));
        assert!(!SizeConstraints::new(0, Some(9)).is_subset_of(&outer));
        assert!(!SizeConstraints::new(2, None).is_subset_of(&outer));
        assert!(SizeConstraints::new(2, None).is_subset_of(&SizeConstraints::default()));
    }

    #[test]
    fn displays_open_ended_range() {
        assert_eq!(SizeConstraints::new(1, None).to_string(), "1..");
        assert_eq!(SizeConstraints::new(1, Some(2)).to_string(), "1..2");
    }
}
