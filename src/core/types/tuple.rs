use crate::core::interner::{TupleEntry, TypeInterner};
use crate::core::types::ValueType;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An ordered sequence of value types, interned so that equality and hashing are O(1).
///
/// Two tuples are equal exactly when they were registered with the same contents, no matter
/// when or on which thread.
#[derive(Clone, Copy)]
pub struct TypeTuple(pub(crate) &'static TupleEntry);

impl TypeTuple {
    pub fn new(elems: &[ValueType]) -> Self {
        TypeInterner::global().register_tuple(elems)
    }

    pub fn empty() -> Self {
        Self::new(&[])
    }

    pub fn as_slice(&self) -> &'static [ValueType] {
        let entry: &'static TupleEntry = self.0;
        &entry.elems
    }

    pub fn len(&self) -> usize {
        self.0.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.elems.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<ValueType> {
        self.0.elems.get(index).copied()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = ValueType> + 'static {
        self.as_slice().iter().copied()
    }

    /// Structural hash computed once at registration.
    pub fn hash_value(&self) -> u64 {
        self.0.hash
    }
}

impl PartialEq for TypeTuple {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for TypeTuple {}

impl Hash for TypeTuple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl Default for TypeTuple {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<ValueType> for TypeTuple {
    fn from(value_type: ValueType) -> Self {
        Self::new(&[value_type])
    }
}

impl From<&[ValueType]> for TypeTuple {
    fn from(elems: &[ValueType]) -> Self {
        Self::new(elems)
    }
}

impl<const N: usize> From<[ValueType; N]> for TypeTuple {
    fn from(elems: [ValueType; N]) -> Self {
        Self::new(&elems)
    }
}

impl FromIterator<ValueType> for TypeTuple {
    fn from_iter<I: IntoIterator<Item = ValueType>>(iter: I) -> Self {
        let elems: Vec<ValueType> = iter.into_iter().collect();
        Self::new(&elems)
    }
}

impl fmt::Debug for TypeTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// A single element prints bare, anything else as a parenthesized list.
impl fmt::Display for TypeTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [single] = self.as_slice() {
            return write!(f, "{single}");
        }

        f.write_str("(")?;
        for (i, elem) in self.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{elem}")?;
        }
        f.write_str(")")
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TypeTuple {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let elems = Vec::<ValueType>::deserialize(deserializer)?;
        Ok(Self::new(&elems))
    }
}
