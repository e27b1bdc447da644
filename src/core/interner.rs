//! Process-wide canonical storage for [`TypeTuple`]s and [`FunctionType`]s.
//!
//! Every structurally distinct tuple or signature is allocated exactly once and leaked, so
//! handles are plain `&'static` references and compare by address. Entries are never evicted:
//! nothing can prove a signature is unreferenced, and the number of distinct signatures is
//! bounded by the size of the modules that were loaded.

use crate::core::types::{FunctionType, TypeTuple, ValueType};
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

/// Storage behind a [`TypeTuple`] handle.
#[derive(Debug)]
pub(crate) struct TupleEntry {
    pub(crate) hash: u64,
    pub(crate) elems: Box<[ValueType]>,
}

/// Storage behind a [`FunctionType`] handle.
#[derive(Debug)]
pub(crate) struct FunctionEntry {
    pub(crate) hash: u64,
    pub(crate) results: TypeTuple,
    pub(crate) params: TypeTuple,
    pub(crate) encoding: usize,
}

/// Opaque integer form of a [`FunctionType`], for storing a signature in plain integer slots.
///
/// An encoding is only meaningful to the interner that produced it, which lives for the whole
/// process.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Encoding(pub usize);

#[derive(Default)]
struct FunctionTable {
    by_hash: FxHashMap<u64, Vec<&'static FunctionEntry>>,
    by_encoding: Vec<&'static FunctionEntry>,
}

/// Hash-consing table for type tuples and function types.
///
/// Lookups take a shared lock; a miss upgrades to the exclusive lock and searches again before
/// inserting, so two threads registering the same contents always observe one identity.
pub struct TypeInterner {
    tuples: RwLock<FxHashMap<u64, Vec<&'static TupleEntry>>>,
    functions: RwLock<FunctionTable>,
}

static GLOBAL: LazyLock<TypeInterner> = LazyLock::new(TypeInterner::new);

impl TypeInterner {
    fn new() -> Self {
        Self {
            tuples: RwLock::new(FxHashMap::default()),
            functions: RwLock::new(FunctionTable::default()),
        }
    }

    /// The interner backing every [`TypeTuple`] and [`FunctionType`] in the process.
    pub fn global() -> &'static TypeInterner {
        &GLOBAL
    }

    /// Returns the canonical tuple for `elems`, allocating it on first use.
    pub fn register_tuple(&self, elems: &[ValueType]) -> TypeTuple {
        let hash = tuple_hash(elems);

        {
            let guard = self.tuples.read();
            if let Some(entry) = find_tuple(&guard, hash, elems) {
                return TypeTuple(entry);
            }
        }

        let mut guard = self.tuples.write();

        // another thread may have installed it between the two locks
        if let Some(entry) = find_tuple(&guard, hash, elems) {
            return TypeTuple(entry);
        }

        let entry: &'static TupleEntry = Box::leak(Box::new(TupleEntry {
            hash,
            elems: elems.into(),
        }));
        guard.entry(hash).or_default().push(entry);
        tracing::trace!(elems = ?elems, hash, "interned type tuple");

        TypeTuple(entry)
    }

    /// Returns the canonical function type returning `results` and taking `params`.
    pub fn register_function(&self, results: TypeTuple, params: TypeTuple) -> FunctionType {
        let hash = function_hash(results, params);

        {
            let guard = self.functions.read();
            if let Some(entry) = find_function(&guard, hash, results, params) {
                return FunctionType(entry);
            }
        }

        let mut guard = self.functions.write();

        if let Some(entry) = find_function(&guard, hash, results, params) {
            return FunctionType(entry);
        }

        let entry: &'static FunctionEntry = Box::leak(Box::new(FunctionEntry {
            hash,
            results,
            params,
            encoding: guard.by_encoding.len(),
        }));
        guard.by_hash.entry(hash).or_default().push(entry);
        guard.by_encoding.push(entry);
        tracing::trace!(%params, %results, hash, "interned function type");

        FunctionType(entry)
    }

    pub fn encode(&self, function_type: FunctionType) -> Encoding {
        Encoding(function_type.0.encoding)
    }

    /// Maps an [`Encoding`] back to its function type, or `None` if this interner never issued
    /// it.
    pub fn decode(&self, encoding: Encoding) -> Option<FunctionType> {
        self.functions
            .read()
            .by_encoding
            .get(encoding.0)
            .copied()
            .map(FunctionType)
    }

    /// Number of distinct function types registered so far.
    pub fn function_count(&self) -> usize {
        self.functions.read().by_encoding.len()
    }
}

fn tuple_hash(elems: &[ValueType]) -> u64 {
    let mut hasher = FxHasher::default();
    elems.hash(&mut hasher);
    hasher.finish()
}

fn function_hash(results: TypeTuple, params: TypeTuple) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write_u64(results.hash_value());
    hasher.write_u64(params.hash_value());
    hasher.finish()
}

fn find_tuple(
    table: &FxHashMap<u64, Vec<&'static TupleEntry>>,
    hash: u64,
    elems: &[ValueType],
) -> Option<&'static TupleEntry> {
    table
        .get(&hash)?
        .iter()
        .find(|entry| *entry.elems == *elems)
        .copied()
}

fn find_function(
    table: &FunctionTable,
    hash: u64,
    results: TypeTuple,
    params: TypeTuple,
) -> Option<&'static FunctionEntry> {
    table
        .by_hash
        .get(&hash)?
        .iter()
        .find(|entry| entry.results == results && entry.params == params)
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ValueType::*;

    #[test]
    fn structurally_equal_tuples_share_identity() {
        let interner = TypeInterner::global();
        let a = interner.register_tuple(&[I32, F64]);
        let b = interner.register_tuple(&vec![I32, F64]);
        assert!(std::ptr::eq(a.0, b.0));
        assert_eq!(a.hash_value(), b.hash_value());
    }

    #[test]
    fn encoding_is_stable_and_reversible() {
        let interner = TypeInterner::global();
        let results = interner.register_tuple(&[V128]);
        let params = interner.register_tuple(&[I64, I64, F32]);
        let sig = interner.register_function(results, params);

        let encoding = interner.encode(sig);
        assert_eq!(interner.encode(sig), encoding);
        assert_eq!(interner.decode(encoding), Some(sig));
    }

    #[test]
    fn unknown_encoding_does_not_decode() {
        let interner = TypeInterner::global();
        assert_eq!(interner.decode(Encoding(usize::MAX)), None);
    }
}
