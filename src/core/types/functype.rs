use crate::core::interner::{Encoding, FunctionEntry, TypeInterner};
use crate::core::types::TypeTuple;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Function types classify the signature of functions, mapping a tuple of parameters to a
/// tuple of results. They also classify the inputs and outputs of structured control
/// instructions.
///
/// Like [`TypeTuple`], function types are interned: equality is identity.
///
/// <https://www.w3.org/TR/wasm-core-2/#function-types>
#[derive(Clone, Copy)]
pub struct FunctionType(pub(crate) &'static FunctionEntry);

impl FunctionType {
    pub fn new(results: impl Into<TypeTuple>, params: impl Into<TypeTuple>) -> Self {
        TypeInterner::global().register_function(results.into(), params.into())
    }

    pub fn results(&self) -> TypeTuple {
        self.0.results
    }

    pub fn params(&self) -> TypeTuple {
        self.0.params
    }

    pub fn hash_value(&self) -> u64 {
        self.0.hash
    }

    pub fn encoding(&self) -> Encoding {
        TypeInterner::global().encode(*self)
    }

    pub fn from_encoding(encoding: Encoding) -> Option<Self> {
        TypeInterner::global().decode(encoding)
    }
}

impl PartialEq for FunctionType {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for FunctionType {}

impl Hash for FunctionType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl Default for FunctionType {
    fn default() -> Self {
        Self::new(TypeTuple::empty(), TypeTuple::empty())
    }
}

impl fmt::Debug for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionType")
            .field("params", &self.params())
            .field("results", &self.results())
            .finish()
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.params(), self.results())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FunctionType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Signature {
            #[serde(default)]
            params: TypeTuple,
            #[serde(default)]
            results: TypeTuple,
        }

        let Signature { params, results } = Signature::deserialize(deserializer)?;
        Ok(Self::new(results, params))
    }
}
