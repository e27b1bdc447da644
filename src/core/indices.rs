//! Type definitions for WebAssembly indices.
//!
//! See <https://www.w3.org/TR/wasm-core-2/#indices>

macro_rules! define_index_type {
    ($name:ident) => {
        #[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(transparent))]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_index_type!(TypeIdx);
define_index_type!(FuncIdx);
define_index_type!(TableIdx);
define_index_type!(MemIdx);
define_index_type!(GlobalIdx);
define_index_type!(LocalIdx);
define_index_type!(ExceptionTypeIdx);
