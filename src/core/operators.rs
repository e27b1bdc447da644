//! The operators that make up a function body.
//!
//! A body is a flat stream: structured instructions (`block`, `loop`, `if`, `try`) open a
//! construct that a later [`Operator::End`] closes, and branches name their target by relative
//! nesting depth. Operators without immediates that only differ by mnemonic are grouped into
//! the [`NumericOp`], [`MemoryOp`] and [`LaneOp`] tables.
//!
//! <https://www.w3.org/TR/wasm-core-2/#instructions>
use crate::core::indices::*;
use crate::core::types::ValueType;

macro_rules! define_opcodes {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $mnemonic:literal,)* }) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Deserialize),
            serde(rename_all = "snake_case")
        )]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub fn mnemonic(self) -> &'static str {
                match self {
                    $($name::$variant => $mnemonic,)*
                }
            }
        }
    };
}

macro_rules! define_memory_opcodes {
    (
        $(#[$meta:meta])* $name:ident {
            $($variant:ident => ($mnemonic:literal, $align:literal),)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Deserialize),
            serde(rename_all = "snake_case")
        )]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub fn mnemonic(self) -> &'static str {
                match self {
                    $($name::$variant => $mnemonic,)*
                }
            }

            /// Log2 of the access width in bytes.
            pub fn natural_alignment_log2(self) -> u8 {
                match self {
                    $($name::$variant => $align,)*
                }
            }
        }
    };
}

/// The signature of a structured instruction.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BlockType {
    #[default]
    Empty,
    Value(ValueType),
    Function(TypeIdx),
}

/// Memory access immediate. `align` is the log2 of the alignment hint in bytes.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct MemArg {
    pub align: u8,
    pub offset: u32,
}

#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Operator {
    // --- Control ---
    Unreachable,
    Nop,
    Block(BlockType),
    Loop(BlockType),
    If(BlockType),
    Else,
    End,
    Try(BlockType),
    Catch(ExceptionTypeIdx),
    CatchAll,
    Throw(ExceptionTypeIdx),
    Rethrow(u32),
    Br(u32),
    BrIf(u32),
    BrTable { targets: Vec<u32>, default: u32 },
    Return,
    Call(FuncIdx),
    CallIndirect(TypeIdx),

    // --- Parametric ---
    Drop,
    Select,

    // --- Variable ---
    LocalGet(LocalIdx),
    LocalSet(LocalIdx),
    LocalTee(LocalIdx),
    GlobalGet(GlobalIdx),
    GlobalSet(GlobalIdx),

    // --- Memory ---
    Memory(MemoryOp, MemArg),
    MemorySize,
    MemoryGrow,

    // --- Constants ---
    I32Const(i32),
    I64Const(i64),
    F32Const(f32),
    F64Const(f64),
    V128Const([u8; 16]),

    // --- Immediate-free numeric and vector ---
    Numeric(NumericOp),

    // --- Vector lanes ---
    Lane(LaneOp, u8),
    I8x16Shuffle([u8; 16]),
}

define_memory_opcodes! {
    MemoryOp {
        I32Load => ("i32.load", 2),
        I64Load => ("i64.load", 3),
        F32Load => ("f32.load", 2),
        F64Load => ("f64.load", 3),
        I32Load8S => ("i32.load8_s", 0),
        I32Load8U => ("i32.load8_u", 0),
        I32Load16S => ("i32.load16_s", 1),
        I32Load16U => ("i32.load16_u", 1),
        I64Load8S => ("i64.load8_s", 0),
        I64Load8U => ("i64.load8_u", 0),
        I64Load16S => ("i64.load16_s", 1),
        I64Load16U => ("i64.load16_u", 1),
        I64Load32S => ("i64.load32_s", 2),
        I64Load32U => ("i64.load32_u", 2),
        I32Store => ("i32.store", 2),
        I64Store => ("i64.store", 3),
        F32Store => ("f32.store", 2),
        F64Store => ("f64.store", 3),
        I32Store8 => ("i32.store8", 0),
        I32Store16 => ("i32.store16", 1),
        I64Store8 => ("i64.store8", 0),
        I64Store16 => ("i64.store16", 1),
        I64Store32 => ("i64.store32", 2),
        V128Load => ("v128.load", 4),
        V128Store => ("v128.store", 4),
        V128Load8x8S => ("v128.load8x8_s", 3),
        V128Load8x8U => ("v128.load8x8_u", 3),
        V128Load16x4S => ("v128.load16x4_s", 3),
        V128Load16x4U => ("v128.load16x4_u", 3),
        V128Load32x2S => ("v128.load32x2_s", 3),
        V128Load32x2U => ("v128.load32x2_u", 3),
        V128Load8Splat => ("v128.load8_splat", 0),
        V128Load16Splat => ("v128.load16_splat", 1),
        V128Load32Splat => ("v128.load32_splat", 2),
        V128Load64Splat => ("v128.load64_splat", 3),
        MemoryAtomicNotify => ("memory.atomic.notify", 2),
        MemoryAtomicWait32 => ("memory.atomic.wait32", 2),
        MemoryAtomicWait64 => ("memory.atomic.wait64", 3),
        I32AtomicLoad => ("i32.atomic.load", 2),
        I64AtomicLoad => ("i64.atomic.load", 3),
        I32AtomicStore => ("i32.atomic.store", 2),
        I64AtomicStore => ("i64.atomic.store", 3),
        I32AtomicRmwAdd => ("i32.atomic.rmw.add", 2),
        I64AtomicRmwAdd => ("i64.atomic.rmw.add", 3),
        I32AtomicRmwCmpxchg => ("i32.atomic.rmw.cmpxchg", 2),
        I64AtomicRmwCmpxchg => ("i64.atomic.rmw.cmpxchg", 3),
    }
}

define_opcodes! {
    LaneOp {
        I8x16ExtractLaneS => "i8x16.extract_lane_s",
        I8x16ExtractLaneU => "i8x16.extract_lane_u",
        I8x16ReplaceLane => "i8x16.replace_lane",
        I16x8ExtractLaneS => "i16x8.extract_lane_s",
        I16x8ExtractLaneU => "i16x8.extract_lane_u",
        I16x8ReplaceLane => "i16x8.replace_lane",
        I32x4ExtractLane => "i32x4.extract_lane",
        I32x4ReplaceLane => "i32x4.replace_lane",
        I64x2ExtractLane => "i64x2.extract_lane",
        I64x2ReplaceLane => "i64x2.replace_lane",
        F32x4ExtractLane => "f32x4.extract_lane",
        F32x4ReplaceLane => "f32x4.replace_lane",
        F64x2ExtractLane => "f64x2.extract_lane",
        F64x2ReplaceLane => "f64x2.replace_lane",
    }
}

define_opcodes! {
    NumericOp {
        // --- i32 ---
        I32Eqz => "i32.eqz",
        I32Eq => "i32.eq",
        I32Ne => "i32.ne",
        I32LtS => "i32.lt_s",
        I32LtU => "i32.lt_u",
        I32GtS => "i32.gt_s",
        I32GtU => "i32.gt_u",
        I32LeS => "i32.le_s",
        I32LeU => "i32.le_u",
        I32GeS => "i32.ge_s",
        I32GeU => "i32.ge_u",
        I32Clz => "i32.clz",
        I32Ctz => "i32.ctz",
        I32Popcnt => "i32.popcnt",
        I32Add => "i32.add",
        I32Sub => "i32.sub",
        I32Mul => "i32.mul",
        I32DivS => "i32.div_s",
        I32DivU => "i32.div_u",
        I32RemS => "i32.rem_s",
        I32RemU => "i32.rem_u",
        I32And => "i32.and",
        I32Or => "i32.or",
        I32Xor => "i32.xor",
        I32Shl => "i32.shl",
        I32ShrS => "i32.shr_s",
        I32ShrU => "i32.shr_u",
        I32Rotl => "i32.rotl",
        I32Rotr => "i32.rotr",

        // --- i64 ---
        I64Eqz => "i64.eqz",
        I64Eq => "i64.eq",
        I64Ne => "i64.ne",
        I64LtS => "i64.lt_s",
        I64LtU => "i64.lt_u",
        I64GtS => "i64.gt_s",
        I64GtU => "i64.gt_u",
        I64LeS => "i64.le_s",
        I64LeU => "i64.le_u",
        I64GeS => "i64.ge_s",
        I64GeU => "i64.ge_u",
        I64Clz => "i64.clz",
        I64Ctz => "i64.ctz",
        I64Popcnt => "i64.popcnt",
        I64Add => "i64.add",
        I64Sub => "i64.sub",
        I64Mul => "i64.mul",
        I64DivS => "i64.div_s",
        I64DivU => "i64.div_u",
        I64RemS => "i64.rem_s",
        I64RemU => "i64.rem_u",
        I64And => "i64.and",
        I64Or => "i64.or",
        I64Xor => "i64.xor",
        I64Shl => "i64.shl",
        I64ShrS => "i64.shr_s",
        I64ShrU => "i64.shr_u",
        I64Rotl => "i64.rotl",
        I64Rotr => "i64.rotr",

        // --- f32 ---
        F32Eq => "f32.eq",
        F32Ne => "f32.ne",
        F32Lt => "f32.lt",
        F32Gt => "f32.gt",
        F32Le => "f32.le",
        F32Ge => "f32.ge",
        F32Abs => "f32.abs",
        F32Neg => "f32.neg",
        F32Ceil => "f32.ceil",
        F32Floor => "f32.floor",
        F32Trunc => "f32.trunc",
        F32Nearest => "f32.nearest",
        F32Sqrt => "f32.sqrt",
        F32Add => "f32.add",
        F32Sub => "f32.sub",
        F32Mul => "f32.mul",
        F32Div => "f32.div",
        F32Min => "f32.min",
        F32Max => "f32.max",
        F32Copysign => "f32.copysign",

        // --- f64 ---
        F64Eq => "f64.eq",
        F64Ne => "f64.ne",
        F64Lt => "f64.lt",
        F64Gt => "f64.gt",
        F64Le => "f64.le",
        F64Ge => "f64.ge",
        F64Abs => "f64.abs",
        F64Neg => "f64.neg",
        F64Ceil => "f64.ceil",
        F64Floor => "f64.floor",
        F64Trunc => "f64.trunc",
        F64Nearest => "f64.nearest",
        F64Sqrt => "f64.sqrt",
        F64Add => "f64.add",
        F64Sub => "f64.sub",
        F64Mul => "f64.mul",
        F64Div => "f64.div",
        F64Min => "f64.min",
        F64Max => "f64.max",
        F64Copysign => "f64.copysign",

        // --- conversions ---
        I32WrapI64 => "i32.wrap_i64",
        I32TruncF32S => "i32.trunc_f32_s",
        I32TruncF32U => "i32.trunc_f32_u",
        I32TruncF64S => "i32.trunc_f64_s",
        I32TruncF64U => "i32.trunc_f64_u",
        I64ExtendI32S => "i64.extend_i32_s",
        I64ExtendI32U => "i64.extend_i32_u",
        I64TruncF32S => "i64.trunc_f32_s",
        I64TruncF32U => "i64.trunc_f32_u",
        I64TruncF64S => "i64.trunc_f64_s",
        I64TruncF64U => "i64.trunc_f64_u",
        F32ConvertI32S => "f32.convert_i32_s",
        F32ConvertI32U => "f32.convert_i32_u",
        F32ConvertI64S => "f32.convert_i64_s",
        F32ConvertI64U => "f32.convert_i64_u",
        F32DemoteF64 => "f32.demote_f64",
        F64ConvertI32S => "f64.convert_i32_s",
        F64ConvertI32U => "f64.convert_i32_u",
        F64ConvertI64S => "f64.convert_i64_s",
        F64ConvertI64U => "f64.convert_i64_u",
        F64PromoteF32 => "f64.promote_f32",
        I32ReinterpretF32 => "i32.reinterpret_f32",
        I64ReinterpretF64 => "i64.reinterpret_f64",
        F32ReinterpretI32 => "f32.reinterpret_i32",
        F64ReinterpretI64 => "f64.reinterpret_i64",
        I32Extend8S => "i32.extend8_s",
        I32Extend16S => "i32.extend16_s",
        I64Extend8S => "i64.extend8_s",
        I64Extend16S => "i64.extend16_s",
        I64Extend32S => "i64.extend32_s",
        I32TruncSatF32S => "i32.trunc_sat_f32_s",
        I32TruncSatF32U => "i32.trunc_sat_f32_u",
        I32TruncSatF64S => "i32.trunc_sat_f64_s",
        I32TruncSatF64U => "i32.trunc_sat_f64_u",
        I64TruncSatF32S => "i64.trunc_sat_f32_s",
        I64TruncSatF32U => "i64.trunc_sat_f32_u",
        I64TruncSatF64S => "i64.trunc_sat_f64_s",
        I64TruncSatF64U => "i64.trunc_sat_f64_u",

        // --- vector ---
        I8x16Swizzle => "i8x16.swizzle",
        I8x16Splat => "i8x16.splat",
        I16x8Splat => "i16x8.splat",
        I32x4Splat => "i32x4.splat",
        I64x2Splat => "i64x2.splat",
        F32x4Splat => "f32x4.splat",
        F64x2Splat => "f64x2.splat",
        I8x16Eq => "i8x16.eq",
        I16x8Eq => "i16x8.eq",
        I32x4Eq => "i32x4.eq",
        F32x4Eq => "f32x4.eq",
        F64x2Eq => "f64x2.eq",
        V128Not => "v128.not",
        V128And => "v128.and",
        V128AndNot => "v128.andnot",
        V128Or => "v128.or",
        V128Xor => "v128.xor",
        V128Bitselect => "v128.bitselect",
        V128AnyTrue => "v128.any_true",
        I8x16Add => "i8x16.add",
        I8x16Sub => "i8x16.sub",
        I16x8Add => "i16x8.add",
        I16x8Sub => "i16x8.sub",
        I16x8Mul => "i16x8.mul",
        I32x4Add => "i32x4.add",
        I32x4Sub => "i32x4.sub",
        I32x4Mul => "i32x4.mul",
        I64x2Add => "i64x2.add",
        I64x2Sub => "i64x2.sub",
        I64x2Mul => "i64x2.mul",
        F32x4Add => "f32x4.add",
        F32x4Sub => "f32x4.sub",
        F32x4Mul => "f32x4.mul",
        F32x4Div => "f32x4.div",
        F64x2Add => "f64x2.add",
        F64x2Sub => "f64x2.sub",
        F64x2Mul => "f64x2.mul",
        F64x2Div => "f64x2.div",

        // --- threads ---
        AtomicFence => "atomic.fence",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_ops_know_their_natural_alignment() {
        assert_eq!(MemoryOp::I32Load8U.natural_alignment_log2(), 0);
        assert_eq!(MemoryOp::I64Store.natural_alignment_log2(), 3);
        assert_eq!(MemoryOp::V128Load.natural_alignment_log2(), 4);
        assert_eq!(MemoryOp::I64Load32S.mnemonic(), "i64.load32_s");
    }
}
