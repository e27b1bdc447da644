//! Function bodies: rebuilds the nesting of structured instructions from the flat operator
//! stream and renders one operator per line.
use super::indent::IndentedText;
use super::module::write_signature;
use super::names::{DisassemblyNames, FunctionNames, SIGIL};
use super::scope::NameScope;
use super::{BR_TABLE_TARGETS_PER_LINE, BodyError, PrintError};
use crate::core::Module;
use crate::core::operators::{BlockType, MemArg, MemoryOp, Operator};
use std::fmt::Write;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum ControlKind {
    Function,
    Block,
    Loop,
    IfThen,
    IfElse,
    Try,
    Catch,
}

#[derive(Debug)]
struct ControlFrame {
    kind: ControlKind,
    label: String,
}

pub(super) struct FunctionBodyPrinter<'a> {
    module: &'a Module,
    names: &'a DisassemblyNames,
    function: &'a FunctionNames,
    out: &'a mut IndentedText,
    control_stack: Vec<ControlFrame>,
    label_scope: NameScope,
    label_index: u32,
}

impl<'a> FunctionBodyPrinter<'a> {
    pub(super) fn new(
        module: &'a Module,
        names: &'a DisassemblyNames,
        function: &'a FunctionNames,
        out: &'a mut IndentedText,
    ) -> Self {
        Self {
            module,
            names,
            function,
            out,
            control_stack: vec![],
            label_scope: NameScope::new(SIGIL),
            label_index: 0,
        }
    }

    /// Prints operators until the `end` closing the function itself.
    ///
    /// Operators after that `end` are not part of the body and are ignored.
    pub(super) fn print(mut self, code: &[Operator]) -> Result<(), PrintError> {
        tracing::debug!(function = %self.function.name, operators = code.len(), "printing body");

        self.control_stack.push(ControlFrame {
            kind: ControlKind::Function,
            label: String::new(),
        });

        let mut operators = code.iter();
        while !self.control_stack.is_empty() {
            let Some(op) = operators.next() else {
                return Err(self.body_error(BodyError::Unterminated {
                    open: self.control_stack.len(),
                }));
            };
            self.print_operator(op)?;
        }

        Ok(())
    }

    fn print_operator(&mut self, op: &Operator) -> Result<(), PrintError> {
        let names = self.names;
        let function = self.function;

        match op {
            Operator::Block(block_type) => self.open("block", ControlKind::Block, *block_type)?,
            Operator::Loop(block_type) => self.open("loop", ControlKind::Loop, *block_type)?,
            Operator::If(block_type) => self.open("if", ControlKind::IfThen, *block_type)?,
            Operator::Try(block_type) => self.open("try", ControlKind::Try, *block_type)?,
            Operator::Else => {
                self.reopen(
                    &[ControlKind::IfThen],
                    ControlKind::IfElse,
                    BodyError::MisplacedElse,
                )?;
                self.out.push_str("\nelse");
                self.out.indent();
            }
            Operator::Catch(exception_type) => {
                self.reopen(
                    &[ControlKind::Try, ControlKind::Catch],
                    ControlKind::Catch,
                    BodyError::MisplacedCatch("catch"),
                )?;
                let name = names.exception_type_name(exception_type.0)?;
                write!(self.out, "\ncatch {name}")?;
                self.out.indent();
            }
            Operator::CatchAll => {
                self.reopen(
                    &[ControlKind::Try, ControlKind::Catch],
                    ControlKind::Catch,
                    BodyError::MisplacedCatch("catch_all"),
                )?;
                self.out.push_str("\ncatch_all");
                self.out.indent();
            }
            Operator::End => self.end()?,

            Operator::Br(depth) => {
                let target = self.branch_target(*depth)?;
                write!(self.out, "\nbr {target}")?;
            }
            Operator::BrIf(depth) => {
                let target = self.branch_target(*depth)?;
                write!(self.out, "\nbr_if {target}")?;
            }
            Operator::BrTable { targets, default } => self.br_table(targets, *default)?,
            Operator::Rethrow(depth) => {
                let target = self.branch_target(*depth)?;
                write!(self.out, "\nrethrow {target}")?;
            }
            Operator::Throw(exception_type) => {
                let name = names.exception_type_name(exception_type.0)?;
                write!(self.out, "\nthrow {name}")?;
            }
            Operator::Call(callee) => {
                let name = names.function_name(callee.0)?;
                write!(self.out, "\ncall {name}")?;
            }
            Operator::CallIndirect(type_index) => {
                let name = names.type_name(type_index.0)?;
                write!(self.out, "\ncall_indirect (type {name})")?;
            }

            Operator::LocalGet(local) => self.variable("local.get", function.local_name(local.0)?)?,
            Operator::LocalSet(local) => self.variable("local.set", function.local_name(local.0)?)?,
            Operator::LocalTee(local) => self.variable("local.tee", function.local_name(local.0)?)?,
            Operator::GlobalGet(global) => {
                self.variable("global.get", names.global_name(global.0)?)?
            }
            Operator::GlobalSet(global) => {
                self.variable("global.set", names.global_name(global.0)?)?
            }

            Operator::Memory(op, memarg) => self.memory_access(*op, *memarg)?,

            Operator::I32Const(value) => write!(self.out, "\ni32.const {value}")?,
            Operator::I64Const(value) => write!(self.out, "\ni64.const {value}")?,
            Operator::F32Const(value) => write!(self.out, "\nf32.const {}", f32_text(*value))?,
            Operator::F64Const(value) => write!(self.out, "\nf64.const {}", f64_text(*value))?,
            Operator::V128Const(bytes) => write!(self.out, "\nv128.const {}", v128_text(bytes))?,

            Operator::Numeric(op) => write!(self.out, "\n{}", op.mnemonic())?,
            Operator::Lane(op, lane) => write!(self.out, "\n{} {lane}", op.mnemonic())?,
            Operator::I8x16Shuffle(lanes) => {
                self.out.push_str("\ni8x16.shuffle (");
                for (i, lane) in lanes.iter().enumerate() {
                    let separator = if i == 0 { "" } else { " " };
                    write!(self.out, "{separator}{lane}")?;
                }
                self.out.push_str(")");
            }

            Operator::Unreachable => self.out.push_str("\nunreachable"),
            Operator::Nop => self.out.push_str("\nnop"),
            Operator::Return => self.out.push_str("\nreturn"),
            Operator::Drop => self.out.push_str("\ndrop"),
            Operator::Select => self.out.push_str("\nselect"),
            Operator::MemorySize => self.out.push_str("\nmemory.size"),
            Operator::MemoryGrow => self.out.push_str("\nmemory.grow"),
        }

        Ok(())
    }

    fn open(
        &mut self,
        keyword: &'static str,
        kind: ControlKind,
        block_type: BlockType,
    ) -> Result<(), PrintError> {
        let function = self.function;
        // `try` labels are never taken from the name section and do not advance its index
        let candidate = if kind == ControlKind::Try {
            keyword
        } else {
            let candidate = function
                .labels
                .get(&self.label_index)
                .map(String::as_str)
                .filter(|name| !name.is_empty())
                .unwrap_or(keyword);
            self.label_index += 1;
            candidate
        };
        let label = self.label_scope.map(candidate);

        write!(self.out, "\n{keyword} {label}")?;
        match block_type {
            BlockType::Empty => {}
            BlockType::Value(value_type) => write!(self.out, " (result {value_type})")?,
            BlockType::Function(type_index) => {
                let signature = self.module.types.get(type_index.index()).ok_or(
                    PrintError::IndexOutOfRange {
                        space: "type",
                        index: type_index.0,
                    },
                )?;
                write_signature(self.out, *signature)?;
            }
        }

        self.control_stack.push(ControlFrame { kind, label });
        self.out.indent();
        Ok(())
    }

    /// Closes the body of the innermost construct so a new clause can start at its depth.
    fn reopen(
        &mut self,
        allowed: &[ControlKind],
        next: ControlKind,
        misplaced: BodyError,
    ) -> Result<(), PrintError> {
        match self.control_stack.last_mut() {
            Some(frame) if allowed.contains(&frame.kind) => {
                frame.kind = next;
                self.out.dedent();
                Ok(())
            }
            _ => Err(self.body_error(misplaced)),
        }
    }

    fn end(&mut self) -> Result<(), PrintError> {
        if let Some(frame) = self.control_stack.pop()
            && frame.kind != ControlKind::Function
        {
            self.out.dedent();
            write!(self.out, "\nend ;; {}", frame.label)?;
        }
        Ok(())
    }

    /// Branches out of the function itself keep their numeric depth; all others name the label
    /// of the construct they target.
    fn branch_target(&self, depth: u32) -> Result<String, PrintError> {
        let open = self.control_stack.len();
        let frame = open
            .checked_sub(depth as usize + 1)
            .map(|index| &self.control_stack[index])
            .ok_or_else(|| self.body_error(BodyError::BranchDepth { depth, open }))?;

        Ok(match frame.kind {
            ControlKind::Function => depth.to_string(),
            _ => frame.label.clone(),
        })
    }

    fn br_table(&mut self, targets: &[u32], default: u32) -> Result<(), PrintError> {
        self.out.push_str("\nbr_table");
        self.out.indent();
        for (i, depth) in targets.iter().enumerate() {
            let target = self.branch_target(*depth)?;
            let separator = if i % BR_TABLE_TARGETS_PER_LINE == 0 { '\n' } else { ' ' };
            write!(self.out, "{separator}{target}")?;
        }
        let target = self.branch_target(default)?;
        write!(self.out, "\n{target} ;; default")?;
        self.out.dedent();
        Ok(())
    }

    fn variable(&mut self, mnemonic: &str, name: &str) -> Result<(), PrintError> {
        write!(self.out, "\n{mnemonic} {name}")?;
        Ok(())
    }

    fn memory_access(&mut self, op: MemoryOp, memarg: MemArg) -> Result<(), PrintError> {
        write!(self.out, "\n{}", op.mnemonic())?;
        if memarg.offset != 0 {
            write!(self.out, " offset={}", memarg.offset)?;
        }
        if memarg.align != op.natural_alignment_log2() {
            match 1u64.checked_shl(u32::from(memarg.align)) {
                Some(bytes) => write!(self.out, " align={bytes}")?,
                None => write!(self.out, " align=2^{}", memarg.align)?,
            }
        }
        Ok(())
    }

    fn body_error(&self, source: BodyError) -> PrintError {
        PrintError::Body {
            function: self.function.name.clone(),
            source,
        }
    }
}

pub(super) fn f32_text(value: f32) -> String {
    if value.is_nan() {
        nan_text(
            value.is_sign_negative(),
            u64::from(value.to_bits() & 0x007F_FFFF),
            0x0040_0000,
        )
    } else {
        format!("{value:?}")
    }
}

pub(super) fn f64_text(value: f64) -> String {
    if value.is_nan() {
        nan_text(
            value.is_sign_negative(),
            value.to_bits() & 0x000F_FFFF_FFFF_FFFF,
            0x0008_0000_0000_0000,
        )
    } else {
        format!("{value:?}")
    }
}

fn nan_text(negative: bool, payload: u64, canonical: u64) -> String {
    let sign = if negative { "-" } else { "" };
    if payload == canonical {
        format!("{sign}nan")
    } else {
        format!("{sign}nan:{payload:#x}")
    }
}

fn v128_text(bytes: &[u8; 16]) -> String {
    let mut text = String::from("i32x4");
    for lane in bytes.chunks_exact(4) {
        let lane = u32::from_le_bytes([lane[0], lane[1], lane[2], lane[3]]);
        text.push_str(&format!(" {lane:#010x}"));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_use_shortest_round_trip_text() {
        assert_eq!(f32_text(1.5), "1.5");
        assert_eq!(f32_text(f32::INFINITY), "inf");
        assert_eq!(f64_text(f64::NEG_INFINITY), "-inf");
        assert_eq!(f64_text(-0.0), "-0.0");
        assert_eq!(f64_text(1e300), "1e300");
    }

    #[test]
    fn nan_payloads_are_kept() {
        assert_eq!(f32_text(f32::from_bits(0x7FC0_0000)), "nan");
        assert_eq!(f32_text(f32::from_bits(0xFFC0_0000)), "-nan");
        assert_eq!(f32_text(f32::from_bits(0x7F80_0001)), "nan:0x1");
        assert_eq!(f64_text(f64::from_bits(0x7FF4_0000_0000_0000)), "nan:0x4000000000000");
    }

    #[test]
    fn v128_prints_four_little_endian_lanes() {
        let mut bytes = [0u8; 16];
        bytes[0] = 0x01;
        bytes[7] = 0xFF;
        assert_eq!(
            v128_text(&bytes),
            "i32x4 0x00000001 0xff000000 0x00000000 0x00000000"
        );
    }
}
