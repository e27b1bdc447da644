//! Renders the "linking" custom section as a nested comment.
//!
//! Decoding problems stay inside the section: the comment ends with a `<decode error: …>` line
//! and the rest of the module renders as usual.
use super::escape::escape_str;
use super::indent::IndentedText;
use super::names::DisassemblyNames;
use crate::core::Module;
use crate::decode::FromMarkerByte;
use crate::decode::helpers::{decode_name, split_subsection};
use crate::decode::integer::decode_u32;
use crate::decode::linking::{
    ComdatKind, DecodeLinkingError, LinkingSubsection, SymbolFlags, SymbolKind,
};
use crate::decode::read_byte;
use std::error::Error;

pub(super) fn print_linking_section(
    module: &Module,
    names: &DisassemblyNames,
    out: &mut IndentedText,
    contents: &[u8],
) {
    out.push_str("\n(; linking section:");
    out.indent();

    let mut printer = LinkingPrinter {
        module,
        names,
        out,
        open: 0,
    };
    if let Err(err) = printer.print(contents) {
        let chain = error_chain(&err);
        tracing::warn!(error = %chain, "malformed linking section");
        printer.line(&format!("<decode error: {chain}>"));
        while printer.open > 0 {
            printer.close();
        }
    }

    out.dedent();
    out.push_str("\n;)");
}

fn error_chain(err: &DecodeLinkingError) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

struct LinkingPrinter<'a> {
    module: &'a Module,
    names: &'a DisassemblyNames,
    out: &'a mut IndentedText,
    /// Headings opened by this printer and not yet closed.
    open: usize,
}

impl LinkingPrinter<'_> {
    fn print(&mut self, mut bytes: &[u8]) -> Result<(), DecodeLinkingError> {
        let version = decode_u32(&mut bytes)?;
        self.line(&format!("Version: {version}"));

        while !bytes.is_empty() {
            let subsection = LinkingSubsection::from_marker(read_byte(&mut bytes)?)?;
            let mut payload = split_subsection(&mut bytes)?;
            tracing::debug!(?subsection, len = payload.len(), "linking subsection");

            match subsection {
                LinkingSubsection::SegmentInfo => self.segments(&mut payload)?,
                LinkingSubsection::InitFuncs => self.init_funcs(&mut payload)?,
                LinkingSubsection::ComdatInfo => self.comdats(&mut payload)?,
                LinkingSubsection::SymbolTable => self.symbols(&mut payload)?,
            }

            if !payload.is_empty() {
                return Err(DecodeLinkingError::TrailingBytes {
                    subsection,
                    count: payload.len(),
                });
            }
        }

        Ok(())
    }

    fn segments(&mut self, reader: &mut &[u8]) -> Result<(), DecodeLinkingError> {
        self.open("Segments:");
        for _ in 0..decode_u32(reader)? {
            let name = decode_name(reader)?;
            let alignment_log2 = decode_u32(reader)?;
            let flags = decode_u32(reader)?;
            let alignment = 1u64
                .checked_shl(alignment_log2)
                .ok_or(DecodeLinkingError::AlignmentOverflow(alignment_log2))?;
            self.line(&format!(
                "{} alignment={alignment} flags={flags}",
                escape_str(&name)
            ));
        }
        self.close();
        Ok(())
    }

    fn init_funcs(&mut self, reader: &mut &[u8]) -> Result<(), DecodeLinkingError> {
        let names = self.names;

        self.open("Init funcs:");
        for _ in 0..decode_u32(reader)? {
            let index = decode_u32(reader)?;
            match names.function_name(index) {
                Ok(name) => self.line(name),
                Err(_) => self.line(&format!("<invalid function index {index}>")),
            }
        }
        self.close();
        Ok(())
    }

    fn comdats(&mut self, reader: &mut &[u8]) -> Result<(), DecodeLinkingError> {
        let names = self.names;

        self.open("Comdats:");
        for _ in 0..decode_u32(reader)? {
            let name = decode_name(reader)?;
            let flags = decode_u32(reader)?;
            let mut heading = escape_str(&name);
            if flags != 0 {
                heading.push_str(&format!(" OtherFlags={flags}"));
            }
            self.open(&heading);

            for _ in 0..decode_u32(reader)? {
                let kind = ComdatKind::from_u32(decode_u32(reader)?)?;
                let index = decode_u32(reader)?;
                let member = match kind {
                    ComdatKind::Data => format!("data segment {index}"),
                    ComdatKind::Function => {
                        let name = names
                            .function_name(index)
                            .map_err(|_| DecodeLinkingError::ComdatFunctionIndex(index))?;
                        format!("function {name}")
                    }
                    ComdatKind::Global => {
                        let name = names
                            .global_name(index)
                            .map_err(|_| DecodeLinkingError::ComdatGlobalIndex(index))?;
                        format!("global {name}")
                    }
                };
                self.line(&format!("Symbol: {member}"));
            }
            self.close();
        }
        self.close();
        Ok(())
    }

    fn symbols(&mut self, reader: &mut &[u8]) -> Result<(), DecodeLinkingError> {
        let module = self.module;
        let names = self.names;

        self.open("Symbols:");
        for _ in 0..decode_u32(reader)? {
            let kind = SymbolKind::from_marker(read_byte(reader)?)?;
            let flags = decode_u32(reader)?;

            let mut text = match kind {
                SymbolKind::Function | SymbolKind::Global => {
                    let index = decode_u32(reader)?;
                    let (keyword, import_name, display_name) = if kind == SymbolKind::Function {
                        let import = module
                            .functions
                            .imports
                            .get(index as usize)
                            .map(|import| (&import.module_name, &import.export_name));
                        ("function", import, names.function_name(index))
                    } else {
                        let import = module
                            .globals
                            .imports
                            .get(index as usize)
                            .map(|import| (&import.module_name, &import.export_name));
                        ("global", import, names.global_name(index))
                    };

                    let name = match import_name {
                        Some((module_name, export_name)) => {
                            format!("{}.{}", escape_str(module_name), escape_str(export_name))
                        }
                        None => escape_str(&decode_name(reader)?),
                    };
                    let display_name = display_name.map_err(|_| {
                        DecodeLinkingError::SymbolIndex {
                            kind: keyword,
                            index,
                        }
                    })?;
                    format!("{keyword} {name} {display_name}")
                }
                SymbolKind::Data => {
                    let name = decode_name(reader)?;
                    let segment = decode_u32(reader)?;
                    let offset = decode_u32(reader)?;
                    let size = decode_u32(reader)?;
                    format!(
                        "data {} index={segment} offset={offset} size={size}",
                        escape_str(&name)
                    )
                }
                SymbolKind::Section => {
                    let index = decode_u32(reader)?;
                    let name = module
                        .custom_sections
                        .get(index as usize)
                        .map_or_else(|| "*invalid index*".to_owned(), |s| escape_str(&s.name));
                    format!("section {name} index={index}")
                }
            };

            let (flag_names, other) = SymbolFlags::describe(flags);
            for flag in flag_names {
                text.push_str(&format!(" *{flag}*"));
            }
            if other != 0 {
                text.push_str(&format!(" OtherFlags={other}"));
            }
            self.line(&text);
        }
        self.close();
        Ok(())
    }

    fn line(&mut self, text: &str) {
        self.out.push_str("\n");
        self.out.push_str(text);
    }

    fn open(&mut self, heading: &str) {
        self.line(heading);
        self.out.indent();
        self.open += 1;
    }

    fn close(&mut self) {
        self.out.dedent();
        self.open -= 1;
    }
}
