use super::escape::{escape_bytes, escape_str};
use super::function::{FunctionBodyPrinter, f32_text, f64_text};
use super::indent::IndentedText;
use super::linking::print_linking_section;
use super::names::DisassemblyNames;
use super::{DATA_BYTES_PER_LINE, ELEMS_PER_LINE, PrintError};
use crate::core::types::{
    ExceptionType, FunctionType, GlobalType, MemoryType, ObjectKind, SizeConstraints, TableType,
};
use crate::core::{CustomSection, Import, InitializerExpression, Module};
use std::fmt::{self, Write};

/// Writes ` (param ...) (result ...)`, omitting empty groups.
pub(super) fn write_signature(out: &mut IndentedText, signature: FunctionType) -> fmt::Result {
    for (keyword, types) in [("param", signature.params()), ("result", signature.results())] {
        if types.is_empty() {
            continue;
        }
        write!(out, " ({keyword}")?;
        for value_type in types.iter() {
            write!(out, " {value_type}")?;
        }
        out.push_str(")");
    }
    Ok(())
}

fn table_type_text(table_type: &TableType) -> String {
    let mut text = size_text(&table_type.size);
    if table_type.is_shared {
        text.push_str(" shared");
    }
    text.push(' ');
    text.push_str(table_type.element_type.as_str());
    text
}

fn memory_type_text(memory_type: &MemoryType) -> String {
    let mut text = size_text(&memory_type.size);
    if memory_type.is_shared {
        text.push_str(" shared");
    }
    text
}

fn size_text(size: &SizeConstraints) -> String {
    if size.is_bounded() {
        format!("{} {}", size.min, size.max)
    } else {
        size.min.to_string()
    }
}

fn global_type_text(global_type: &GlobalType) -> String {
    if global_type.is_mutable {
        format!("(mut {})", global_type.value_type)
    } else {
        global_type.value_type.to_string()
    }
}

fn exception_type_text(exception_type: &ExceptionType) -> String {
    exception_type
        .params
        .iter()
        .map(|param| format!(" {param}"))
        .collect()
}

/// Renders the declarations of one module in a fixed order.
pub(super) struct ModulePrinter<'a> {
    module: &'a Module,
    names: &'a DisassemblyNames,
    out: &'a mut IndentedText,
}

impl<'a> ModulePrinter<'a> {
    pub(super) fn new(
        module: &'a Module,
        names: &'a DisassemblyNames,
        out: &'a mut IndentedText,
    ) -> Self {
        Self { module, names, out }
    }

    pub(super) fn print(mut self) -> Result<(), PrintError> {
        tracing::debug!(
            types = self.module.types.len(),
            functions = self.module.functions.len(),
            custom_sections = self.module.custom_sections.len(),
            "printing module"
        );

        self.out.push_str("(module");
        self.out.indent();

        self.print_types()?;
        self.print_imports()?;
        self.print_exports()?;
        self.print_definitions()?;
        self.print_segments()?;
        if let Some(start) = self.module.start_function {
            let name = self.names.function_name(start.0)?;
            write!(self.out, "\n(start {name})")?;
        }
        for def_index in 0..self.module.functions.defs.len() {
            self.print_function(def_index)?;
        }
        let module = self.module;
        for section in &module.custom_sections {
            self.print_custom_section(section)?;
        }

        self.out.dedent();
        self.out.push_str("\n)\n");
        Ok(())
    }

    fn print_types(&mut self) -> Result<(), PrintError> {
        for (index, signature) in self.module.types.iter().enumerate() {
            let name = self.names.type_name(index as u32)?;
            write!(self.out, "\n(type {name} (func")?;
            write_signature(self.out, *signature)?;
            self.out.push_str("))");
        }
        Ok(())
    }

    fn print_imports(&mut self) -> Result<(), PrintError> {
        let module = self.module;
        let names = self.names;

        for (index, import) in module.functions.imports.iter().enumerate() {
            let signature = module.types.get(import.r#type.index()).ok_or(
                PrintError::IndexOutOfRange {
                    space: "type",
                    index: import.r#type.0,
                },
            )?;
            self.import_header(import, "func", names.function_name(index as u32)?)?;
            write_signature(self.out, *signature)?;
            self.out.push_str("))");
        }
        for (index, import) in module.tables.imports.iter().enumerate() {
            self.import_header(import, "table", names.table_name(index as u32)?)?;
            write!(self.out, " {}))", table_type_text(&import.r#type))?;
        }
        for (index, import) in module.memories.imports.iter().enumerate() {
            self.import_header(import, "memory", names.memory_name(index as u32)?)?;
            write!(self.out, " {}))", memory_type_text(&import.r#type))?;
        }
        for (index, import) in module.globals.imports.iter().enumerate() {
            self.import_header(import, "global", names.global_name(index as u32)?)?;
            write!(self.out, " {}))", global_type_text(&import.r#type))?;
        }
        for (index, import) in module.exception_types.imports.iter().enumerate() {
            let name = names.exception_type_name(index as u32)?;
            self.import_header(import, "exception_type", name)?;
            write!(self.out, "{}))", exception_type_text(&import.r#type))?;
        }
        Ok(())
    }

    fn import_header<T>(
        &mut self,
        import: &Import<T>,
        keyword: &str,
        name: &str,
    ) -> Result<(), PrintError> {
        write!(
            self.out,
            "\n(import \"{}\" \"{}\" ({keyword} {name}",
            escape_str(&import.module_name),
            escape_str(&import.export_name)
        )?;
        Ok(())
    }

    fn print_exports(&mut self) -> Result<(), PrintError> {
        for export in &self.module.exports {
            let name = match export.kind {
                ObjectKind::Function => self.names.function_name(export.index)?,
                ObjectKind::Table => self.names.table_name(export.index)?,
                ObjectKind::Memory => self.names.memory_name(export.index)?,
                ObjectKind::Global => self.names.global_name(export.index)?,
                ObjectKind::ExceptionType => self.names.exception_type_name(export.index)?,
            };
            write!(
                self.out,
                "\n(export \"{}\" ({} {name}))",
                escape_str(&export.name),
                export.kind.keyword()
            )?;
        }
        Ok(())
    }

    /// Memories, tables, globals and exception types defined by the module itself.
    fn print_definitions(&mut self) -> Result<(), PrintError> {
        let module = self.module;
        let names = self.names;

        let first = module.memories.imports.len();
        for (i, memory_type) in module.memories.defs.iter().enumerate() {
            let name = names.memory_name((first + i) as u32)?;
            write!(self.out, "\n(memory {name} {})", memory_type_text(memory_type))?;
        }

        let first = module.tables.imports.len();
        for (i, table_type) in module.tables.defs.iter().enumerate() {
            let name = names.table_name((first + i) as u32)?;
            write!(self.out, "\n(table {name} {})", table_type_text(table_type))?;
        }

        let first = module.globals.imports.len();
        for (i, global) in module.globals.defs.iter().enumerate() {
            let name = names.global_name((first + i) as u32)?;
            let initializer = self.initializer_text(&global.initializer)?;
            write!(
                self.out,
                "\n(global {name} {} {initializer})",
                global_type_text(&global.r#type)
            )?;
        }

        let first = module.exception_types.imports.len();
        for (i, exception_type) in module.exception_types.defs.iter().enumerate() {
            let name = names.exception_type_name((first + i) as u32)?;
            write!(
                self.out,
                "\n(exception_type {name}{})",
                exception_type_text(exception_type)
            )?;
        }

        Ok(())
    }

    fn print_segments(&mut self) -> Result<(), PrintError> {
        let module = self.module;
        let names = self.names;

        for segment in &module.elem_segments {
            let table = names.table_name(segment.table_index.0)?;
            let offset = self.initializer_text(&segment.base_offset)?;
            write!(self.out, "\n(elem {table} {offset}")?;
            self.out.indent();
            for (i, function) in segment.indices.iter().enumerate() {
                let separator = if i % ELEMS_PER_LINE == 0 { '\n' } else { ' ' };
                write!(self.out, "{separator}{}", names.function_name(function.0)?)?;
            }
            self.out.dedent();
            self.out.push_str(")");
        }

        for segment in &module.data_segments {
            let memory = names.memory_name(segment.memory_index.0)?;
            let offset = self.initializer_text(&segment.base_offset)?;
            write!(self.out, "\n(data {memory} {offset}")?;
            self.out.indent();
            self.print_quoted_lines(&segment.data)?;
            self.out.dedent();
            self.out.push_str(")");
        }

        Ok(())
    }

    fn print_quoted_lines(&mut self, bytes: &[u8]) -> Result<(), PrintError> {
        for chunk in bytes.chunks(DATA_BYTES_PER_LINE) {
            write!(self.out, "\n\"{}\"", escape_bytes(chunk))?;
        }
        Ok(())
    }

    fn print_function(&mut self, def_index: usize) -> Result<(), PrintError> {
        let module = self.module;
        let names = self.names;

        let def = &module.functions.defs[def_index];
        let function_index = (module.functions.imports.len() + def_index) as u32;
        let function = names.function(function_index)?;
        let signature = module
            .types
            .get(def.r#type.index())
            .ok_or(PrintError::IndexOutOfRange {
                space: "type",
                index: def.r#type.0,
            })?;

        write!(
            self.out,
            "\n(func {} (type {})",
            function.name,
            names.type_name(def.r#type.0)?
        )?;
        self.out.indent();

        let params = signature.params();
        for (i, param) in params.iter().enumerate() {
            write!(self.out, "\n(param {} {param})", function.local_name(i as u32)?)?;
        }
        if !signature.results().is_empty() {
            self.out.push_str("\n(result");
            for result in signature.results().iter() {
                write!(self.out, " {result}")?;
            }
            self.out.push_str(")");
        }
        for (i, local) in def.non_parameter_local_types.iter().enumerate() {
            let name = function.local_name((params.len() + i) as u32)?;
            write!(self.out, "\n(local {name} {local})")?;
        }

        FunctionBodyPrinter::new(module, names, function, self.out).print(&def.code)?;

        self.out.dedent();
        self.out.push_str(")");
        Ok(())
    }

    fn print_custom_section(&mut self, section: &CustomSection) -> Result<(), PrintError> {
        match section.name.as_str() {
            "name" => {}
            "linking" => {
                print_linking_section(self.module, self.names, self.out, &section.contents)
            }
            _ => {
                write!(self.out, "\n(; custom section \"{}\":", escape_str(&section.name))?;
                self.out.indent();
                self.print_quoted_lines(&section.contents)?;
                self.out.dedent();
                self.out.push_str("\n;)");
            }
        }
        Ok(())
    }

    fn initializer_text(&self, expression: &InitializerExpression) -> Result<String, PrintError> {
        Ok(match expression {
            InitializerExpression::I32Const(value) => format!("(i32.const {value})"),
            InitializerExpression::I64Const(value) => format!("(i64.const {value})"),
            InitializerExpression::F32Const(value) => {
                format!("(f32.const {})", f32_text(*value))
            }
            InitializerExpression::F64Const(value) => {
                format!("(f64.const {})", f64_text(*value))
            }
            InitializerExpression::GlobalGet(global) => {
                format!("(global.get {})", self.names.global_name(global.0)?)
            }
        })
    }
}
