//! Display names for everything the disassembler can refer to.
//!
//! Names start out as candidates, taken from the module's "name" section where it has one and
//! synthesized otherwise. [`DisassemblyNames::resolve`] then runs every candidate through a
//! [`NameScope`] so references in the rendered text are unambiguous.
use super::PrintError;
use super::scope::NameScope;
use crate::core::indices::FuncIdx;
use crate::core::{Definition, Module};
use crate::decode::names::NameMap;
use crate::decode::{NameSection, decode_name_section};

pub const SIGIL: char = '$';

#[derive(Debug, PartialEq, Clone, Default)]
pub struct FunctionNames {
    pub name: String,
    /// Parameters first, then the body's declared locals.
    pub locals: Vec<String>,
    /// Label candidates by the ordinal of the structured instruction in the body. Missing
    /// labels fall back to the instruction keyword.
    pub labels: NameMap,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct DisassemblyNames {
    pub types: Vec<String>,
    pub tables: Vec<String>,
    pub memories: Vec<String>,
    pub globals: Vec<String>,
    pub exception_types: Vec<String>,
    pub functions: Vec<FunctionNames>,
}

impl DisassemblyNames {
    /// Collects name candidates for every index space of `module`.
    ///
    /// A name section that fails to decode is logged and ignored.
    pub fn from_module(module: &Module) -> Self {
        let section = match module.custom_section("name") {
            Some(custom) => match decode_name_section(&custom.contents) {
                Ok(section) => section,
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring malformed name section");
                    NameSection::default()
                }
            },
            None => NameSection::default(),
        };

        let synthesize = |prefix: &str, count: usize| -> Vec<String> {
            (0..count).map(|i| format!("{prefix}{i}")).collect()
        };

        let functions = (0..module.functions.len())
            .map(|index| {
                let index = index as u32;
                let num_locals = module
                    .function_type(FuncIdx(index))
                    .map_or(0, |sig| sig.params().len())
                    + match module.functions.get(index) {
                        Some(Definition::Defined(def)) => {
                            def.non_parameter_local_types.len()
                        }
                        _ => 0,
                    };

                let name = section
                    .functions
                    .get(&index)
                    .filter(|name| !name.is_empty())
                    .cloned()
                    .unwrap_or_else(|| format!("func{index}"));

                let local_names = section.locals.get(&index);
                let locals = (0..num_locals as u32)
                    .map(|local| {
                        local_names
                            .and_then(|names| names.get(&local))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect();

                let labels = section.labels.get(&index).cloned().unwrap_or_default();

                FunctionNames {
                    name,
                    locals,
                    labels,
                }
            })
            .collect();

        Self {
            types: synthesize("type", module.types.len()),
            tables: synthesize("table", module.tables.len()),
            memories: synthesize("memory", module.memories.len()),
            globals: synthesize("global", module.globals.len()),
            exception_types: synthesize("exception_type", module.exception_types.len()),
            functions,
        }
    }

    /// Replaces candidates with the non-empty entries of `supplied` at the same index.
    ///
    /// Entries beyond the module's index spaces are ignored. Supplied label names replace the
    /// derived ones label by label.
    pub fn overlay(mut self, supplied: DisassemblyNames) -> Self {
        for (names, supplied) in [
            (&mut self.types, supplied.types),
            (&mut self.tables, supplied.tables),
            (&mut self.memories, supplied.memories),
            (&mut self.globals, supplied.globals),
            (&mut self.exception_types, supplied.exception_types),
        ] {
            overlay_candidates(names, supplied);
        }

        for (function, supplied) in self.functions.iter_mut().zip(supplied.functions) {
            if !supplied.name.is_empty() {
                function.name = supplied.name;
            }
            overlay_candidates(&mut function.locals, supplied.locals);
            function.labels.extend(
                supplied
                    .labels
                    .into_iter()
                    .filter(|(_, label)| !label.is_empty()),
            );
        }

        self
    }

    /// Makes every name unique within its scope and prepends the sigil.
    ///
    /// Types, tables, memories, globals, exception types and functions share one module-wide
    /// scope; each function's locals get a scope of their own. Labels are left as candidates,
    /// they are scoped while the body is printed.
    pub fn resolve(mut self) -> Self {
        let global_count = self.types.len()
            + self.tables.len()
            + self.memories.len()
            + self.globals.len()
            + self.exception_types.len()
            + self.functions.len();
        let mut global_scope = NameScope::with_capacity(SIGIL, global_count);

        for names in [
            &mut self.types,
            &mut self.tables,
            &mut self.memories,
            &mut self.globals,
            &mut self.exception_types,
        ] {
            for name in names.iter_mut() {
                *name = global_scope.map(name);
            }
        }

        for function in &mut self.functions {
            function.name = global_scope.map(&function.name);

            let mut local_scope = NameScope::with_capacity(SIGIL, function.locals.len());
            for local in &mut function.locals {
                *local = local_scope.map(local);
            }
        }

        self
    }

    pub fn type_name(&self, index: u32) -> Result<&str, PrintError> {
        lookup(&self.types, "type", index)
    }

    pub fn table_name(&self, index: u32) -> Result<&str, PrintError> {
        lookup(&self.tables, "table", index)
    }

    pub fn memory_name(&self, index: u32) -> Result<&str, PrintError> {
        lookup(&self.memories, "memory", index)
    }

    pub fn global_name(&self, index: u32) -> Result<&str, PrintError> {
        lookup(&self.globals, "global", index)
    }

    pub fn exception_type_name(&self, index: u32) -> Result<&str, PrintError> {
        lookup(&self.exception_types, "exception type", index)
    }

    pub fn function(&self, index: u32) -> Result<&FunctionNames, PrintError> {
        self.functions
            .get(index as usize)
            .ok_or(PrintError::IndexOutOfRange {
                space: "function",
                index,
            })
    }

    pub fn function_name(&self, index: u32) -> Result<&str, PrintError> {
        Ok(&self.function(index)?.name)
    }
}

impl FunctionNames {
    pub fn local_name(&self, index: u32) -> Result<&str, PrintError> {
        lookup(&self.locals, "local", index)
    }
}

fn overlay_candidates(names: &mut [String], supplied: Vec<String>) {
    for (name, supplied) in names.iter_mut().zip(supplied) {
        if !supplied.is_empty() {
            *name = supplied;
        }
    }
}

fn lookup<'n>(
    names: &'n [String],
    space: &'static str,
    index: u32,
) -> Result<&'n str, PrintError> {
    names
        .get(index as usize)
        .map(String::as_str)
        .ok_or(PrintError::IndexOutOfRange { space, index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::indices::TypeIdx;
    use crate::core::types::{FunctionType, TypeTuple, ValueType};
    use crate::core::{CustomSection, FunctionDef, IndexSpace};
    use pretty_assertions::assert_eq;

    fn name_section(function_names: &[(u8, &str)]) -> Vec<u8> {
        let mut payload = vec![function_names.len() as u8];
        for (index, name) in function_names {
            payload.push(*index);
            payload.push(name.len() as u8);
            payload.extend_from_slice(name.as_bytes());
        }
        let mut bytes = vec![1, payload.len() as u8];
        bytes.extend(payload);
        bytes
    }

    fn module_with_functions(count: usize, contents: Vec<u8>) -> Module {
        Module {
            types: vec![FunctionType::new(TypeTuple::empty(), [ValueType::I32])],
            functions: IndexSpace {
                imports: vec![],
                defs: vec![
                    FunctionDef {
                        r#type: TypeIdx(0),
                        non_parameter_local_types: vec![ValueType::F32],
                        code: vec![],
                    };
                    count
                ],
            },
            custom_sections: vec![CustomSection {
                name: "name".into(),
                contents,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn same_named_functions_are_disambiguated() {
        let module = module_with_functions(2, name_section(&[(0, "foo"), (1, "foo")]));
        let names = DisassemblyNames::from_module(&module).resolve();

        assert_eq!(names.functions[0].name, "$foo");
        assert_eq!(names.functions[1].name, "$foo_0");
        assert_eq!(names.functions[0].locals, ["$0", "$1"]);
        assert_eq!(names.types, ["$type0"]);
    }

    #[test]
    fn supplied_names_override_only_where_given() {
        let module = module_with_functions(2, name_section(&[(0, "foo")]));
        let supplied = DisassemblyNames {
            types: vec![String::new()],
            functions: vec![
                FunctionNames::default(),
                FunctionNames {
                    name: "bar".into(),
                    locals: vec![String::new(), "x".into(), "ignored".into()],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let names = DisassemblyNames::from_module(&module)
            .overlay(supplied)
            .resolve();

        assert_eq!(names.types, ["$type0"]);
        assert_eq!(names.functions[0].name, "$foo");
        assert_eq!(names.functions[1].name, "$bar");
        assert_eq!(names.functions[1].locals, ["$0", "$x"]);
    }

    #[test]
    fn malformed_name_section_falls_back_to_synthesized_names() {
        let module = module_with_functions(1, vec![1, 9, 1]);
        let names = DisassemblyNames::from_module(&module).resolve();

        assert_eq!(names.functions[0].name, "$func0");
    }
}
