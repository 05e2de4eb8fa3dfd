//! Built-in generator units
//!
//! | unit | rust | csharp |
//! |---|---|---|
//! | `constants` | `isaconstants.rs` | `IsaConstants.g.cs` |
//! | `enums` | region `<Group>` in `<group>.rs` | `<Group>.g.cs` |
//! | `op-counts` | `instruction_op_counts.rs` | `InstructionOpCounts.g.cs` |
//! | `mnemonics` | `mnemonics.rs` | `MnemonicUtilsData.g.cs` |
//! | `memory-sizes` | `instruction_memory_sizes.rs` | `InstructionMemorySizes.g.cs` |
//! | `instr-info-dicts` | region `OpAccessDict` in `test_parser.rs` | region `Dicts` in `InstructionInfoConstants.cs` |
//!
//! Every unit is written once against [`Language`] and registered for
//! every target.

use std::path::{Path, PathBuf};

use crate::error::GenResult;
use crate::lang::{ArrayDecl, DictDecl, Language, Scope, TargetLanguage};
use crate::markup::TypeKey;
use crate::output::FileOutcome;
use crate::registry::{Coverage, GenContext, GeneratorUnit, ReferencesFn, Registry, RunFn};
use crate::symbols::GroupKind;
use crate::tables::{row_keys, IsaTables};
use crate::writer::CodeWriter;

/// Instruction identifiers; drives every per-instruction table
pub const CODE: &str = "Code";
pub const MNEMONIC: &str = "Mnemonic";
pub const MEMORY_SIZE: &str = "MemorySize";
pub const OP_ACCESS: &str = "OpAccess";

/// Class holding the `NumberOf<Group>Values` constants
pub const CONSTANTS_CLASS: &str = "IsaConstants";

/// Name of the constant holding the member count of an enum group
pub fn count_constant(group: &str) -> String {
    format!("NumberOf{group}Values")
}

struct UnitDef {
    name: &'static str,
    coverage: Option<Coverage>,
    references: Option<ReferencesFn>,
    documented: bool,
    run: RunFn,
}

const fn covers_code(table: &'static str, keys: fn(&IsaTables) -> Vec<&str>) -> Option<Coverage> {
    Some(Coverage {
        group: CODE,
        table,
        keys,
    })
}

fn op_count_keys(tables: &IsaTables) -> Vec<&str> {
    row_keys(&tables.op_counts)
}

fn mnemonic_keys(tables: &IsaTables) -> Vec<&str> {
    row_keys(&tables.mnemonics)
}

fn memory_size_keys(tables: &IsaTables) -> Vec<&str> {
    row_keys(&tables.memory_sizes)
}

fn mnemonic_refs(tables: &IsaTables) -> Vec<(&'static str, &str)> {
    tables
        .mnemonics
        .iter()
        .map(|row| (MNEMONIC, row.mnemonic.as_str()))
        .collect()
}

fn memory_size_refs(tables: &IsaTables) -> Vec<(&'static str, &str)> {
    tables
        .memory_sizes
        .iter()
        .flat_map(|row| {
            [
                (MEMORY_SIZE, row.memory.as_str()),
                (MEMORY_SIZE, row.broadcast.as_str()),
            ]
        })
        .collect()
}

fn op_access_refs(tables: &IsaTables) -> Vec<(&'static str, &str)> {
    tables
        .op_access
        .iter()
        .map(|entry| (OP_ACCESS, entry.value.as_str()))
        .collect()
}

const UNITS: &[UnitDef] = &[
    UnitDef {
        name: "constants",
        coverage: None,
        references: None,
        documented: false,
        run: gen_constants,
    },
    UnitDef {
        name: "enums",
        coverage: None,
        references: None,
        documented: true,
        run: gen_enums,
    },
    UnitDef {
        name: "op-counts",
        coverage: covers_code("op-counts", op_count_keys),
        references: None,
        documented: false,
        run: gen_op_counts,
    },
    UnitDef {
        name: "mnemonics",
        coverage: covers_code("mnemonics", mnemonic_keys),
        references: Some(mnemonic_refs),
        documented: false,
        run: gen_mnemonics,
    },
    UnitDef {
        name: "memory-sizes",
        coverage: covers_code("memory-sizes", memory_size_keys),
        references: Some(memory_size_refs),
        documented: false,
        run: gen_memory_sizes,
    },
    UnitDef {
        name: "instr-info-dicts",
        coverage: None,
        references: Some(op_access_refs),
        documented: false,
        run: gen_instr_info_dicts,
    },
];

/// Register every built-in unit for every language
pub fn register_builtin(registry: &mut Registry) {
    for language in TargetLanguage::ALL {
        for def in UNITS {
            registry.register(GeneratorUnit {
                language,
                name: def.name,
                coverage: def.coverage,
                references: def.references,
                documented: def.documented,
                run: def.run,
            });
        }
    }
}

/// Path of a whole generated file in the source directory
fn source_file(ctx: &GenContext<'_>, lang: &dyn Language, rust: &str, csharp: &str) -> PathBuf {
    let target = lang.target();
    let name = match target {
        TargetLanguage::Rust => rust,
        TargetLanguage::CSharp => csharp,
    };
    ctx.source_dir(target).join(name)
}

/// Generate a whole file whose declarations live in `scope`
fn scoped_file(
    ctx: &GenContext<'_>,
    lang: &dyn Language,
    path: &Path,
    scope: &Scope<'_>,
    body: impl FnOnce(&mut CodeWriter) -> GenResult<()>,
) -> GenResult<FileOutcome> {
    ctx.output(lang).whole_file(path, |w| {
        lang.open_scope(w, scope);
        body(w)?;
        lang.close_scope(w, scope);
        Ok(())
    })
}

/// Scope of a file of lookup tables sized by the constants class
fn table_scope<'a>(ctx: &GenContext<'a>, class: &'a str) -> Scope<'a> {
    Scope {
        namespace: ctx.namespace(),
        class: Some(class),
        constants: Some(CONSTANTS_CLASS),
        system_attributes: false,
    }
}

fn gen_constants(ctx: &GenContext<'_>, lang: &dyn Language) -> GenResult<Vec<FileOutcome>> {
    let constants: Vec<(String, usize)> = ctx
        .data
        .catalog
        .groups()
        .filter(|group| group.kind == GroupKind::Enum)
        .map(|group| (count_constant(&group.name), group.len()))
        .collect();
    let path = source_file(ctx, lang, "isaconstants.rs", "IsaConstants.g.cs");
    let scope = Scope {
        namespace: ctx.namespace(),
        class: None,
        constants: None,
        system_attributes: false,
    };
    let outcome = scoped_file(ctx, lang, &path, &scope, |w| {
        ctx.emitter(lang).write_constants(w, CONSTANTS_CLASS, &constants);
        Ok(())
    })?;
    Ok(vec![outcome])
}

fn gen_enums(ctx: &GenContext<'_>, lang: &dyn Language) -> GenResult<Vec<FileOutcome>> {
    let target = lang.target();
    let emitter = ctx.emitter(lang);
    let mut outcomes = Vec::new();
    for group in ctx.data.catalog.groups() {
        let outcome = match target {
            TargetLanguage::Rust => {
                let path = ctx
                    .source_dir(target)
                    .join(format!("{}.rs", group.name.to_lowercase()));
                ctx.output(lang)
                    .region(&path, &group.name, |w| emitter.write_enum(w, group))?
            }
            TargetLanguage::CSharp => {
                let path = ctx.source_dir(target).join(format!("{}.g.cs", group.name));
                let scope = Scope {
                    namespace: ctx.namespace(),
                    class: None,
                    constants: None,
                    system_attributes: group.kind == GroupKind::Flags,
                };
                scoped_file(ctx, lang, &path, &scope, |w| emitter.write_enum(w, group))?
            }
        };
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

fn gen_op_counts(ctx: &GenContext<'_>, lang: &dyn Language) -> GenResult<Vec<FileOutcome>> {
    let code = ctx.group(CODE)?;
    let length = count_constant(CODE);
    let decl = ArrayDecl {
        name: "OpCount",
        element: TypeKey::Unsigned(8),
        constants: CONSTANTS_CLASS,
        length: &length,
    };
    let path = source_file(ctx, lang, "instruction_op_counts.rs", "InstructionOpCounts.g.cs");
    let scope = table_scope(ctx, "InstructionOpCounts");
    let outcome = scoped_file(ctx, lang, &path, &scope, |w| {
        ctx.emitter(lang)
            .write_lookup_array(w, &decl, code, &ctx.data.tables.op_counts, |row| {
                Ok(u32::from(row.count))
            })
    })?;
    Ok(vec![outcome])
}

fn gen_mnemonics(ctx: &GenContext<'_>, lang: &dyn Language) -> GenResult<Vec<FileOutcome>> {
    let code = ctx.group(CODE)?;
    let mnemonic = ctx.group(MNEMONIC)?;
    let length = count_constant(CODE);
    let decl = ArrayDecl {
        name: "ToMnemonic",
        element: TypeKey::Unsigned(16),
        constants: CONSTANTS_CLASS,
        length: &length,
    };
    let path = source_file(ctx, lang, "mnemonics.rs", "MnemonicUtilsData.g.cs");
    let scope = table_scope(ctx, "MnemonicUtilsData");
    let outcome = scoped_file(ctx, lang, &path, &scope, |w| {
        ctx.emitter(lang)
            .write_lookup_array(w, &decl, code, &ctx.data.tables.mnemonics, |row| {
                Ok(mnemonic.resolve(&row.mnemonic)?.value)
            })
    })?;
    Ok(vec![outcome])
}

fn gen_memory_sizes(ctx: &GenContext<'_>, lang: &dyn Language) -> GenResult<Vec<FileOutcome>> {
    let code = ctx.group(CODE)?;
    let sizes = ctx.group(MEMORY_SIZE)?;
    let length = count_constant(CODE);
    let array = |name| ArrayDecl {
        name,
        element: TypeKey::Unsigned(8),
        constants: CONSTANTS_CLASS,
        length: &length,
    };
    let rows = &ctx.data.tables.memory_sizes;
    let path = source_file(
        ctx,
        lang,
        "instruction_memory_sizes.rs",
        "InstructionMemorySizes.g.cs",
    );
    let scope = table_scope(ctx, "InstructionMemorySizes");
    let outcome = scoped_file(ctx, lang, &path, &scope, |w| {
        let emitter = ctx.emitter(lang);
        emitter.write_lookup_array(w, &array("SizesNormal"), code, rows, |row| {
            Ok(sizes.resolve(&row.memory)?.value)
        })?;
        w.blank();
        emitter.write_lookup_array(w, &array("SizesBcst"), code, rows, |row| {
            Ok(sizes.resolve(&row.broadcast)?.value)
        })
    })?;
    Ok(vec![outcome])
}

fn gen_instr_info_dicts(ctx: &GenContext<'_>, lang: &dyn Language) -> GenResult<Vec<FileOutcome>> {
    let target = lang.target();
    let (file, region) = match target {
        TargetLanguage::Rust => ("test_parser.rs", "OpAccessDict"),
        TargetLanguage::CSharp => ("InstructionInfoConstants.cs", "Dicts"),
    };
    let path = ctx.tests_dir(target).join(file);
    let decl = DictDecl {
        name: "ToAccess",
        value_group: OP_ACCESS,
    };
    let outcome = ctx.output(lang).region(&path, region, |w| {
        ctx.emitter(lang)
            .write_dictionary(w, &decl, &ctx.data.tables.op_access)
    })?;
    Ok(vec![outcome])
}
