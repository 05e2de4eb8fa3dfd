//! Test utilities for isagen
//!
//! A small instruction set and helpers to lay out a generation tree in a
//! temporary directory.

use std::fs;
use std::io;
use std::path::Path;

use crate::config::GeneratorOptions;
use crate::data::{DataError, IsaData};
use crate::output::{begin_marker, end_marker};

/// Three instructions with every table filled in; rows are deliberately not
/// in ordinal order
pub const SAMPLE_ISA: &str = r#"
[[group]]
name = "Code"
doc = "An instruction"
members = [
    { name = "INVALID", doc = "It's an invalid instruction.\n\nThis is the default value." },
    { name = "Add_r8_rm8", doc = "`ADD r8, r/m8`\n\nSee <Mnemonic:Add>." },
    { name = "Push_r32", doc = "`PUSH r32`" },
]

[[group]]
name = "Mnemonic"
members = [{ name = "INVALID" }, { name = "Add" }, { name = "Push" }]

[[group]]
name = "MemorySize"
members = [
    { name = "Unknown" },
    { name = "UInt8", doc = "Memory location contains a <u8>" },
    { name = "UInt32", doc = "Memory location contains a <u32>, like <MemorySize:UInt8> but wider" },
]

[[group]]
name = "OpAccess"
members = [{ name = "None" }, { name = "Read" }, { name = "Write" }]

[[group]]
name = "OpFlags"
kind = "flags"
visibility = "internal"
members = [{ name = "None", value = 0 }, { name = "JccTaken", value = 0x40, doc = "Branch is taken" }]

[tables]
op-counts = [
    { code = "Push_r32", count = 1 },
    { code = "INVALID", count = 0 },
    { code = "Add_r8_rm8", count = 2 },
]
mnemonics = [
    { code = "INVALID", mnemonic = "INVALID" },
    { code = "Add_r8_rm8", mnemonic = "Add" },
    { code = "Push_r32", mnemonic = "Push" },
]
memory-sizes = [
    { code = "INVALID", memory = "Unknown", broadcast = "Unknown" },
    { code = "Add_r8_rm8", memory = "UInt8", broadcast = "Unknown" },
    { code = "Push_r32", memory = "UInt32", broadcast = "Unknown" },
]
op-access = [
    { key = "n", value = "None" },
    { key = "r", value = "Read" },
    { key = "w", value = "Write" },
]
"#;

/// Parse [`SAMPLE_ISA`]
///
/// # Errors
/// Returns error if the sample no longer parses
pub fn sample_isa() -> Result<IsaData, DataError> {
    IsaData::parse(SAMPLE_ISA)
}

/// Default options with every directory inside `root`
pub fn options_in(root: &Path) -> GeneratorOptions {
    GeneratorOptions::default().rooted_at(root)
}

/// A hand-maintained file with one empty generated region
pub fn region_file(region: &str, indent: &str) -> String {
    format!(
        "// hand-written prelude\n\
         {indent}{}\n\
         {indent}{}\n\
         // hand-written epilogue\n",
        begin_marker("//", region),
        end_marker("//", region),
    )
}

/// Create every hand-maintained file the built-in units patch
///
/// # Errors
/// Returns error if a file cannot be written
pub fn write_region_files(options: &GeneratorOptions, data: &IsaData) -> io::Result<()> {
    fs::create_dir_all(&options.rust.dir)?;
    for group in data.catalog.groups() {
        let path = options.rust.dir.join(format!("{}.rs", group.name.to_lowercase()));
        fs::write(path, region_file(&group.name, ""))?;
    }

    fs::create_dir_all(&options.rust.tests_dir)?;
    fs::write(
        options.rust.tests_dir.join("test_parser.rs"),
        region_file("OpAccessDict", "\t"),
    )?;

    fs::create_dir_all(&options.csharp.tests_dir)?;
    fs::write(
        options.csharp.tests_dir.join("InstructionInfoConstants.cs"),
        region_file("Dicts", "\t\t"),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_isa_parses() {
        let data = sample_isa().unwrap();
        assert_eq!(data.catalog.len(), 5);
        assert_eq!(data.tables.op_counts.len(), 3);
    }

    #[test]
    fn test_region_file_layout() {
        assert_eq!(
            region_file("Dicts", "\t"),
            "// hand-written prelude\n\t// GENERATOR-BEGIN: Dicts\n\t// GENERATOR-END: Dicts\n// hand-written epilogue\n"
        );
    }
}
