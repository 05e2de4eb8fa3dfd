//! Data rows driving the table-based generators
//!
//! Each table has a fixed row shape. The first column of every row names a
//! symbol of the table's driving enumeration; the dispatcher checks that the
//! table covers that enumeration before anything is emitted.

use serde::Deserialize;

/// A row whose first column is a symbol of the driving enumeration
pub trait DataRow {
    /// Name of the symbol this row describes
    fn key(&self) -> &str;
}

/// Number of operands of an instruction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpCountRow {
    pub code: String,
    pub count: u8,
}

/// Mnemonic of an instruction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MnemonicRow {
    pub code: String,
    pub mnemonic: String,
}

/// Memory operand size of an instruction, normal and broadcast form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemorySizeRow {
    pub code: String,
    pub memory: String,
    pub broadcast: String,
}

/// A string key mapped to a symbol, e.g. `"rw"` to `OpAccess::ReadWrite`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DictEntry {
    pub key: String,
    pub value: String,
}

impl DataRow for OpCountRow {
    fn key(&self) -> &str {
        &self.code
    }
}

impl DataRow for MnemonicRow {
    fn key(&self) -> &str {
        &self.code
    }
}

impl DataRow for MemorySizeRow {
    fn key(&self) -> &str {
        &self.code
    }
}

/// All data tables of an instruction set
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IsaTables {
    #[serde(default, rename = "op-counts")]
    pub op_counts: Vec<OpCountRow>,

    #[serde(default)]
    pub mnemonics: Vec<MnemonicRow>,

    #[serde(default, rename = "memory-sizes")]
    pub memory_sizes: Vec<MemorySizeRow>,

    #[serde(default, rename = "op-access")]
    pub op_access: Vec<DictEntry>,
}

/// Keys of all rows of a table, in source order
pub fn row_keys<R: DataRow>(rows: &[R]) -> Vec<&str> {
    rows.iter().map(DataRow::key).collect()
}
