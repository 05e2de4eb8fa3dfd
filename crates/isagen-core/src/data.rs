//! Instruction-set metadata loading (`isa.toml`)
//!
//! ```toml
//! [[group]]
//! name = "MemorySize"
//! doc = "Size of a memory reference"
//! members = [
//!     { name = "Unknown" },
//!     { name = "UInt8", doc = "Memory location contains a <u8>" },
//! ]
//!
//! [[group]]
//! name = "InstrOpInfoFlags"
//! kind = "flags"
//! visibility = "internal"
//! members = [{ name = "None", value = 0 }, { name = "JccTaken", value = 0x40 }]
//!
//! [tables]
//! op-counts = [{ code = "INVALID", count = 0 }]
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::symbols::{GroupKind, Symbol, SymbolCatalog, SymbolGroup, Visibility};
use crate::tables::IsaTables;

/// Errors raised while loading or building symbol metadata
#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read metadata file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse metadata: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("symbol group `{0}` is defined twice")]
    DuplicateGroup(String),

    #[error("symbol group `{group}` defines `{member}` twice")]
    DuplicateMember { group: String, member: String },

    #[error("symbol group `{group}`: `{first}` and `{second}` share the value {value}")]
    DuplicateValue {
        group: String,
        value: u32,
        first: String,
        second: String,
    },

    #[error("flags member `{group}::{member}` needs an explicit value")]
    MissingFlagValue { group: String, member: String },

    #[error("enum member `{group}::{member}` has value {value}, expected {expected}")]
    NonSequentialValue {
        group: String,
        member: String,
        value: u32,
        expected: u32,
    },

    #[error("symbol group `{group}` has too many members")]
    TooManyMembers { group: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIsa {
    #[serde(default, rename = "group")]
    groups: Vec<RawGroup>,

    #[serde(default)]
    tables: IsaTables,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGroup {
    name: String,
    #[serde(default)]
    kind: GroupKind,
    #[serde(default)]
    visibility: Visibility,
    #[serde(default)]
    doc: Option<String>,
    #[serde(default)]
    members: Vec<RawMember>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMember {
    name: String,
    #[serde(default)]
    value: Option<u32>,
    #[serde(default)]
    doc: Option<String>,
}

/// Symbol groups plus data tables: the complete input of a generation run
#[derive(Debug, Clone, Default)]
pub struct IsaData {
    pub catalog: SymbolCatalog,
    pub tables: IsaTables,
}

impl IsaData {
    /// Parse metadata from TOML text
    pub fn parse(text: &str) -> Result<Self, DataError> {
        let raw: RawIsa = toml::from_str(text)?;
        let mut catalog = SymbolCatalog::new();
        for group in raw.groups {
            catalog.insert(build_group(group)?)?;
        }
        Ok(Self {
            catalog,
            tables: raw.tables,
        })
    }

    /// Read and parse a metadata file
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

fn build_group(raw: RawGroup) -> Result<SymbolGroup, DataError> {
    let mut group = SymbolGroup::new(raw.name, raw.kind).with_visibility(raw.visibility);
    group.doc = raw.doc;

    for member in raw.members {
        match raw.kind {
            GroupKind::Enum => {
                let expected = u32::try_from(group.len()).map_err(|_| {
                    DataError::TooManyMembers {
                        group: group.name.clone(),
                    }
                })?;
                if let Some(value) = member.value.filter(|&v| v != expected) {
                    return Err(DataError::NonSequentialValue {
                        group: group.name.clone(),
                        member: member.name,
                        value,
                        expected,
                    });
                }
                group.add(member.name, member.doc.as_deref())?;
            }
            GroupKind::Flags => {
                let value = member.value.ok_or_else(|| DataError::MissingFlagValue {
                    group: group.name.clone(),
                    member: member.name.clone(),
                })?;
                group.insert(Symbol {
                    name: member.name,
                    value,
                    doc: member.doc,
                })?;
            }
        }
    }

    Ok(group)
}
