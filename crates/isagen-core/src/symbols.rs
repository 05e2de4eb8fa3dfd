//! Symbols and symbol groups (enumerations)
//!
//! A [`SymbolGroup`] is an enumeration with a fixed, enumerable member set.
//! The [`SymbolCatalog`] is the lookup data source every emitter and the doc
//! renderer resolve names against.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::data::DataError;
use crate::error::ReferenceError;

/// How the members of a group get their ordinals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Ordinals are assigned 0..n in declaration order
    #[default]
    Enum,
    /// Every member carries an explicit bit value
    Flags,
}

/// Visibility of the declaration generated for a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
}

/// A named, ordinal-valued member of a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub value: u32,
    /// Documentation markup, if any
    pub doc: Option<String>,
}

/// An enumeration: a named set of symbols with unique names and ordinals
#[derive(Debug, Clone)]
pub struct SymbolGroup {
    pub name: String,
    pub kind: GroupKind,
    pub visibility: Visibility,
    pub doc: Option<String>,
    symbols: Vec<Symbol>,
    by_name: HashMap<String, usize>,
}

impl SymbolGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>, kind: GroupKind) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            doc: None,
            symbols: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Append a member of an enum group; its ordinal is its position
    pub fn add(&mut self, name: impl Into<String>, doc: Option<&str>) -> Result<u32, DataError> {
        let value = u32::try_from(self.symbols.len()).map_err(|_| DataError::TooManyMembers {
            group: self.name.clone(),
        })?;
        self.insert(Symbol {
            name: name.into(),
            value,
            doc: doc.map(str::to_string),
        })?;
        Ok(value)
    }

    /// Insert a member with an explicit ordinal
    ///
    /// Names and ordinals must both be unique within the group.
    pub fn insert(&mut self, symbol: Symbol) -> Result<(), DataError> {
        if self.by_name.contains_key(&symbol.name) {
            return Err(DataError::DuplicateMember {
                group: self.name.clone(),
                member: symbol.name,
            });
        }
        if let Some(other) = self.symbols.iter().find(|s| s.value == symbol.value) {
            return Err(DataError::DuplicateValue {
                group: self.name.clone(),
                value: symbol.value,
                first: other.name.clone(),
                second: symbol.name,
            });
        }
        self.by_name.insert(symbol.name.clone(), self.symbols.len());
        self.symbols.push(symbol);
        Ok(())
    }

    /// Members in declaration order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.by_name.get(name).map(|&index| &self.symbols[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Look up a member, failing with a reference error
    pub fn resolve(&self, name: &str) -> Result<&Symbol, ReferenceError> {
        self.get(name).ok_or_else(|| ReferenceError::UnknownMember {
            group: self.name.clone(),
            member: name.to_string(),
        })
    }
}

/// All symbol groups known to a generation run, keyed by name
#[derive(Debug, Clone, Default)]
pub struct SymbolCatalog {
    groups: BTreeMap<String, SymbolGroup>,
}

impl SymbolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: SymbolGroup) -> Result<(), DataError> {
        if self.groups.contains_key(&group.name) {
            return Err(DataError::DuplicateGroup(group.name));
        }
        self.groups.insert(group.name.clone(), group);
        Ok(())
    }

    pub fn group(&self, name: &str) -> Result<&SymbolGroup, ReferenceError> {
        self.groups
            .get(name)
            .ok_or_else(|| ReferenceError::UnknownGroup(name.to_string()))
    }

    /// Resolve `group:member`
    pub fn resolve(&self, group: &str, member: &str) -> Result<&Symbol, ReferenceError> {
        self.group(group)?.resolve(member)
    }

    /// Groups sorted by name
    pub fn groups(&self) -> impl Iterator<Item = &SymbolGroup> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_members_get_sequential_ordinals() {
        let mut group = SymbolGroup::new("Mnemonic", GroupKind::Enum);
        assert_eq!(group.add("INVALID", None).unwrap(), 0);
        assert_eq!(group.add("Add", None).unwrap(), 1);
        assert_eq!(group.add("Mov", Some("Move")).unwrap(), 2);
        assert_eq!(group.get("Mov").unwrap().doc.as_deref(), Some("Move"));
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn test_duplicate_member_is_rejected() {
        let mut group = SymbolGroup::new("Mnemonic", GroupKind::Enum);
        group.add("Add", None).unwrap();
        let err = group.add("Add", None).unwrap_err();
        assert!(matches!(err, DataError::DuplicateMember { .. }));
    }

    #[test]
    fn test_duplicate_ordinal_is_rejected() {
        let mut group = SymbolGroup::new("Flags", GroupKind::Flags);
        group
            .insert(Symbol {
                name: "A".to_string(),
                value: 4,
                doc: None,
            })
            .unwrap();
        let err = group
            .insert(Symbol {
                name: "B".to_string(),
                value: 4,
                doc: None,
            })
            .unwrap_err();
        assert!(matches!(err, DataError::DuplicateValue { value: 4, .. }));
    }

    #[test]
    fn test_catalog_resolution_errors() {
        let mut catalog = SymbolCatalog::new();
        let mut group = SymbolGroup::new("OpAccess", GroupKind::Enum);
        group.add("Read", None).unwrap();
        catalog.insert(group).unwrap();

        assert_eq!(catalog.resolve("OpAccess", "Read").unwrap().value, 0);
        assert_eq!(
            catalog.resolve("OpAccess", "Write").unwrap_err(),
            ReferenceError::UnknownMember {
                group: "OpAccess".to_string(),
                member: "Write".to_string(),
            }
        );
        assert_eq!(
            catalog.resolve("Register", "EAX").unwrap_err(),
            ReferenceError::UnknownGroup("Register".to_string())
        );
    }
}
