//! Type keys usable as `<key>` in documentation markup

use std::collections::BTreeMap;

/// Semantic meaning of a type key; each language decides how to spell it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// Unsigned integer of the given bit width
    Unsigned(u16),
    /// Signed integer of the given bit width
    Signed(u16),
    /// IEEE-style floating point value of the given bit width
    Float(u16),
    /// 16-bit brain floating point
    BFloat16,
    /// Packed binary coded decimal
    Bcd,
}

/// Read-only table mapping markup keys (`u8`, `f64`, ...) to type keys
///
/// Built once per run and handed to the tokenizer and renderer.
#[derive(Debug, Clone, Default)]
pub struct TypeKeyTable {
    keys: BTreeMap<String, TypeKey>,
}

impl TypeKeyTable {
    /// An empty table; every `<key>` fails to resolve
    pub fn empty() -> Self {
        Self::default()
    }

    /// The keys understood by the generator
    pub fn standard() -> Self {
        let mut table = Self::empty();
        for bits in [8, 16, 32, 52, 64, 128, 256, 512] {
            table.insert(format!("u{bits}"), TypeKey::Unsigned(bits));
        }
        for bits in [8, 16, 32, 64, 128, 256, 512] {
            table.insert(format!("i{bits}"), TypeKey::Signed(bits));
        }
        for bits in [16, 32, 64, 80, 128] {
            table.insert(format!("f{bits}"), TypeKey::Float(bits));
        }
        table.insert("bf16", TypeKey::BFloat16);
        table.insert("bcd", TypeKey::Bcd);
        table
    }

    pub fn insert(&mut self, key: impl Into<String>, ty: TypeKey) {
        self.keys.insert(key.into(), ty);
    }

    pub fn get(&self, key: &str) -> Option<TypeKey> {
        self.keys.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }
}
