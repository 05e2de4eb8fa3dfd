//! Output languages
//!
//! Every target language implements [`Language`]: identifier spelling,
//! native type names, doc comment syntax and the handful of declaration
//! shapes the emitters produce. Emitters and generator units only ever see
//! `&dyn Language`.

pub mod csharp;
pub mod ident;
pub mod rust;

pub use csharp::CSharpLanguage;
pub use rust::RustLanguage;

use std::fmt;
use std::str::FromStr;

use crate::markup::TypeKey;
use crate::symbols::{Symbol, SymbolGroup};
use crate::writer::CodeWriter;

/// Name written into generated files
pub const GENERATOR_NAME: &str = "isagen";

/// The supported output languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetLanguage {
    Rust,
    CSharp,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 2] = [TargetLanguage::Rust, TargetLanguage::CSharp];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::CSharp => "csharp",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown language name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language `{0}` (expected `rust` or `csharp`)")]
pub struct UnknownLanguage(pub String);

impl FromStr for TargetLanguage {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "csharp" | "cs" | "c#" => Ok(Self::CSharp),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

/// What a generated identifier names; selects the casing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentKind {
    Type,
    EnumMember,
    Field,
    Property,
    Method,
    Argument,
    Local,
    Constant,
    StaticField,
}

/// Spelling of a type key in a language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeType {
    pub name: String,
    /// Built-in keyword type, as opposed to a descriptive name
    pub is_keyword: bool,
}

impl NativeType {
    pub fn keyword(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_keyword: true,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_keyword: false,
        }
    }
}

/// Where a whole generated file places its declarations
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    /// Namespace of languages that have one
    pub namespace: &'a str,
    /// Enclosing static class of languages that need one
    pub class: Option<&'a str>,
    /// Constants class referenced by the declarations, if any
    pub constants: Option<&'a str>,
    /// Declarations carry base library attributes such as `[Flags]`
    pub system_attributes: bool,
}

/// A lookup array with one element per symbol of an enumeration
#[derive(Debug, Clone, Copy)]
pub struct ArrayDecl<'a> {
    /// Semantic name, spelled with [`IdentKind::StaticField`]
    pub name: &'a str,
    /// Element type; always an unsigned integer
    pub element: TypeKey,
    /// Class holding the length constant
    pub constants: &'a str,
    /// Semantic name of the length constant
    pub length: &'a str,
}

/// A string-keyed dictionary whose values are members of `value_group`
#[derive(Debug, Clone, Copy)]
pub struct DictDecl<'a> {
    pub name: &'a str,
    pub value_group: &'a str,
}

/// Identifier policy and syntax of one output language
pub trait Language: Sync {
    fn target(&self) -> TargetLanguage;

    /// Spell a semantic name as an identifier of the given kind
    fn identifier(&self, name: &str, kind: IdentKind) -> String;

    fn native_type(&self, key: TypeKey) -> NativeType;

    fn line_comment(&self) -> &'static str {
        "//"
    }

    // ==================== Documentation ====================

    /// Make prose safe inside a doc comment
    fn escape_doc_text(&self, text: &str) -> String {
        text.to_string()
    }

    fn inline_code(&self, code: &str) -> String;

    /// Inline form of a typed literal
    fn type_literal(&self, key: TypeKey) -> String;

    /// Inline form of a reference to an already spelled member; `group` is
    /// `None` for references within the documented declaration
    fn cross_reference(&self, group: Option<&str>, member: &str) -> String;

    /// Write rendered doc lines; empty strings are blank comment lines
    fn write_doc(&self, w: &mut CodeWriter, lines: &[String]);

    // ==================== Files and regions ====================

    /// Optional header followed by the generated-file notice
    fn write_file_header(&self, w: &mut CodeWriter, header: Option<&str>) {
        let comment = self.line_comment();
        if let Some(header) = header {
            for line in header.lines() {
                w.line(format!("{comment} {line}").trim_end());
            }
            w.blank();
        }
        w.line(format!("{comment} This file was generated by {GENERATOR_NAME}"));
        w.blank();
    }

    /// First lines of every generated region
    fn write_region_notice(&self, w: &mut CodeWriter) {
        w.line(format!(
            "{} This was generated by {GENERATOR_NAME}",
            self.line_comment()
        ));
        w.blank();
    }

    fn open_scope(&self, w: &mut CodeWriter, scope: &Scope<'_>);

    fn close_scope(&self, w: &mut CodeWriter, scope: &Scope<'_>);

    // ==================== Declarations ====================

    /// Attributes and opening line of an enumeration
    fn begin_enum(&self, w: &mut CodeWriter, group: &SymbolGroup);

    fn enum_member(&self, w: &mut CodeWriter, group: &SymbolGroup, symbol: &Symbol);

    fn end_enum(&self, w: &mut CodeWriter, group: &SymbolGroup);

    fn begin_constants(&self, w: &mut CodeWriter, class: &str);

    fn constant(&self, w: &mut CodeWriter, name: &str, value: usize);

    fn end_constants(&self, w: &mut CodeWriter);

    fn begin_array(&self, w: &mut CodeWriter, decl: &ArrayDecl<'_>);

    fn array_element(&self, w: &mut CodeWriter, value: u32, comment: &str) {
        w.line(format!("{value},{} {comment}", self.line_comment()));
    }

    fn end_array(&self, w: &mut CodeWriter);

    fn begin_dictionary(&self, w: &mut CodeWriter, decl: &DictDecl<'_>);

    fn dictionary_entry(&self, w: &mut CodeWriter, decl: &DictDecl<'_>, key: &str, member: &str);

    fn end_dictionary(&self, w: &mut CodeWriter);
}

static RUST: RustLanguage = RustLanguage;
static CSHARP: CSharpLanguage = CSharpLanguage;

/// The shared implementation of a target language
pub fn language(target: TargetLanguage) -> &'static dyn Language {
    match target {
        TargetLanguage::Rust => &RUST,
        TargetLanguage::CSharp => &CSHARP,
    }
}

/// A string literal valid in both supported languages
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
