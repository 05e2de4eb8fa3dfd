//! Rust output

use super::ident::{escape_rust, to_screaming_snake_case, to_snake_case};
use super::{ArrayDecl, DictDecl, IdentKind, Language, NativeType, Scope, TargetLanguage};
use crate::markup::TypeKey;
use crate::symbols::{GroupKind, Symbol, SymbolGroup, Visibility};
use crate::writer::CodeWriter;

/// Systems-style output with explicit visibility
#[derive(Debug, Clone, Copy, Default)]
pub struct RustLanguage;

impl RustLanguage {
    fn visibility(visibility: Visibility) -> &'static str {
        match visibility {
            Visibility::Public => "pub",
            Visibility::Internal => "pub(crate)",
        }
    }

    /// `0x0000_0040`
    fn hex(value: u32) -> String {
        format!("0x{:04X}_{:04X}", value >> 16, value & 0xFFFF)
    }

    fn module_name(class: &str) -> String {
        class.to_lowercase()
    }
}

impl Language for RustLanguage {
    fn target(&self) -> TargetLanguage {
        TargetLanguage::Rust
    }

    fn identifier(&self, name: &str, kind: IdentKind) -> String {
        let spelled = match kind {
            IdentKind::Type | IdentKind::EnumMember => name.to_string(),
            IdentKind::Field
            | IdentKind::Property
            | IdentKind::Method
            | IdentKind::Argument
            | IdentKind::Local => to_snake_case(name),
            IdentKind::Constant | IdentKind::StaticField => to_screaming_snake_case(name),
        };
        escape_rust(spelled)
    }

    fn native_type(&self, key: TypeKey) -> NativeType {
        match key {
            TypeKey::Unsigned(bits @ (8 | 16 | 32 | 64 | 128)) => {
                NativeType::keyword(&format!("u{bits}"))
            }
            TypeKey::Signed(bits @ (8 | 16 | 32 | 64 | 128)) => {
                NativeType::keyword(&format!("i{bits}"))
            }
            TypeKey::Float(bits @ (32 | 64)) => NativeType::keyword(&format!("f{bits}")),
            TypeKey::Unsigned(bits) => NativeType::named(format!("u{bits}")),
            TypeKey::Signed(bits) => NativeType::named(format!("i{bits}")),
            TypeKey::Float(bits) => NativeType::named(format!("f{bits}")),
            TypeKey::BFloat16 => NativeType::named("bfloat16"),
            TypeKey::Bcd => NativeType::named("bcd"),
        }
    }

    fn inline_code(&self, code: &str) -> String {
        format!("`{code}`")
    }

    fn type_literal(&self, key: TypeKey) -> String {
        self.inline_code(&self.native_type(key).name)
    }

    fn cross_reference(&self, group: Option<&str>, member: &str) -> String {
        match group {
            Some(group) => format!("`{group}::{member}`"),
            None => format!("`{member}`"),
        }
    }

    fn write_doc(&self, w: &mut CodeWriter, lines: &[String]) {
        for line in lines {
            if line.is_empty() {
                w.line("///");
            } else {
                w.line(format!("/// {line}"));
            }
        }
    }

    fn open_scope(&self, w: &mut CodeWriter, scope: &Scope<'_>) {
        if let Some(constants) = scope.constants {
            w.line(format!(
                "use crate::{}::{constants};",
                Self::module_name(constants)
            ));
            w.blank();
        }
    }

    fn close_scope(&self, _w: &mut CodeWriter, _scope: &Scope<'_>) {}

    fn begin_enum(&self, w: &mut CodeWriter, group: &SymbolGroup) {
        let vis = Self::visibility(group.visibility);
        let name = self.identifier(&group.name, IdentKind::Type);
        match group.kind {
            GroupKind::Enum => {
                w.line("#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]");
                w.line("#[allow(non_camel_case_types)]");
                w.line(format!("{vis} enum {name} {{"));
            }
            GroupKind::Flags => {
                w.line(format!("{vis} struct {name};"));
                w.line("#[allow(dead_code)]");
                w.line(format!("impl {name} {{"));
            }
        }
    }

    fn enum_member(&self, w: &mut CodeWriter, group: &SymbolGroup, symbol: &Symbol) {
        match group.kind {
            GroupKind::Enum => {
                let name = self.identifier(&symbol.name, IdentKind::EnumMember);
                w.line(format!("{name} = {},", symbol.value));
            }
            GroupKind::Flags => {
                let vis = Self::visibility(group.visibility);
                let name = self.identifier(&symbol.name, IdentKind::Constant);
                w.line(format!("{vis} const {name}: u32 = {};", Self::hex(symbol.value)));
            }
        }
    }

    fn end_enum(&self, w: &mut CodeWriter, _group: &SymbolGroup) {
        w.line("}");
    }

    fn begin_constants(&self, w: &mut CodeWriter, class: &str) {
        let name = self.identifier(class, IdentKind::Type);
        w.line(format!("pub(crate) struct {name};"));
        w.line("#[allow(dead_code)]");
        w.line(format!("impl {name} {{"));
    }

    fn constant(&self, w: &mut CodeWriter, name: &str, value: usize) {
        let name = self.identifier(name, IdentKind::Constant);
        w.line(format!("pub(crate) const {name}: usize = {value};"));
    }

    fn end_constants(&self, w: &mut CodeWriter) {
        w.line("}");
    }

    fn begin_array(&self, w: &mut CodeWriter, decl: &ArrayDecl<'_>) {
        let name = self.identifier(decl.name, IdentKind::StaticField);
        let element = self.native_type(decl.element).name;
        let constants = self.identifier(decl.constants, IdentKind::Type);
        let length = self.identifier(decl.length, IdentKind::Constant);
        w.line("#[rustfmt::skip]");
        w.line(format!(
            "pub(crate) static {name}: [{element}; {constants}::{length}] = ["
        ));
    }

    fn end_array(&self, w: &mut CodeWriter) {
        w.line("];");
    }

    fn begin_dictionary(&self, w: &mut CodeWriter, decl: &DictDecl<'_>) {
        let name = self.identifier(decl.name, IdentKind::Local);
        let group = self.identifier(decl.value_group, IdentKind::Type);
        w.line(format!(
            "let mut {name}: HashMap<&'static str, {group}> = HashMap::new();"
        ));
    }

    fn dictionary_entry(&self, w: &mut CodeWriter, decl: &DictDecl<'_>, key: &str, member: &str) {
        let name = self.identifier(decl.name, IdentKind::Local);
        let group = self.identifier(decl.value_group, IdentKind::Type);
        let member = self.identifier(member, IdentKind::EnumMember);
        w.line(format!(
            "let _ = {name}.insert({}, {group}::{member});",
            super::string_literal(key)
        ));
    }

    fn end_dictionary(&self, _w: &mut CodeWriter) {}
}
