//! C# output

use super::ident::{escape_csharp, to_camel_case};
use super::{ArrayDecl, DictDecl, IdentKind, Language, NativeType, Scope, TargetLanguage};
use crate::markup::TypeKey;
use crate::symbols::{GroupKind, Symbol, SymbolGroup, Visibility};
use crate::writer::CodeWriter;

/// Managed-object output: namespaces, static classes and XML doc comments
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpLanguage;

impl CSharpLanguage {
    fn visibility(visibility: Visibility) -> &'static str {
        match visibility {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
        }
    }
}

/// Escape XML-special characters
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

impl Language for CSharpLanguage {
    fn target(&self) -> TargetLanguage {
        TargetLanguage::CSharp
    }

    fn identifier(&self, name: &str, kind: IdentKind) -> String {
        let spelled = match kind {
            IdentKind::Field | IdentKind::Argument | IdentKind::Local => to_camel_case(name),
            IdentKind::Type
            | IdentKind::EnumMember
            | IdentKind::Property
            | IdentKind::Method
            | IdentKind::Constant
            | IdentKind::StaticField => name.to_string(),
        };
        escape_csharp(spelled)
    }

    fn native_type(&self, key: TypeKey) -> NativeType {
        match key {
            TypeKey::Unsigned(8) => NativeType::keyword("byte"),
            TypeKey::Unsigned(16) => NativeType::keyword("ushort"),
            TypeKey::Unsigned(32) => NativeType::keyword("uint"),
            TypeKey::Unsigned(64) => NativeType::keyword("ulong"),
            TypeKey::Signed(8) => NativeType::keyword("sbyte"),
            TypeKey::Signed(16) => NativeType::keyword("short"),
            TypeKey::Signed(32) => NativeType::keyword("int"),
            TypeKey::Signed(64) => NativeType::keyword("long"),
            TypeKey::Float(32) => NativeType::keyword("float"),
            TypeKey::Float(64) => NativeType::keyword("double"),
            TypeKey::Unsigned(bits) => NativeType::named(format!("uint{bits}")),
            TypeKey::Signed(bits) => NativeType::named(format!("int{bits}")),
            TypeKey::Float(bits) => NativeType::named(format!("float{bits}")),
            TypeKey::BFloat16 => NativeType::named("bfloat16"),
            TypeKey::Bcd => NativeType::named("bcd"),
        }
    }

    fn escape_doc_text(&self, text: &str) -> String {
        escape_xml(text)
    }

    fn inline_code(&self, code: &str) -> String {
        format!("<c>{}</c>", escape_xml(code))
    }

    fn type_literal(&self, key: TypeKey) -> String {
        let ty = self.native_type(key);
        if ty.is_keyword {
            format!("<see cref=\"{}\"/>", ty.name)
        } else {
            format!("<c>{}</c>", ty.name)
        }
    }

    fn cross_reference(&self, group: Option<&str>, member: &str) -> String {
        match group {
            Some(group) => format!("<see cref=\"{group}.{member}\"/>"),
            None => format!("<see cref=\"{member}\"/>"),
        }
    }

    fn write_doc(&self, w: &mut CodeWriter, lines: &[String]) {
        if let [line] = lines {
            w.line(format!("/// <summary>{line}</summary>"));
            return;
        }
        w.line("/// <summary>");
        for line in lines {
            if line.is_empty() {
                w.line("///");
            } else {
                w.line(format!("/// {line}"));
            }
        }
        w.line("/// </summary>");
    }

    fn open_scope(&self, w: &mut CodeWriter, scope: &Scope<'_>) {
        if scope.system_attributes {
            w.line("using System;");
            w.blank();
        }
        w.line(format!("namespace {} {{", scope.namespace));
        w.indent();
        if let Some(class) = scope.class {
            w.line(format!("static partial class {class} {{"));
            w.indent();
        }
    }

    fn close_scope(&self, w: &mut CodeWriter, scope: &Scope<'_>) {
        if scope.class.is_some() {
            w.dedent();
            w.line("}");
        }
        w.dedent();
        w.line("}");
    }

    fn begin_enum(&self, w: &mut CodeWriter, group: &SymbolGroup) {
        let vis = Self::visibility(group.visibility);
        let name = self.identifier(&group.name, IdentKind::Type);
        match group.kind {
            GroupKind::Enum => w.line(format!("{vis} enum {name} {{")),
            GroupKind::Flags => {
                w.line("[Flags]");
                w.line(format!("{vis} enum {name} : uint {{"));
            }
        }
    }

    fn enum_member(&self, w: &mut CodeWriter, group: &SymbolGroup, symbol: &Symbol) {
        let name = self.identifier(&symbol.name, IdentKind::EnumMember);
        match group.kind {
            GroupKind::Enum => w.line(format!("{name} = {},", symbol.value)),
            GroupKind::Flags => w.line(format!("{name} = 0x{:08X},", symbol.value)),
        }
    }

    fn end_enum(&self, w: &mut CodeWriter, _group: &SymbolGroup) {
        w.line("}");
    }

    fn begin_constants(&self, w: &mut CodeWriter, class: &str) {
        w.line(format!("static class {} {{", self.identifier(class, IdentKind::Type)));
    }

    fn constant(&self, w: &mut CodeWriter, name: &str, value: usize) {
        let name = self.identifier(name, IdentKind::Constant);
        w.line(format!("internal const int {name} = {value};"));
    }

    fn end_constants(&self, w: &mut CodeWriter) {
        w.line("}");
    }

    fn begin_array(&self, w: &mut CodeWriter, decl: &ArrayDecl<'_>) {
        let name = self.identifier(decl.name, IdentKind::StaticField);
        let element = self.native_type(decl.element).name;
        let constants = self.identifier(decl.constants, IdentKind::Type);
        let length = self.identifier(decl.length, IdentKind::Constant);
        w.line(format!(
            "internal static readonly {element}[] {name} = new {element}[{constants}.{length}] {{"
        ));
    }

    fn end_array(&self, w: &mut CodeWriter) {
        w.line("};");
    }

    fn begin_dictionary(&self, w: &mut CodeWriter, decl: &DictDecl<'_>) {
        let name = self.identifier(decl.name, IdentKind::StaticField);
        let group = self.identifier(decl.value_group, IdentKind::Type);
        w.line(format!(
            "internal static readonly Dictionary<string, {group}> {name} = \
             new Dictionary<string, {group}>(StringComparer.Ordinal) {{"
        ));
    }

    fn dictionary_entry(&self, w: &mut CodeWriter, decl: &DictDecl<'_>, key: &str, member: &str) {
        let group = self.identifier(decl.value_group, IdentKind::Type);
        let member = self.identifier(member, IdentKind::EnumMember);
        w.indented(|w| {
            w.line(format!(
                "{{ {}, {group}.{member} }},",
                super::string_literal(key)
            ));
        });
    }

    fn end_dictionary(&self, w: &mut CodeWriter) {
        w.line("};");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_policy() {
        let cs = CSharpLanguage;
        assert_eq!(cs.identifier("OpCount", IdentKind::StaticField), "OpCount");
        assert_eq!(cs.identifier("OpCount", IdentKind::Local), "opCount");
        assert_eq!(cs.identifier("String", IdentKind::Argument), "@string");
        assert_eq!(cs.identifier("JccTaken", IdentKind::Constant), "JccTaken");
    }

    #[test]
    fn test_type_literals() {
        let cs = CSharpLanguage;
        assert_eq!(cs.type_literal(TypeKey::Unsigned(8)), "<see cref=\"byte\"/>");
        assert_eq!(cs.type_literal(TypeKey::Float(64)), "<see cref=\"double\"/>");
        assert_eq!(cs.type_literal(TypeKey::Unsigned(128)), "<c>uint128</c>");
        assert_eq!(cs.type_literal(TypeKey::Bcd), "<c>bcd</c>");
    }

    #[test]
    fn test_doc_escaping_and_summary() {
        let cs = CSharpLanguage;
        assert_eq!(cs.escape_doc_text("a < b & 'c'"), "a &lt; b &amp; &apos;c&apos;");
        assert_eq!(cs.inline_code("r/m8 <- r8"), "<c>r/m8 &lt;- r8</c>");

        let mut w = CodeWriter::new();
        cs.write_doc(&mut w, &["One line".to_string()]);
        cs.write_doc(&mut w, &["a".to_string(), String::new(), "b".to_string()]);
        assert_eq!(
            w.finish(),
            "/// <summary>One line</summary>\n/// <summary>\n/// a\n///\n/// b\n/// </summary>\n"
        );
    }

    #[test]
    fn test_scoped_flags_enum() {
        let cs = CSharpLanguage;
        let mut group = SymbolGroup::new("OpFlags", GroupKind::Flags)
            .with_visibility(Visibility::Internal);
        group
            .insert(Symbol {
                name: "JccTaken".to_string(),
                value: 0x40,
                doc: None,
            })
            .unwrap();
        let scope = Scope {
            namespace: "Isa.Intel",
            class: None,
            constants: None,
            system_attributes: true,
        };

        let mut w = CodeWriter::with_indent("    ");
        cs.open_scope(&mut w, &scope);
        cs.begin_enum(&mut w, &group);
        w.indented(|w| cs.enum_member(w, &group, &group.symbols()[0]));
        cs.end_enum(&mut w, &group);
        cs.close_scope(&mut w, &scope);
        assert_eq!(
            w.finish(),
            "using System;\n\nnamespace Isa.Intel {\n    [Flags]\n    internal enum OpFlags : uint {\n        \
             JccTaken = 0x00000040,\n    }\n}\n"
        );
    }

    #[test]
    fn test_dictionary_syntax() {
        let cs = CSharpLanguage;
        let dict = DictDecl {
            name: "ToAccess",
            value_group: "OpAccess",
        };
        let mut w = CodeWriter::with_indent("    ");
        cs.begin_dictionary(&mut w, &dict);
        cs.dictionary_entry(&mut w, &dict, "n", "None");
        cs.end_dictionary(&mut w);
        assert_eq!(
            w.finish(),
            "internal static readonly Dictionary<string, OpAccess> ToAccess = \
             new Dictionary<string, OpAccess>(StringComparer.Ordinal) {\n    \
             { \"n\", OpAccess.None },\n};\n"
        );
    }
}
