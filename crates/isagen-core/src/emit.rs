//! Table-driven emitters
//!
//! Each emitter produces one complete declaration from symbols or data rows,
//! using only the [`Language`] interface. Prose goes through the doc comment
//! renderer; rows are plain formatting.

use crate::doc::{write_doc, DocContext};
use crate::error::{GenError, GenResult};
use crate::lang::{ArrayDecl, DictDecl, Language};
use crate::markup::TypeKey;
use crate::symbols::SymbolGroup;
use crate::tables::{DataRow, DictEntry};
use crate::writer::CodeWriter;

/// Largest value an array element of type `element` can hold, and its name
fn element_range(element: TypeKey) -> (u32, &'static str) {
    match element {
        TypeKey::Unsigned(8) => (u32::from(u8::MAX), "u8"),
        TypeKey::Unsigned(16) => (u32::from(u16::MAX), "u16"),
        _ => (u32::MAX, "u32"),
    }
}

/// Emits declarations for one language
#[derive(Clone, Copy)]
pub struct Emitter<'a> {
    lang: &'a dyn Language,
    docs: DocContext<'a>,
}

impl<'a> Emitter<'a> {
    pub fn new(lang: &'a dyn Language, docs: DocContext<'a>) -> Self {
        Self { lang, docs }
    }

    /// An enumeration with its documentation and the docs of every member
    pub fn write_enum(&self, w: &mut CodeWriter, group: &SymbolGroup) -> GenResult<()> {
        let owner = group.name.as_str();
        write_doc(self.lang, self.docs, owner, owner, group.doc.as_deref(), w)?;
        self.lang.begin_enum(w, group);
        w.indent();
        for symbol in group.symbols() {
            write_doc(self.lang, self.docs, owner, &symbol.name, symbol.doc.as_deref(), w)?;
            self.lang.enum_member(w, group, symbol);
        }
        w.dedent();
        self.lang.end_enum(w, group);
        Ok(())
    }

    /// A class of integer constants
    pub fn write_constants(&self, w: &mut CodeWriter, class: &str, constants: &[(String, usize)]) {
        self.lang.begin_constants(w, class);
        w.indented(|w| {
            for (name, value) in constants {
                self.lang.constant(w, name, *value);
            }
        });
        self.lang.end_constants(w);
    }

    /// A lookup array indexed by the ordinals of `group`
    ///
    /// Elements are emitted in ordinal order whatever the row order, each
    /// followed by a comment naming its symbol. The rows must cover `group`.
    pub fn write_lookup_array<R: DataRow>(
        &self,
        w: &mut CodeWriter,
        decl: &ArrayDecl<'_>,
        group: &SymbolGroup,
        rows: &[R],
        value_of: impl Fn(&R) -> GenResult<u32>,
    ) -> GenResult<()> {
        let (max, ty) = element_range(decl.element);
        let mut elements = Vec::with_capacity(rows.len());
        for row in rows {
            let symbol = group.resolve(row.key())?;
            let value = value_of(row)?;
            if value > max {
                return Err(GenError::ValueOutOfRange {
                    symbol: symbol.name.clone(),
                    value,
                    ty,
                });
            }
            elements.push((symbol.value, symbol.name.as_str(), value));
        }
        elements.sort_by_key(|&(ordinal, _, _)| ordinal);

        self.lang.begin_array(w, decl);
        w.indented(|w| {
            for (_, name, value) in &elements {
                self.lang.array_element(w, *value, name);
            }
        });
        self.lang.end_array(w);
        Ok(())
    }

    /// A string-keyed dictionary in source order
    pub fn write_dictionary(
        &self,
        w: &mut CodeWriter,
        decl: &DictDecl<'_>,
        entries: &[DictEntry],
    ) -> GenResult<()> {
        let group = self.docs.catalog.group(decl.value_group)?;
        for entry in entries {
            group.resolve(&entry.value)?;
        }

        self.lang.begin_dictionary(w, decl);
        for entry in entries {
            self.lang.dictionary_entry(w, decl, &entry.key, &entry.value);
        }
        self.lang.end_dictionary(w);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{language, TargetLanguage};
    use crate::markup::TypeKeyTable;
    use crate::symbols::{GroupKind, SymbolCatalog};
    use crate::tables::OpCountRow;

    fn catalog() -> SymbolCatalog {
        let mut catalog = SymbolCatalog::new();
        let mut code = SymbolGroup::new("Code", GroupKind::Enum);
        code.add("A", Some("First <u8>")).unwrap();
        code.add("B", None).unwrap();
        catalog.insert(code).unwrap();
        let mut access = SymbolGroup::new("OpAccess", GroupKind::Enum);
        access.add("None", None).unwrap();
        access.add("Read", None).unwrap();
        catalog.insert(access).unwrap();
        catalog
    }

    fn row(code: &str, count: u8) -> OpCountRow {
        OpCountRow {
            code: code.to_string(),
            count,
        }
    }

    const OP_COUNT: ArrayDecl<'static> = ArrayDecl {
        name: "OpCount",
        element: TypeKey::Unsigned(8),
        constants: "IsaConstants",
        length: "NumberOfCodeValues",
    };

    #[test]
    fn test_lookup_array_is_in_ordinal_order() {
        let types = TypeKeyTable::standard();
        let catalog = catalog();
        let emitter = Emitter::new(
            language(TargetLanguage::Rust),
            DocContext {
                types: &types,
                catalog: &catalog,
            },
        );
        let code = catalog.group("Code").unwrap();
        let mut w = CodeWriter::with_indent("    ");
        emitter
            .write_lookup_array(&mut w, &OP_COUNT, code, &[row("B", 0), row("A", 2)], |r| {
                Ok(u32::from(r.count))
            })
            .unwrap();
        assert_eq!(
            w.finish(),
            "#[rustfmt::skip]\n\
             pub(crate) static OP_COUNT: [u8; IsaConstants::NUMBER_OF_CODE_VALUES] = [\n    \
             2,// A\n    \
             0,// B\n\
             ];\n"
        );
    }

    #[test]
    fn test_lookup_array_value_out_of_range() {
        let types = TypeKeyTable::standard();
        let catalog = catalog();
        let emitter = Emitter::new(
            language(TargetLanguage::CSharp),
            DocContext {
                types: &types,
                catalog: &catalog,
            },
        );
        let code = catalog.group("Code").unwrap();
        let mut w = CodeWriter::new();
        let err = emitter
            .write_lookup_array(&mut w, &OP_COUNT, code, &[row("A", 0), row("B", 0)], |_| Ok(256))
            .unwrap_err();
        assert!(matches!(
            err,
            GenError::ValueOutOfRange {
                value: 256,
                ty: "u8",
                ..
            }
        ));
    }

    #[test]
    fn test_enum_with_docs() {
        let types = TypeKeyTable::standard();
        let catalog = catalog();
        let emitter = Emitter::new(
            language(TargetLanguage::CSharp),
            DocContext {
                types: &types,
                catalog: &catalog,
            },
        );
        let mut w = CodeWriter::with_indent("    ");
        emitter
            .write_enum(&mut w, catalog.group("Code").unwrap())
            .unwrap();
        assert_eq!(
            w.finish(),
            "public enum Code {\n    \
             /// <summary>First <see cref=\"byte\"/></summary>\n    \
             A = 0,\n    \
             B = 1,\n\
             }\n"
        );
    }

    #[test]
    fn test_dictionary_values_must_resolve() {
        let types = TypeKeyTable::standard();
        let catalog = catalog();
        let emitter = Emitter::new(
            language(TargetLanguage::Rust),
            DocContext {
                types: &types,
                catalog: &catalog,
            },
        );
        let decl = DictDecl {
            name: "ToAccess",
            value_group: "OpAccess",
        };
        let entries = vec![
            DictEntry {
                key: "r".to_string(),
                value: "Read".to_string(),
            },
            DictEntry {
                key: "w".to_string(),
                value: "Write".to_string(),
            },
        ];
        let mut w = CodeWriter::new();
        let err = emitter.write_dictionary(&mut w, &decl, &entries).unwrap_err();
        assert_eq!(err.kind(), "ReferenceError");
        assert!(w.is_empty());
    }
}
