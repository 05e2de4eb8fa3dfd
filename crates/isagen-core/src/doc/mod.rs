//! Doc comment rendering
//!
//! Turns markup tokens into the native doc comment syntax of a target
//! language. Cross references are resolved against the symbol catalogue and
//! spelled with the language's identifier policy.

use crate::error::GenResult;
use crate::lang::{IdentKind, Language};
use crate::markup::{MarkupError, MarkupToken, Tokenizer, TypeKeyTable};
use crate::symbols::{GroupKind, SymbolCatalog};
use crate::writer::CodeWriter;

/// Read-only lookup tables shared by every rendering of a run
#[derive(Debug, Clone, Copy)]
pub struct DocContext<'a> {
    pub types: &'a TypeKeyTable,
    pub catalog: &'a SymbolCatalog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between paragraphs
    Idle,
    /// Collecting the lines of a paragraph
    Accumulating,
}

/// Renders one documentation string at a time into a [`CodeWriter`]
pub struct DocCommentRenderer<'a> {
    lang: &'a dyn Language,
    ctx: DocContext<'a>,
    state: State,
    lines: Vec<String>,
    current: String,
}

impl<'a> DocCommentRenderer<'a> {
    pub fn new(lang: &'a dyn Language, ctx: DocContext<'a>) -> Self {
        Self {
            lang,
            ctx,
            state: State::Idle,
            lines: Vec::new(),
            current: String::new(),
        }
    }

    /// Render `tokens` documenting a declaration inside `owner`
    ///
    /// Nothing is written unless every token renders.
    pub fn render(
        &mut self,
        tokens: &[MarkupToken],
        owner: &str,
        w: &mut CodeWriter,
    ) -> GenResult<()> {
        self.reset();
        let result = self.render_lines(tokens, owner);
        let lines = std::mem::take(&mut self.lines);
        self.reset();
        result?;
        if !lines.is_empty() {
            self.lang.write_doc(w, &lines);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.state = State::Idle;
        self.lines.clear();
        self.current.clear();
    }

    fn render_lines(&mut self, tokens: &[MarkupToken], owner: &str) -> GenResult<()> {
        for token in tokens {
            match token {
                MarkupToken::ParagraphBreak => {
                    if self.state == State::Accumulating {
                        self.end_line();
                        self.lines.push(String::new());
                        self.state = State::Idle;
                    }
                }
                MarkupToken::Text(text) => {
                    for (i, piece) in text.split('\n').enumerate() {
                        if i > 0 {
                            self.end_line();
                        }
                        self.push(&self.lang.escape_doc_text(piece));
                    }
                }
                MarkupToken::Code(code) => self.push(&self.lang.inline_code(code)),
                MarkupToken::TypedLiteral(key) => {
                    let ty = self.ctx.types.get(key).ok_or_else(|| MarkupError::UnknownTypeKey {
                        key: key.clone(),
                        offset: 0,
                        snippet: format!("<{key}>"),
                    })?;
                    self.push(&self.lang.type_literal(ty));
                }
                MarkupToken::Reference { group, member } => {
                    let reference = self.reference(group, member, owner)?;
                    self.push(&reference);
                }
            }
        }
        if self.state == State::Accumulating {
            self.end_line();
        }
        Ok(())
    }

    fn reference(&self, group: &str, member: &str, owner: &str) -> GenResult<String> {
        let symbols = self.ctx.catalog.group(group)?;
        symbols.resolve(member)?;
        let kind = match symbols.kind {
            GroupKind::Enum => IdentKind::EnumMember,
            GroupKind::Flags => IdentKind::Constant,
        };
        let member = self.lang.identifier(member, kind);
        if group == owner {
            Ok(self.lang.cross_reference(None, &member))
        } else {
            let group = self.lang.identifier(group, IdentKind::Type);
            Ok(self.lang.cross_reference(Some(&group), &member))
        }
    }

    fn push(&mut self, text: &str) {
        self.current.push_str(text);
        self.state = State::Accumulating;
    }

    fn end_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
    }
}

/// Tokenize and render the documentation of `symbol`, if it has any
///
/// Failures are reported with the documented symbol's name.
pub fn write_doc(
    lang: &dyn Language,
    ctx: DocContext<'_>,
    owner: &str,
    symbol: &str,
    doc: Option<&str>,
    w: &mut CodeWriter,
) -> GenResult<()> {
    let Some(doc) = doc else {
        return Ok(());
    };
    render_doc(lang, ctx, owner, doc, w).map_err(|err| err.in_documentation_of(symbol))
}

fn render_doc(
    lang: &dyn Language,
    ctx: DocContext<'_>,
    owner: &str,
    doc: &str,
    w: &mut CodeWriter,
) -> GenResult<()> {
    let tokens = Tokenizer::new(ctx.types).tokenize(doc)?;
    DocCommentRenderer::new(lang, ctx).render(&tokens, owner, w)
}

/// Tokenize every documentation string of the catalogue and resolve its
/// references, without rendering anything
pub fn check_catalog(ctx: DocContext<'_>) -> GenResult<()> {
    let tokenizer = Tokenizer::new(ctx.types);
    for group in ctx.catalog.groups() {
        let docs = std::iter::once((group.name.as_str(), group.doc.as_deref())).chain(
            group
                .symbols()
                .iter()
                .map(|symbol| (symbol.name.as_str(), symbol.doc.as_deref())),
        );
        for (symbol, doc) in docs {
            let Some(doc) = doc else {
                continue;
            };
            check_doc(&tokenizer, ctx.catalog, doc)
                .map_err(|err| err.in_documentation_of(symbol))?;
        }
    }
    Ok(())
}

fn check_doc(tokenizer: &Tokenizer<'_>, catalog: &SymbolCatalog, doc: &str) -> GenResult<()> {
    for token in tokenizer.tokenize(doc)? {
        if let MarkupToken::Reference { group, member } = token {
            catalog.resolve(&group, &member)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{language, TargetLanguage};
    use crate::symbols::{GroupKind, SymbolGroup};

    fn catalog() -> SymbolCatalog {
        let mut catalog = SymbolCatalog::new();
        let mut sizes = SymbolGroup::new("MemorySize", GroupKind::Enum);
        sizes.add("UInt8", None).unwrap();
        sizes.add("Float32", None).unwrap();
        catalog.insert(sizes).unwrap();
        let mut mnemonics = SymbolGroup::new("Mnemonic", GroupKind::Enum);
        mnemonics.add("Add", None).unwrap();
        catalog.insert(mnemonics).unwrap();
        catalog
    }

    fn render(target: TargetLanguage, owner: &str, doc: &str) -> GenResult<String> {
        let types = TypeKeyTable::standard();
        let catalog = catalog();
        let ctx = DocContext {
            types: &types,
            catalog: &catalog,
        };
        let mut w = CodeWriter::new();
        write_doc(language(target), ctx, owner, "Sym", Some(doc), &mut w)?;
        Ok(w.finish())
    }

    #[test]
    fn test_rust_paragraphs_and_type() {
        assert_eq!(
            render(TargetLanguage::Rust, "Code", "first.\n\nsecond <u8>.").unwrap(),
            "/// first.\n///\n/// second `u8`.\n"
        );
    }

    #[test]
    fn test_csharp_paragraphs_and_type() {
        assert_eq!(
            render(TargetLanguage::CSharp, "Code", "first.\n\nsecond <u8>.").unwrap(),
            "/// <summary>\n/// first.\n///\n/// second <see cref=\"byte\"/>.\n/// </summary>\n"
        );
    }

    #[test]
    fn test_plain_text_round_trips() {
        let text = "Adds `src` to `dst`, see the manual\nfor details.";
        let out = render(TargetLanguage::Rust, "Code", text).unwrap();
        let stripped: Vec<&str> = out.lines().map(|l| l.trim_start_matches("/// ")).collect();
        assert_eq!(stripped.join("\n"), text);
    }

    #[test]
    fn test_self_reference_is_elided() {
        assert_eq!(
            render(TargetLanguage::Rust, "MemorySize", "Same as <MemorySize:Float32>").unwrap(),
            "/// Same as `Float32`\n"
        );
        assert_eq!(
            render(TargetLanguage::Rust, "Code", "Uses <MemorySize:Float32>").unwrap(),
            "/// Uses `MemorySize::Float32`\n"
        );
        assert_eq!(
            render(TargetLanguage::CSharp, "Code", "Uses <Mnemonic:Add>").unwrap(),
            "/// <summary>Uses <see cref=\"Mnemonic.Add\"/></summary>\n"
        );
    }

    #[test]
    fn test_unknown_reference_writes_nothing() {
        let types = TypeKeyTable::standard();
        let catalog = catalog();
        let ctx = DocContext {
            types: &types,
            catalog: &catalog,
        };
        let mut w = CodeWriter::new();
        let err = write_doc(
            language(TargetLanguage::Rust),
            ctx,
            "Code",
            "Add_rm8_r8",
            Some("ok\n\n<Mnemonic:Sub>"),
            &mut w,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "ReferenceError");
        assert!(err.to_string().contains("Add_rm8_r8"));
        assert!(w.is_empty());
    }

    #[test]
    fn test_unknown_type_key_is_markup_error() {
        let err = render(TargetLanguage::Rust, "Code", "a <q256>").unwrap_err();
        assert_eq!(err.kind(), "MarkupError");
    }

    #[test]
    fn test_missing_or_empty_doc_writes_nothing() {
        let types = TypeKeyTable::standard();
        let catalog = catalog();
        let ctx = DocContext {
            types: &types,
            catalog: &catalog,
        };
        let mut w = CodeWriter::new();
        let rust = language(TargetLanguage::Rust);
        write_doc(rust, ctx, "Code", "A", None, &mut w).unwrap();
        write_doc(rust, ctx, "Code", "B", Some("  "), &mut w).unwrap();
        assert!(w.is_empty());
    }

    #[test]
    fn test_check_catalog() {
        let types = TypeKeyTable::standard();
        let mut catalog = catalog();
        let ctx = DocContext {
            types: &types,
            catalog: &catalog,
        };
        assert!(check_catalog(ctx).is_ok());

        let mut code = SymbolGroup::new("Code", GroupKind::Enum);
        code.add("INVALID", None).unwrap();
        code.add("Add_rm8_r8", Some("`ADD` see <Mnemonic:Sub>")).unwrap();
        catalog.insert(code).unwrap();
        let ctx = DocContext {
            types: &types,
            catalog: &catalog,
        };
        let err = check_catalog(ctx).unwrap_err();
        assert_eq!(err.kind(), "ReferenceError");
        assert!(err.to_string().contains("Add_rm8_r8"));
    }
}
