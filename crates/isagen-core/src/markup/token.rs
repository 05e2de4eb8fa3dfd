//! Raw lexemes of the documentation markup

use logos::Logos;

/// The kind of lexeme produced by the logos lexer
///
/// Paragraphs are not lexemes: the tokenizer finds blank lines inside the
/// merged text runs.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    /// A run of ordinary characters
    #[regex(r"[^\\`<\n]+")]
    Text,

    #[token("\n")]
    Newline,

    /// `` `code` `` on a single line
    #[regex(r"`[^`\n]*`")]
    Code,

    /// `<u8>`
    #[regex(r"<[a-z][a-z0-9]*>")]
    TypeKey,

    /// `<Group:Member>`
    #[regex(r"<[A-Za-z_][A-Za-z0-9_]*:[A-Za-z_][A-Za-z0-9_]*>")]
    Reference,

    /// `\<`, `` \` `` or `\\`
    #[regex(r"\\[\\`<]")]
    Escape,

    /// A backslash that escapes nothing
    #[token("\\")]
    Backslash,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Result<RawKind, ()>> {
        RawKind::lexer(source).collect()
    }

    #[test]
    fn test_lex_mixed_markup() {
        assert_eq!(
            kinds("a `b` <u8> <Code:Ret>\n"),
            vec![
                Ok(RawKind::Text),
                Ok(RawKind::Code),
                Ok(RawKind::Text),
                Ok(RawKind::TypeKey),
                Ok(RawKind::Text),
                Ok(RawKind::Reference),
                Ok(RawKind::Newline),
            ]
        );
    }

    #[test]
    fn test_lex_escapes() {
        assert_eq!(
            kinds(r"\<\x"),
            vec![
                Ok(RawKind::Escape),
                Ok(RawKind::Backslash),
                Ok(RawKind::Text)
            ]
        );
    }

    #[test]
    fn test_unclosed_bracket_is_an_error() {
        assert!(kinds("a <u8").contains(&Err(())));
    }
}
