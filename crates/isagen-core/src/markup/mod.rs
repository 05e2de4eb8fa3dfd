//! Tokenizer for documentation markup
//!
//! Documentation strings are plain text with a handful of inline forms:
//! - a blank line starts a new paragraph
//! - `` `code` `` is an inline code span, never re-interpreted
//! - `<u8>` is a typed literal, resolved through the [`TypeKeyTable`]
//! - `<Group:Member>` is a cross reference to another symbol
//! - `\<`, `` \` `` and `\\` escape the next character
//!
//! Tokens are purely semantic; nothing in here knows the target language.

mod token;
mod types;

pub use types::{TypeKey, TypeKeyTable};

use logos::Logos;
use thiserror::Error;

use token::RawKind;

/// Longest piece of offending source quoted in an error
const SNIPPET_LEN: usize = 24;

/// A semantic token of a documentation string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken {
    /// Separates two paragraphs
    ParagraphBreak,
    /// Prose, possibly containing single newlines
    Text(String),
    /// Inline code span, without its delimiters
    Code(String),
    /// A type key such as `u8`; always registered in the type table
    TypedLiteral(String),
    /// A reference to `member` of the enumeration `group`
    Reference { group: String, member: String },
}

/// A documentation string that could not be tokenized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("malformed bracket at offset {offset}: `{snippet}`")]
    MalformedBracket { offset: usize, snippet: String },

    #[error("unterminated inline code at offset {offset}: `{snippet}`")]
    UnterminatedCode { offset: usize, snippet: String },

    /// The bracket form is well formed but the key is not registered
    #[error("unknown type key `{key}` at offset {offset}: `{snippet}`")]
    UnknownTypeKey {
        key: String,
        offset: usize,
        snippet: String,
    },
}

impl MarkupError {
    /// Byte offset of the offending text in the documentation string
    pub fn offset(&self) -> usize {
        match self {
            Self::MalformedBracket { offset, .. }
            | Self::UnterminatedCode { offset, .. }
            | Self::UnknownTypeKey { offset, .. } => *offset,
        }
    }
}

/// Converts documentation strings into [`MarkupToken`]s
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    types: &'a TypeKeyTable,
}

impl<'a> Tokenizer<'a> {
    pub fn new(types: &'a TypeKeyTable) -> Self {
        Self { types }
    }

    /// Tokenize one documentation string
    ///
    /// Empty or whitespace-only input yields no tokens. Trailing blank
    /// lines are dropped; the last line keeps its trailing spaces.
    pub fn tokenize(&self, text: &str) -> Result<Vec<MarkupToken>, MarkupError> {
        let source = trim_trailing_lines(text);
        let mut tokens = Vec::new();
        let mut pending = String::new();
        let mut lexer = RawKind::lexer(source);

        while let Some(kind) = lexer.next() {
            let slice = lexer.slice();
            let offset = lexer.span().start;
            match kind {
                Ok(RawKind::Text | RawKind::Newline | RawKind::Backslash) => {
                    pending.push_str(slice);
                }
                Ok(RawKind::Escape) => pending.push_str(&slice[1..]),
                Ok(RawKind::Code) => {
                    flush_text(&mut pending, &mut tokens);
                    tokens.push(MarkupToken::Code(inner(slice).to_string()));
                }
                Ok(RawKind::TypeKey) => {
                    let key = inner(slice);
                    if !self.types.contains(key) {
                        return Err(MarkupError::UnknownTypeKey {
                            key: key.to_string(),
                            offset,
                            snippet: snippet(source, offset),
                        });
                    }
                    flush_text(&mut pending, &mut tokens);
                    tokens.push(MarkupToken::TypedLiteral(key.to_string()));
                }
                Ok(RawKind::Reference) => {
                    let (group, member) = inner(slice).split_once(':').unwrap_or_default();
                    flush_text(&mut pending, &mut tokens);
                    tokens.push(MarkupToken::Reference {
                        group: group.to_string(),
                        member: member.to_string(),
                    });
                }
                Err(()) => return Err(classify_error(source, offset)),
            }
        }
        flush_text(&mut pending, &mut tokens);

        while tokens.last() == Some(&MarkupToken::ParagraphBreak) {
            tokens.pop();
        }
        Ok(tokens)
    }
}

/// Tokenize with a one-off tokenizer
pub fn tokenize(text: &str, types: &TypeKeyTable) -> Result<Vec<MarkupToken>, MarkupError> {
    Tokenizer::new(types).tokenize(text)
}

/// Cut `text` at the end of its last line with content
fn trim_trailing_lines(text: &str) -> &str {
    let content_end = text.trim_end().len();
    match text[content_end..].find('\n') {
        Some(newline) => &text[..content_end + newline],
        None => text,
    }
}

fn inner(delimited: &str) -> &str {
    &delimited[1..delimited.len() - 1]
}

fn classify_error(source: &str, offset: usize) -> MarkupError {
    let snippet = snippet(source, offset);
    if source[offset..].starts_with('`') {
        MarkupError::UnterminatedCode { offset, snippet }
    } else {
        MarkupError::MalformedBracket { offset, snippet }
    }
}

/// Up to [`SNIPPET_LEN`] characters of the line starting at `offset`
fn snippet(source: &str, offset: usize) -> String {
    source[offset..]
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(SNIPPET_LEN)
        .collect()
}

/// Turn accumulated text into `Text` and `ParagraphBreak` tokens
///
/// Only lines fully enclosed by newlines can be blank; the first and last
/// segment continue the lines of the surrounding inline tokens.
fn flush_text(pending: &mut String, tokens: &mut Vec<MarkupToken>) {
    if pending.is_empty() {
        return;
    }
    let segments: Vec<&str> = pending
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    let last = segments.len() - 1;

    let mut paragraph: Vec<&str> = Vec::new();
    for (index, segment) in segments.iter().enumerate() {
        let enclosed = index > 0 && index < last;
        if enclosed && segment.trim().is_empty() {
            push_text(&paragraph, tokens);
            paragraph.clear();
            push_break(tokens);
        } else {
            paragraph.push(segment);
        }
    }
    push_text(&paragraph, tokens);
    pending.clear();
}

fn push_text(lines: &[&str], tokens: &mut Vec<MarkupToken>) {
    let text = lines.join("\n");
    let starts_paragraph = matches!(tokens.last(), None | Some(MarkupToken::ParagraphBreak));
    if text.is_empty() || (starts_paragraph && text.trim().is_empty()) {
        return;
    }
    tokens.push(MarkupToken::Text(text));
}

fn push_break(tokens: &mut Vec<MarkupToken>) {
    match tokens.last() {
        None | Some(MarkupToken::ParagraphBreak) => {}
        Some(_) => tokens.push(MarkupToken::ParagraphBreak),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(text: &str) -> Result<Vec<MarkupToken>, MarkupError> {
        tokenize(text, &TypeKeyTable::standard())
    }

    fn text(s: &str) -> MarkupToken {
        MarkupToken::Text(s.to_string())
    }

    #[test]
    fn test_paragraphs_and_typed_literal() {
        assert_eq!(
            tok("first.\n\nsecond <u8>.").unwrap(),
            vec![
                text("first."),
                MarkupToken::ParagraphBreak,
                text("second "),
                MarkupToken::TypedLiteral("u8".to_string()),
                text("."),
            ]
        );
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(tok("").unwrap().is_empty());
        assert!(tok("  \n\n ").unwrap().is_empty());
    }

    #[test]
    fn test_soft_line_break_stays_in_text() {
        assert_eq!(tok("one\r\ntwo").unwrap(), vec![text("one\ntwo")]);
    }

    #[test]
    fn test_blank_lines_collapse_and_edges_are_dropped() {
        assert_eq!(
            tok("\n\na\n\n \n\nb\n\n").unwrap(),
            vec![text("a"), MarkupToken::ParagraphBreak, text("b")]
        );
    }

    #[test]
    fn test_trailing_spaces_survive() {
        assert_eq!(tok("keep trailing  ").unwrap(), vec![text("keep trailing  ")]);
        assert_eq!(tok("a  \r\n \n\n").unwrap(), vec![text("a  ")]);
    }

    #[test]
    fn test_code_span_and_reference() {
        assert_eq!(
            tok("`ADD r/m8, r8` see <Mnemonic:Add>").unwrap(),
            vec![
                MarkupToken::Code("ADD r/m8, r8".to_string()),
                text(" see "),
                MarkupToken::Reference {
                    group: "Mnemonic".to_string(),
                    member: "Add".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_break_after_code_span() {
        assert_eq!(
            tok("`a`\n\nb").unwrap(),
            vec![
                MarkupToken::Code("a".to_string()),
                MarkupToken::ParagraphBreak,
                text("b"),
            ]
        );
    }

    #[test]
    fn test_escapes_merge_into_text() {
        assert_eq!(
            tok(r"a \<b\> \`c\` \\ \d").unwrap(),
            vec![text(r"a <b\> `c` \ \d")]
        );
    }

    #[test]
    fn test_unknown_type_key() {
        let err = tok("a <q256> value").unwrap_err();
        assert_eq!(
            err,
            MarkupError::UnknownTypeKey {
                key: "q256".to_string(),
                offset: 2,
                snippet: "<q256> value".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_bracket() {
        let err = tok("value <u8 is short").unwrap_err();
        assert!(matches!(err, MarkupError::MalformedBracket { offset: 6, .. }));
        assert!(matches!(tok("a < b"), Err(MarkupError::MalformedBracket { .. })));
    }

    #[test]
    fn test_unterminated_code() {
        let err = tok("run `mov eax\nlater`").unwrap_err();
        assert!(matches!(err, MarkupError::UnterminatedCode { offset: 4, .. }));
        assert_eq!(err.offset(), 4);
    }
}
