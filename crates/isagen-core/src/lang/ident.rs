//! Case conversion and reserved-word escaping

/// Rust keywords, strict and reserved
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers
const RUST_PATH_KEYWORDS: &[&str] = &["self", "Self", "super", "crate"];

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Split a PascalCase name into words, keeping digits with the word before them
///
/// Underscores are word separators and never produce empty words.
fn words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let after_lower = prev.is_lowercase() || prev.is_ascii_digit();
            let ends_acronym = prev.is_uppercase() && next_is_lower;
            if after_lower || ends_acronym {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// `XMLParser` → `xml_parser`, `Add_rm8_r8` → `add_rm8_r8`
pub fn to_snake_case(name: &str) -> String {
    words(name)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// `NumberOfCodeValues` → `NUMBER_OF_CODE_VALUES`
pub fn to_screaming_snake_case(name: &str) -> String {
    to_snake_case(name).to_uppercase()
}

/// `OpCount` → `opCount`, `XMLParser` → `xmlParser`
pub fn to_camel_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let upper_run = chars.iter().take_while(|c| c.is_uppercase()).count();
    let lowered = match upper_run {
        0 => return name.to_string(),
        n if n == 1 || n == chars.len() => n,
        // keep the capital that starts the next word
        n if chars[n].is_lowercase() => n - 1,
        n => n,
    };
    chars[..lowered]
        .iter()
        .flat_map(|c| c.to_lowercase())
        .chain(chars[lowered..].iter().copied())
        .collect()
}

/// Make `ident` usable as a Rust identifier
pub fn escape_rust(ident: String) -> String {
    if RUST_PATH_KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else if RUST_KEYWORDS.contains(&ident.as_str()) {
        format!("r#{ident}")
    } else {
        ident
    }
}

/// Make `ident` usable as a C# identifier
pub fn escape_csharp(ident: String) -> String {
    if CSHARP_KEYWORDS.contains(&ident.as_str()) {
        format!("@{ident}")
    } else {
        ident
    }
}
