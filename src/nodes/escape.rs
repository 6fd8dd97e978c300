//! Escaping of term text when rendering query syntax

use std::fmt::Debug;

/// Query-string formatting collaborator used by `to_query_string`
pub trait EscapeQuerySyntax: Send + Sync + Debug {
    /// Escape literal term text so it reads back as the same term
    fn escape(&self, text: &str) -> String;
}

/// Characters with a syntactic meaning in query strings
const SPECIAL_CHARS: &[char] = &[
    '\\', '+', '-', '!', '(', ')', ':', '^', '[', ']', '"', '{', '}', '~', '*', '?', '|', '&',
    '/',
];

const RESERVED_WORDS: &[&str] = &["AND", "OR", "NOT", "TO"];

/// Escaper for the bundled query syntax
///
/// Backslash-escapes special characters and whitespace, and reserved words
/// when they make up the whole term.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardEscaper;

impl EscapeQuerySyntax for StandardEscaper {
    fn escape(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        if RESERVED_WORDS
            .iter()
            .any(|word| word.eq_ignore_ascii_case(text))
        {
            escaped.push('\\');
        }
        for ch in text.chars() {
            if SPECIAL_CHARS.contains(&ch) || ch.is_whitespace() {
                escaped.push('\\');
            }
            escaped.push(ch);
        }
        escaped
    }
}
