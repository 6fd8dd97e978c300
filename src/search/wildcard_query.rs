//! Wildcard query - matches terms using wildcards
//!
//! Supports:
//! - `*` - matches any sequence of characters
//! - `?` - matches any single character
//! - `\` - makes the next character literal
//!
//! # Example
//!
//! ```rust
//! use flexquery::search::WildcardQuery;
//!
//! let query = WildcardQuery::new("title", "prog*");
//! assert!(query.matches("programming").unwrap());
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QueryNodeError, Result};

/// One element of a parsed wildcard pattern
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PatternPart {
    Literal(char),
    AnyChar,
    AnyString,
}

/// Query that matches terms using wildcard patterns
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WildcardQuery {
    /// Field to search in
    pub field: String,
    /// Wildcard pattern
    pub pattern: String,
}

impl WildcardQuery {
    /// Create a new wildcard query
    pub fn new(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    fn parts(&self) -> Vec<PatternPart> {
        let mut parts = Vec::new();
        let mut chars = self.pattern.chars();
        while let Some(ch) = chars.next() {
            let part = match ch {
                '*' => PatternPart::AnyString,
                '?' => PatternPart::AnyChar,
                // A trailing backslash stands for itself
                '\\' => PatternPart::Literal(chars.next().unwrap_or('\\')),
                _ => PatternPart::Literal(ch),
            };
            parts.push(part);
        }
        parts
    }

    /// Convert wildcard pattern to a compiled, fully anchored regex
    pub fn to_regex(&self) -> Result<Regex> {
        let mut regex_pattern = String::from("^");

        for part in self.parts() {
            match part {
                PatternPart::AnyString => regex_pattern.push_str("(?s:.*)"),
                PatternPart::AnyChar => regex_pattern.push_str("(?s:.)"),
                PatternPart::Literal(ch) => {
                    regex_pattern.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4])))
                }
            }
        }

        regex_pattern.push('$');

        Regex::new(&regex_pattern).map_err(|e| QueryNodeError::Syntax {
            message: format!("Invalid wildcard pattern '{}': {}", self.pattern, e),
            position: 0,
        })
    }

    /// Whether `term` matches the pattern
    pub fn matches(&self, term: &str) -> Result<bool> {
        Ok(self.to_regex()?.is_match(term))
    }

    /// Extract the literal prefix from the pattern
    ///
    /// Returns the longest prefix before the first wildcard character, with
    /// escapes resolved.
    pub fn extract_prefix(&self) -> Option<String> {
        let prefix: String = self
            .parts()
            .into_iter()
            .map_while(|part| match part {
                PatternPart::Literal(ch) => Some(ch),
                _ => None,
            })
            .collect();

        if prefix.is_empty() {
            None
        } else {
            Some(prefix)
        }
    }

    /// Check if the pattern has any unescaped wildcards
    pub fn has_wildcards(&self) -> bool {
        self.parts()
            .iter()
            .any(|part| !matches!(part, PatternPart::Literal(_)))
    }

    pub(crate) fn fmt_with_default(
        &self,
        f: &mut fmt::Formatter<'_>,
        default_field: &str,
    ) -> fmt::Result {
        if self.field != default_field {
            write!(f, "{}:", self.field)?;
        }
        f.write_str(&self.pattern)
    }
}

impl fmt::Display for WildcardQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_default(f, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_query_creation() {
        let query = WildcardQuery::new("title", "prog*");
        assert_eq!(query.field, "title");
        assert_eq!(query.pattern, "prog*");
    }

    #[test]
    fn test_extract_prefix() {
        let query = WildcardQuery::new("title", "prog*");
        assert_eq!(query.extract_prefix(), Some("prog".to_string()));

        let query = WildcardQuery::new("title", "*suffix");
        assert_eq!(query.extract_prefix(), None);

        let query = WildcardQuery::new("title", "pre?fix*");
        assert_eq!(query.extract_prefix(), Some("pre".to_string()));

        let query = WildcardQuery::new("title", "a\\*b*");
        assert_eq!(query.extract_prefix(), Some("a*b".to_string()));
    }

    #[test]
    fn test_has_wildcards() {
        assert!(WildcardQuery::new("title", "prog*").has_wildcards());
        assert!(!WildcardQuery::new("title", "programming").has_wildcards());
        assert!(!WildcardQuery::new("title", "a\\?").has_wildcards());
    }

    #[test]
    fn test_pattern_to_regex() {
        let query = WildcardQuery::new("title", "prog*");
        let regex = query.to_regex().unwrap();
        assert!(regex.is_match("programming"));
        assert!(regex.is_match("progress"));
        assert!(regex.is_match("prog"));
        assert!(!regex.is_match("aprog"));

        let query = WildcardQuery::new("title", "te?t");
        let regex = query.to_regex().unwrap();
        assert!(regex.is_match("test"));
        assert!(regex.is_match("text"));
        assert!(!regex.is_match("teest"));
    }

    #[test]
    fn test_regex_specials_are_literal() {
        let query = WildcardQuery::new("f", "a.b+(c)*");
        assert!(query.matches("a.b+(c)").unwrap());
        assert!(query.matches("a.b+(c)xyz").unwrap());
        assert!(!query.matches("aXb+(c)").unwrap());
    }

    #[test]
    fn test_escaped_wildcard_matches_literally() {
        let query = WildcardQuery::new("f", "what\\?");
        assert!(query.matches("what?").unwrap());
        assert!(!query.matches("whats").unwrap());
    }

    #[test]
    fn test_display() {
        let query = WildcardQuery::new("title", "prog*");
        assert_eq!(query.to_string(), "title:prog*");
    }
}
