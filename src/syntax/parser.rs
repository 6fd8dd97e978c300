//! Recursive descent parser producing query node trees
//!
//! # Grammar
//!
//! ```text
//! query    := clauses EOF
//! clauses  := clause ((AND | OR)? clause)*
//! clause   := modifier? primary boost?
//! modifier := '+' | '-' | NOT
//! primary  := field_query | grouped | range | term
//! field_query := TERM COLON (range | grouped | QUOTED | TERM)
//! range    := ('[' | '{') bound TO bound (']' | '}')
//! bound    := '-'? TERM | QUOTED
//! grouped  := '(' clauses ')'
//! boost    := CARET number
//! ```
//!
//! A clause sequence of more than one clause becomes a single flat boolean
//! node that records the operator written between each pair of clauses.

use super::lexer::{Lexer, SpannedToken, Token};
use crate::error::{QueryNodeError, Result};
use crate::nodes::{
    Conjunction, FieldName, Modifier, NodeId, NodeKind, QueryTree, RangeFlags, Span,
};

/// Maximum nesting of parenthesised groups
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parser for Lucene-style query strings
pub struct QueryStringParser {
    lexer: Lexer,
    current: SpannedToken,
    tree: QueryTree,
    depth: usize,
}

impl QueryStringParser {
    /// Create a new parser for the given query string
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;

        Ok(Self {
            lexer,
            current,
            tree: QueryTree::new(),
            depth: 0,
        })
    }

    /// Parse the query string into a node tree
    pub fn parse(mut self) -> Result<QueryTree> {
        if self.current.token == Token::Eof {
            return Err(self.error("Empty query"));
        }

        let root = self.parse_clauses()?;

        // Ensure we've consumed all input
        if self.current.token != Token::Eof {
            return Err(self.error(format!(
                "Unexpected token after query: {:?}",
                self.current.token
            )));
        }

        self.tree.set_root(root);
        Ok(self.tree)
    }

    /// Parse: clauses := clause ((AND | OR)? clause)*
    fn parse_clauses(&mut self) -> Result<NodeId> {
        let mut clauses = vec![self.parse_clause()?];
        let mut operators = Vec::new();

        loop {
            let operator = match self.current.token {
                Token::And => Conjunction::And,
                Token::Or => Conjunction::Or,
                _ if self.is_start_of_clause() => Conjunction::Implicit,
                _ => break,
            };
            if operator != Conjunction::Implicit {
                self.advance()?;
            }
            operators.push(operator);
            clauses.push(self.parse_clause()?);
        }

        if clauses.len() == 1 {
            Ok(clauses[0])
        } else {
            Ok(self.tree.boolean(clauses, operators))
        }
    }

    /// Parse: clause := modifier? primary boost?
    fn parse_clause(&mut self) -> Result<NodeId> {
        let start = self.current.span;
        let modifier = match self.current.token {
            Token::Plus => Some(Modifier::Required),
            Token::Minus | Token::Not => Some(Modifier::Prohibited),
            _ => None,
        };
        if modifier.is_some() {
            self.advance()?;
        }

        let mut clause = self.parse_primary()?;

        if let Token::Caret(boost) = self.current.token {
            let boost = boost.ok_or_else(|| self.error("Missing boost value after '^'"))?;
            self.advance()?;
            clause = self.tree.boost(boost, clause);
        }

        match modifier {
            Some(modifier) => {
                let node = self.tree.modifier(modifier, clause);
                let span = start.cover(self.tree.node(clause).span());
                self.tree.set_span(node, span);
                Ok(node)
            }
            None => Ok(clause),
        }
    }

    /// Parse: primary := field_query | grouped | range | term
    fn parse_primary(&mut self) -> Result<NodeId> {
        let start = self.current.span;
        match self.current.token.clone() {
            Token::LeftParen => self.parse_grouped(FieldName::Default),
            Token::LeftBracket | Token::LeftBrace => self.parse_range(FieldName::Default, start),
            Token::Term { text, raw, wildcard } => {
                self.advance()?;

                // Check if this is a field query (term followed by colon)
                if self.current.token == Token::Colon {
                    self.advance()?;
                    self.parse_field_value(FieldName::from(text), start)
                } else {
                    Ok(self.term_node(FieldName::Default, text, raw, wildcard, start))
                }
            }
            Token::QuotedString(text) => {
                self.advance()?;
                Ok(self.tree.field(FieldName::Default, text, start))
            }
            token => Err(self.error(format!("Unexpected token: {:?}", token))),
        }
    }

    /// Parse field value after `field:`
    fn parse_field_value(&mut self, field: FieldName, start: Span) -> Result<NodeId> {
        let value_span = self.current.span;
        let span = start.cover(value_span);
        match self.current.token.clone() {
            Token::LeftBracket | Token::LeftBrace => self.parse_range(field, start),
            Token::LeftParen => self.parse_grouped(field),
            Token::QuotedString(text) => {
                self.advance()?;
                Ok(self.tree.field(field, text, span))
            }
            Token::Term { text, raw, wildcard } => {
                self.advance()?;
                Ok(self.term_node(field, text, raw, wildcard, span))
            }
            token => Err(self.error(format!(
                "Expected value after field '{}:', got {:?}",
                field, token
            ))),
        }
    }

    fn term_node(
        &mut self,
        field: FieldName,
        text: String,
        raw: String,
        wildcard: bool,
        span: Span,
    ) -> NodeId {
        if wildcard {
            self.tree.wildcard(field, raw, span)
        } else {
            self.tree.field(field, text, span)
        }
    }

    /// Parse: grouped := '(' clauses ')'
    ///
    /// A named `field` applies to every leaf inside the group that does not
    /// name its own field.
    fn parse_grouped(&mut self, field: FieldName) -> Result<NodeId> {
        let start = self.current.span;
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(self.error("Query nested too deeply"));
        }
        self.advance()?; // consume '('

        let inner = self.parse_clauses()?;
        let end = self.current.span;
        self.expect(Token::RightParen)?;
        self.depth -= 1;

        if !field.is_default() {
            self.apply_field(inner, &field);
        }
        let group = self.tree.group(inner);
        self.tree.set_span(group, start.cover(end));
        Ok(group)
    }

    fn apply_field(&mut self, id: NodeId, field: &FieldName) {
        for node in self.tree.post_order(id) {
            let carries_field = matches!(
                self.tree.kind(node),
                NodeKind::Field { .. }
                    | NodeKind::Wildcard { .. }
                    | NodeKind::Numeric { .. }
                    | NodeKind::TermRange { .. }
                    | NodeKind::NumericRange { .. }
            );
            if carries_field && self.tree.node(node).field().is_default() {
                self.tree.set_field(node, field.clone());
            }
        }
    }

    /// Parse range query: `[low TO high]`, `{low TO high}` or mixed brackets
    fn parse_range(&mut self, field: FieldName, start: Span) -> Result<NodeId> {
        let lower_inclusive = self.current.token == Token::LeftBracket;
        self.advance()?; // consume '[' or '{'

        let lower = self.parse_range_bound()?;
        self.expect(Token::To)?;
        let upper = self.parse_range_bound()?;

        let upper_inclusive = match self.current.token {
            Token::RightBracket => true,
            Token::RightBrace => false,
            _ => return Err(self.error("Expected ']' or '}' at end of range")),
        };
        let span = start.cover(self.current.span);
        self.advance()?;

        let flags = RangeFlags::new(lower_inclusive, upper_inclusive);
        Ok(self.tree.term_range(field, &lower, &upper, flags, span))
    }

    /// Parse a single range bound; `*` is an open bound, returned as ""
    fn parse_range_bound(&mut self) -> Result<String> {
        let negative = self.current.token == Token::Minus;
        if negative {
            self.advance()?;
        }

        let bound = match self.current.token.clone() {
            Token::Term { raw, .. } if raw == "*" && !negative => String::new(),
            Token::Term { text, .. } if negative => format!("-{}", text),
            Token::Term { text, .. } => text,
            Token::QuotedString(text) if !negative => text,
            token => {
                return Err(self.error(format!("Expected range value, got: {:?}", token)));
            }
        };
        self.advance()?;
        Ok(bound)
    }

    /// Check if current token can start a clause
    fn is_start_of_clause(&self) -> bool {
        matches!(
            self.current.token,
            Token::Term { .. }
                | Token::QuotedString(_)
                | Token::LeftParen
                | Token::LeftBracket
                | Token::LeftBrace
                | Token::Plus
                | Token::Minus
                | Token::Not
        )
    }

    /// Advance to the next token
    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    /// Expect a specific token and advance
    fn expect(&mut self, expected: Token) -> Result<()> {
        if std::mem::discriminant(&self.current.token) == std::mem::discriminant(&expected) {
            self.advance()
        } else {
            Err(self.error(format!(
                "Expected {:?}, got {:?}",
                expected, self.current.token
            )))
        }
    }

    fn error(&self, message: impl Into<String>) -> QueryNodeError {
        QueryNodeError::Syntax {
            message: message.into(),
            position: self.current.span.begin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{NodeType, StandardEscaper};

    fn parse_query(input: &str) -> Result<QueryTree> {
        QueryStringParser::new(input)?.parse()
    }

    fn root_type(tree: &QueryTree) -> NodeType {
        tree.node(tree.root().unwrap()).node_type()
    }

    #[test]
    fn test_simple_term() {
        let tree = parse_query("rust").unwrap();
        assert_eq!(root_type(&tree), NodeType::Field);
        assert!(tree.node(tree.root().unwrap()).field().is_default());
    }

    #[test]
    fn test_field_term() {
        let tree = parse_query("title:rust").unwrap();
        let root = tree.node(tree.root().unwrap());
        assert_eq!(root.field(), &FieldName::named("title"));
        assert_eq!(root.kind().text(), Some("rust"));
        assert_eq!(root.span(), Span::new(0, 10));
    }

    #[test]
    fn test_wildcard_term() {
        let tree = parse_query("title:prog*").unwrap();
        assert_eq!(root_type(&tree), NodeType::Wildcard);
    }

    #[test]
    fn test_flat_boolean_records_operators() {
        let tree = parse_query("a AND b OR c d").unwrap();
        let root = tree.root().unwrap();
        assert_eq!(
            tree.kind(root),
            &NodeKind::Boolean {
                operators: vec![Conjunction::And, Conjunction::Or, Conjunction::Implicit],
            }
        );
        assert_eq!(tree.children(root).len(), 4);
        assert!(tree.is_consistent());
    }

    #[test]
    fn test_modifiers() {
        let tree = parse_query("+a -b NOT c").unwrap();
        let root = tree.root().unwrap();
        let modifiers: Vec<_> = tree
            .children(root)
            .iter()
            .map(|&child| tree.kind(child).clone())
            .collect();
        assert_eq!(
            modifiers,
            vec![
                NodeKind::Modifier(Modifier::Required),
                NodeKind::Modifier(Modifier::Prohibited),
                NodeKind::Modifier(Modifier::Prohibited),
            ]
        );
    }

    #[test]
    fn test_grouped_field_applies_to_leaves() {
        let tree = parse_query("title:(rust OR go) body:x").unwrap();
        assert_eq!(
            tree.to_query_string_root(&StandardEscaper),
            "(title:rust OR title:go) body:x"
        );
    }

    #[test]
    fn test_range_mixed_brackets_and_open_bound() {
        let tree = parse_query("year:[2020 TO *} price:{-5 TO 10]").unwrap();
        assert_eq!(
            tree.to_query_string_root(&StandardEscaper),
            "year:[2020 TO *} price:{\\-5 TO 10]"
        );
    }

    #[test]
    fn test_boost_inside_modifier() {
        let tree = parse_query("+rust^2").unwrap();
        let root = tree.root().unwrap();
        assert_eq!(tree.kind(root), &NodeKind::Modifier(Modifier::Required));
        let boosted = tree.children(root)[0];
        assert_eq!(tree.kind(boosted), &NodeKind::Boost(2.0));
        assert_eq!(tree.to_query_string_root(&StandardEscaper), "+rust^2");
    }

    #[test]
    fn test_empty_query_is_an_error() {
        let err = parse_query("   ").unwrap_err();
        assert_eq!(err.code(), "INVALID_SYNTAX");
    }

    #[test]
    fn test_unbalanced_parens() {
        assert!(parse_query("(a OR b").is_err());
        assert!(parse_query("a OR b)").is_err());
    }

    #[test]
    fn test_dangling_operator() {
        let err = parse_query("a AND").unwrap_err();
        assert_eq!(err.span(), Some(Span::new(5, 5)));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}a{}", "(".repeat(300), ")".repeat(300));
        let err = parse_query(&deep).unwrap_err();
        assert_eq!(err.code(), "INVALID_SYNTAX");

        let shallow = format!("{}a{}", "(".repeat(10), ")".repeat(10));
        assert!(parse_query(&shallow).is_ok());
    }
}
