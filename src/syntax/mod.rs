//! Query string syntax
//!
//! Supports syntax like:
//! - `title:rust AND tags:tutorial`
//! - `+status:published -draft`
//! - `year:[2020 TO *}`
//! - `title:(rust OR go)^2`
//! - `title:prog*`
//!
//! # Example
//!
//! ```rust
//! use flexquery::syntax::{StandardSyntaxParser, SyntaxParser};
//!
//! let tree = StandardSyntaxParser.parse("title:rust AND status:published").unwrap();
//! assert_eq!(tree.node_count(), 3);
//! ```

pub mod lexer;
pub mod parser;

use std::fmt::Debug;

pub use lexer::{Lexer, SpannedToken, Token};
pub use parser::{QueryStringParser, MAX_NESTING_DEPTH};

use crate::error::Result;
use crate::nodes::QueryTree;

/// Turns query text into an unprocessed node tree
pub trait SyntaxParser: Send + Sync + Debug {
    fn parse(&self, query: &str) -> Result<QueryTree>;
}

/// Parser for the bundled Lucene-style syntax
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardSyntaxParser;

impl SyntaxParser for StandardSyntaxParser {
    fn parse(&self, query: &str) -> Result<QueryTree> {
        QueryStringParser::new(query)?.parse()
    }
}
