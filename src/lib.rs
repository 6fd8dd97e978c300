//! Flexible query parser for full-text search
//!
//! Query text is parsed into a node tree, rewritten by an ordered pipeline
//! of passes, then compiled into an executable [`Query`] by a registry of
//! per-node-type builders.
//!
//! ```rust
//! use flexquery::StandardQueryParser;
//!
//! let parser = StandardQueryParser::new();
//! let query = parser.parse("title:rust AND -draft", "body").unwrap();
//! assert_eq!(query.to_string_with_default("body"), "+title:rust -draft");
//! ```

pub mod analysis;
pub mod builders;
pub mod config;
pub mod error;
pub mod nodes;
pub mod parser;
pub mod processors;
pub mod search;
pub mod syntax;

pub use builders::{BuilderRegistry, QueryBuilder, QueryTreeBuilder};
pub use config::{DefaultOperator, NumericConfig, NumericType, QueryConfigHandler};
pub use error::{QueryNodeError, Result};
pub use nodes::{NodeId, NodeKind, NodeType, QueryTree};
pub use parser::{PrecedenceQueryParser, StandardQueryParser};
pub use processors::{ProcessorPipeline, QueryNodeProcessor};
pub use search::Query;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
