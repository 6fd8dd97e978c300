//! Parser facades tying syntax, rewrite pipeline and builders together
//!
//! # Example
//!
//! ```rust
//! use flexquery::parser::{PrecedenceQueryParser, StandardQueryParser};
//!
//! let query = StandardQueryParser::new().parse("a AND b OR c AND d", "body").unwrap();
//! assert_eq!(query.to_string_with_default("body"), "+a +b +c +d");
//!
//! let query = PrecedenceQueryParser::new().parse("a AND b OR c AND d", "body").unwrap();
//! assert_eq!(query.to_string_with_default("body"), "(+a +b) (+c +d)");
//! ```

use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::debug;

use crate::analysis::Analyzer;
use crate::builders::{BuilderRegistry, QueryTreeBuilder};
use crate::config::QueryConfigHandler;
use crate::error::Result;
use crate::nodes::QueryTree;
use crate::processors::{ProcessContext, ProcessorPipeline};
use crate::search::Query;
use crate::syntax::{StandardSyntaxParser, SyntaxParser};

/// Parser running the standard pipeline
///
/// AND and OR do not bind differently: every clause of a sequence gets an
/// explicit occurrence. Configure before the first parse; parsing only
/// reads the parser.
#[derive(Debug)]
pub struct StandardQueryParser {
    config: QueryConfigHandler,
    syntax_parser: Box<dyn SyntaxParser>,
    pipeline: ProcessorPipeline,
    builder: QueryTreeBuilder,
}

impl Default for StandardQueryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardQueryParser {
    pub fn new() -> Self {
        Self::with_config(QueryConfigHandler::default())
    }

    pub fn with_config(config: QueryConfigHandler) -> Self {
        Self {
            config,
            syntax_parser: Box::new(StandardSyntaxParser),
            pipeline: ProcessorPipeline::standard(),
            builder: QueryTreeBuilder::default(),
        }
    }

    /// Parser analyzing field terms with `analyzer`
    pub fn with_analyzer(analyzer: Arc<dyn Analyzer>) -> Self {
        Self::with_config(QueryConfigHandler::default().with_analyzer(analyzer))
    }

    pub fn config(&self) -> &QueryConfigHandler {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut QueryConfigHandler {
        &mut self.config
    }

    pub fn pipeline(&self) -> &ProcessorPipeline {
        &self.pipeline
    }

    pub fn set_processor_pipeline(&mut self, pipeline: ProcessorPipeline) {
        self.pipeline = pipeline;
    }

    pub fn set_syntax_parser(&mut self, syntax_parser: impl SyntaxParser + 'static) {
        self.syntax_parser = Box::new(syntax_parser);
    }

    pub fn set_builder_registry(&mut self, registry: BuilderRegistry) {
        self.builder = QueryTreeBuilder::new(registry);
    }

    /// Parse and rewrite `query`, returning the processed node tree
    pub fn parse_tree(&self, query: &str, default_field: &str) -> Result<QueryTree> {
        debug!(query, default_field, "parsing query");
        let mut tree = self.syntax_parser.parse(query)?;
        self.pipeline
            .process(&mut tree, &ProcessContext::new(&self.config, default_field))?;
        Ok(tree)
    }

    /// Build the query of an already processed tree
    pub fn build(&self, tree: &QueryTree, default_field: &str) -> Result<Query> {
        self.builder.build(tree, &self.config, default_field)
    }

    /// Parse `query` into an executable query
    ///
    /// Terms without a field prefix search `default_field`.
    pub fn parse(&self, query: &str, default_field: &str) -> Result<Query> {
        let tree = self.parse_tree(query, default_field)?;
        self.build(&tree, default_field)
    }
}

/// Parser where AND binds tighter than OR
///
/// `a AND b OR c AND d` reads as `(a AND b) OR (c AND d)`. Everything but
/// the pipeline is the standard parser.
#[derive(Debug)]
pub struct PrecedenceQueryParser {
    inner: StandardQueryParser,
}

impl Default for PrecedenceQueryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PrecedenceQueryParser {
    pub fn new() -> Self {
        Self::from_standard(StandardQueryParser::new())
    }

    pub fn with_config(config: QueryConfigHandler) -> Self {
        Self::from_standard(StandardQueryParser::with_config(config))
    }

    pub fn with_analyzer(analyzer: Arc<dyn Analyzer>) -> Self {
        Self::from_standard(StandardQueryParser::with_analyzer(analyzer))
    }

    fn from_standard(mut inner: StandardQueryParser) -> Self {
        inner.set_processor_pipeline(ProcessorPipeline::precedence());
        Self { inner }
    }

    pub fn into_inner(self) -> StandardQueryParser {
        self.inner
    }
}

impl Deref for PrecedenceQueryParser {
    type Target = StandardQueryParser;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PrecedenceQueryParser {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}
