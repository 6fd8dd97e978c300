//! Query node rewrite pipeline
//!
//! A pipeline is an ordered list of passes. Each pass rewrites the tree in
//! place; passes that replace the root update it on the tree. Pipelines keep
//! no state between runs.

mod analyzer;
mod boolean_modifiers;
mod leading_wildcard;
mod lowercase;
mod numeric;
mod precedence;

use std::fmt::Debug;
use tracing::{debug, trace};

pub use analyzer::AnalyzerProcessor;
pub use boolean_modifiers::BooleanModifiersProcessor;
pub use leading_wildcard::AllowLeadingWildcardProcessor;
pub use lowercase::LowercaseExpandedTermsProcessor;
pub use numeric::NumericProcessor;
pub use precedence::PrecedenceProcessor;

use crate::config::QueryConfigHandler;
use crate::error::Result;
use crate::nodes::QueryTree;

/// Read-only inputs shared by every pass of one run
#[derive(Clone, Copy, Debug)]
pub struct ProcessContext<'a> {
    pub config: &'a QueryConfigHandler,
    /// Field that `FieldName::Default` nodes stand for
    pub default_field: &'a str,
}

impl<'a> ProcessContext<'a> {
    pub fn new(config: &'a QueryConfigHandler, default_field: &'a str) -> Self {
        Self {
            config,
            default_field,
        }
    }
}

/// One rewrite pass over a query node tree
pub trait QueryNodeProcessor: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    fn process(&self, tree: &mut QueryTree, ctx: &ProcessContext<'_>) -> Result<()>;
}

/// Ordered, immutable list of passes
#[derive(Debug, Default)]
pub struct ProcessorPipeline {
    processors: Vec<Box<dyn QueryNodeProcessor>>,
}

impl ProcessorPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Passes shared by both pipelines, in order
    fn term_passes() -> Self {
        Self::new()
            .with_processor(LowercaseExpandedTermsProcessor)
            .with_processor(AllowLeadingWildcardProcessor)
            .with_processor(NumericProcessor)
            .with_processor(AnalyzerProcessor)
    }

    /// Pipeline keeping flat boolean sequences and marking each clause
    pub fn standard() -> Self {
        Self::term_passes().with_processor(BooleanModifiersProcessor)
    }

    /// Pipeline regrouping boolean sequences so AND binds tighter than OR
    pub fn precedence() -> Self {
        Self::term_passes().with_processor(PrecedenceProcessor)
    }

    pub fn with_processor(mut self, processor: impl QueryNodeProcessor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Run every pass in order, stopping at the first error
    pub fn process(&self, tree: &mut QueryTree, ctx: &ProcessContext<'_>) -> Result<()> {
        for processor in &self.processors {
            debug!(processor = processor.name(), "running query node processor");
            processor.process(tree, ctx)?;
            trace!(processor = processor.name(), tree = %tree, "processor finished");
        }
        Ok(())
    }
}
